use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record as read from the source cluster.
///
/// `index` is the target key rewritten before writing; `metadata` is the
/// source-only envelope of routing/partitioning fields (`_routing`,
/// `_parent`, `_timestamp`) that the destination call does not accept and
/// which write preparation folds into `source`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    #[serde(rename = "fields", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Document {
    #[must_use]
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            source: Map::new(),
            metadata: None,
        }
    }
}

/// One batch of documents returned by advancing a cursor, plus the (possibly
/// renewed) token and the shard counters reported by the cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorPage {
    pub documents: Vec<Document>,
    pub cursor_token: Option<String>,
    pub shards_failed: u32,
    pub shards_total: u32,
}

impl CursorPage {
    /// True when the server reported partial shard failure for this advance.
    #[must_use]
    pub const fn has_shard_failures(&self) -> bool {
        self.shards_failed > 0
    }
}

/// Per-record failure detail from a bulk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: String,
    pub status: u16,
    pub reason: String,
}

/// Counts of written vs failed records for one page, consumed for logging
/// and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    pub written: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Folds another chunk's report into this one.
    pub fn merge(&mut self, other: Self) {
        self.written += other.written;
        self.failures.extend(other.failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn document_parses_from_hit() {
        let hit = json!({
            "_index": "events",
            "_id": "a1",
            "_score": 1.0,
            "_source": {"kind": "click"},
            "fields": {"_routing": "user-7"}
        });
        let doc: Document = serde_json::from_value(hit).unwrap();
        assert_eq!(doc.index, "events");
        assert_eq!(doc.id, "a1");
        assert_eq!(doc.source.get("kind"), Some(&json!("click")));
        assert_eq!(
            doc.metadata.as_ref().and_then(|m| m.get("_routing")),
            Some(&json!("user-7"))
        );
    }

    #[test]
    fn document_without_envelope() {
        let hit = json!({"_index": "events", "_id": "a2", "_source": {}});
        let doc: Document = serde_json::from_value(hit).unwrap();
        assert_eq!(doc.metadata, None);
    }

    #[test]
    fn report_merge_accumulates() {
        let mut report = BulkReport {
            written: 3,
            failures: vec![],
        };
        report.merge(BulkReport {
            written: 2,
            failures: vec![BulkFailure {
                id: "x".to_string(),
                status: 409,
                reason: "version conflict".to_string(),
            }],
        });
        assert_eq!(report.written, 5);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn shard_failure_flag() {
        let page = CursorPage {
            shards_failed: 2,
            shards_total: 5,
            ..CursorPage::default()
        };
        assert!(page.has_shard_failures());
        assert!(!CursorPage::default().has_shard_failures());
    }
}
