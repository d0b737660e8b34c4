use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::ReindexConfig;

/// Validation failure for a raw job payload. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidJob {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Raw handler payload, exactly as delivered by the invocation substrate.
///
/// Every field except `source_host`/`source_index` is optional; unknown keys
/// inside `scan_options`/`bulk_options` are preserved so re-dispatched
/// payloads do not lose caller-supplied settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_options: Option<ScanOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_options: Option<BulkOptions>,
}

/// Source-side page options: page size plus any query filters, forwarded
/// verbatim to the search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(flatten)]
    pub filter: Map<String, Value>,
}

/// Target-side write options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BulkOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resolved page options — size always concrete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageOptions {
    pub size: u32,
    #[serde(flatten)]
    pub filter: Map<String, Value>,
}

/// Resolved write options — chunk size always concrete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteOptions {
    pub chunk_size: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully resolved job descriptor: every `target_*` concrete, every option
/// filled from the process configuration when the payload left it out.
///
/// Serializes back to the wire field names of [`JobRequest`], so the payload
/// built for the next step parses as a fresh request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobDescriptor {
    pub source_host: String,
    pub source_index: String,
    pub target_host: String,
    pub target_index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    pub scroll: String,
    #[serde(rename = "scan_options")]
    pub page: PageOptions,
    #[serde(rename = "bulk_options")]
    pub write: WriteOptions,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl JobRequest {
    /// Resolves the raw payload into a [`JobDescriptor`]: validates required
    /// fields, defaults `target_*` from `source_*` and options from `config`.
    /// Pure — no side effects.
    pub fn resolve(self, config: &ReindexConfig) -> Result<JobDescriptor, InvalidJob> {
        let source_host =
            non_empty(self.source_host).ok_or(InvalidJob::MissingField("source_host"))?;
        let source_index =
            non_empty(self.source_index).ok_or(InvalidJob::MissingField("source_index"))?;

        let target_host = non_empty(self.target_host).unwrap_or_else(|| source_host.clone());
        let target_index = non_empty(self.target_index).unwrap_or_else(|| source_index.clone());
        let scroll = non_empty(self.scroll).unwrap_or_else(|| config.default_scroll.clone());

        let scan = self.scan_options.unwrap_or_default();
        let page = PageOptions {
            size: scan.size.unwrap_or(config.default_page_size),
            filter: scan.filter,
        };

        let bulk = self.bulk_options.unwrap_or_default();
        let write = WriteOptions {
            chunk_size: bulk.chunk_size.unwrap_or(config.default_chunk_size),
            extra: bulk.extra,
        };

        Ok(JobDescriptor {
            source_host,
            source_index,
            target_host,
            target_index,
            scroll_id: non_empty(self.scroll_id),
            scroll,
            page,
            write,
        })
    }
}

impl JobDescriptor {
    /// Descriptor for the next step: same locations and options, new cursor
    /// token. The token is opaque — only ever copied from gateway responses.
    #[must_use]
    pub fn with_cursor(&self, token: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.scroll_id = Some(token.into());
        next
    }

    /// Stable identifier for the job lineage, derived from the resolved
    /// source/target coordinates. Safe for use in URLs and queue names.
    #[must_use]
    pub fn lineage_id(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            &self.source_host,
            &self.source_index,
            &self.target_host,
            &self.target_index,
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0]);
        }
        let digest = hasher.finalize();
        let mut id = String::with_capacity(16);
        for byte in &digest[..8] {
            id.push_str(&format!("{byte:02x}"));
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minimal_request() -> JobRequest {
        JobRequest {
            source_host: Some("http://source:9200".to_string()),
            source_index: Some("events".to_string()),
            ..JobRequest::default()
        }
    }

    #[test]
    fn missing_source_host_is_invalid() {
        let request = JobRequest {
            source_index: Some("events".to_string()),
            ..JobRequest::default()
        };
        let err = request.resolve(&ReindexConfig::default()).unwrap_err();
        assert_eq!(err, InvalidJob::MissingField("source_host"));
    }

    #[test]
    fn missing_source_index_is_invalid() {
        let request = JobRequest {
            source_host: Some("http://source:9200".to_string()),
            ..JobRequest::default()
        };
        let err = request.resolve(&ReindexConfig::default()).unwrap_err();
        assert_eq!(err, InvalidJob::MissingField("source_index"));
    }

    #[test]
    fn blank_required_field_is_invalid() {
        let request = JobRequest {
            source_host: Some("  ".to_string()),
            source_index: Some("events".to_string()),
            ..JobRequest::default()
        };
        assert!(request.resolve(&ReindexConfig::default()).is_err());
    }

    #[test]
    fn target_defaults_to_source() {
        let job = minimal_request().resolve(&ReindexConfig::default()).unwrap();
        assert_eq!(job.target_host, "http://source:9200");
        assert_eq!(job.target_index, "events");
        assert_eq!(job.scroll_id, None);
        assert_eq!(job.scroll, "5m");
        assert_eq!(job.page.size, 500);
        assert_eq!(job.write.chunk_size, 500);
    }

    #[test]
    fn explicit_target_and_options_win() {
        let mut request = minimal_request();
        request.target_host = Some("http://target:9200".to_string());
        request.target_index = Some("events-v2".to_string());
        request.scroll = Some("10m".to_string());
        request.scan_options = Some(ScanOptions {
            size: Some(100),
            filter: Map::new(),
        });
        request.bulk_options = Some(BulkOptions {
            chunk_size: Some(50),
            extra: Map::new(),
        });

        let job = request.resolve(&ReindexConfig::default()).unwrap();
        assert_eq!(job.target_host, "http://target:9200");
        assert_eq!(job.target_index, "events-v2");
        assert_eq!(job.scroll, "10m");
        assert_eq!(job.page.size, 100);
        assert_eq!(job.write.chunk_size, 50);
    }

    #[test]
    fn query_filter_survives_resolution() {
        let payload = json!({
            "source_host": "http://source:9200",
            "source_index": "events",
            "scan_options": {"size": 10, "query": {"term": {"kind": "click"}}}
        });
        let request: JobRequest = serde_json::from_value(payload).unwrap();
        let job = request.resolve(&ReindexConfig::default()).unwrap();
        assert_eq!(
            job.page.filter.get("query"),
            Some(&json!({"term": {"kind": "click"}}))
        );
    }

    #[test]
    fn next_step_payload_round_trips_as_request() {
        let job = minimal_request().resolve(&ReindexConfig::default()).unwrap();
        let next = job.with_cursor("token-1");

        let payload = serde_json::to_value(&next).unwrap();
        assert_eq!(payload["scroll_id"], json!("token-1"));

        let reparsed: JobRequest = serde_json::from_value(payload).unwrap();
        let resolved = reparsed.resolve(&ReindexConfig::default()).unwrap();
        assert_eq!(resolved, next);
    }

    #[test]
    fn lineage_id_is_stable_and_url_safe() {
        let job = minimal_request().resolve(&ReindexConfig::default()).unwrap();
        let id = job.lineage_id();
        assert_eq!(id, job.lineage_id());
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        let mut other = minimal_request();
        other.target_index = Some("events-v2".to_string());
        let other = other.resolve(&ReindexConfig::default()).unwrap();
        assert_ne!(id, other.lineage_id());
    }

    #[test]
    fn cursor_token_is_copied_verbatim() {
        let job = minimal_request().resolve(&ReindexConfig::default()).unwrap();
        let next = job.with_cursor("c2FtcGxlLXRva2Vu==");
        assert_eq!(next.scroll_id.as_deref(), Some("c2FtcGxlLXRva2Vu=="));
        assert_eq!(next.source_host, job.source_host);
        assert_eq!(next.page, job.page);
    }
}
