use reindex_gateway::Document;

/// Rewrites a page for the destination: every record's target key becomes
/// `target_index`, and the source-only metadata envelope is folded into the
/// payload as plain fields. No envelope key survives.
#[must_use]
pub fn prepare_page(documents: Vec<Document>, target_index: &str) -> Vec<Document> {
    documents
        .into_iter()
        .map(|doc| prepare_document(doc, target_index))
        .collect()
}

fn prepare_document(mut doc: Document, target_index: &str) -> Document {
    doc.index = target_index.to_string();
    if let Some(metadata) = doc.metadata.take() {
        for (key, value) in metadata {
            // On a name collision the envelope value wins.
            doc.source.insert(key, value);
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc_with_envelope() -> Document {
        let mut doc = Document::new("events", "a1");
        doc.source.insert("kind".to_string(), json!("click"));
        let mut envelope = serde_json::Map::new();
        envelope.insert("_routing".to_string(), json!("user-7"));
        envelope.insert("_timestamp".to_string(), json!(1_700_000_000));
        doc.metadata = Some(envelope);
        doc
    }

    #[test]
    fn retargets_the_index() {
        let prepared = prepare_page(vec![doc_with_envelope()], "events-v2");
        assert_eq!(prepared[0].index, "events-v2");
    }

    #[test]
    fn envelope_becomes_plain_payload_fields() {
        let prepared = prepare_page(vec![doc_with_envelope()], "events-v2");
        let doc = &prepared[0];
        assert_eq!(doc.metadata, None);
        assert_eq!(doc.source.get("_routing"), Some(&json!("user-7")));
        assert_eq!(doc.source.get("_timestamp"), Some(&json!(1_700_000_000)));
        assert_eq!(doc.source.get("kind"), Some(&json!("click")));
    }

    #[test]
    fn envelope_value_wins_on_collision() {
        let mut doc = doc_with_envelope();
        doc.source.insert("_routing".to_string(), json!("stale"));

        let prepared = prepare_page(vec![doc], "events-v2");
        assert_eq!(prepared[0].source.get("_routing"), Some(&json!("user-7")));
    }

    #[test]
    fn document_without_envelope_only_retargets() {
        let mut doc = Document::new("events", "a2");
        doc.source.insert("kind".to_string(), json!("view"));

        let prepared = prepare_page(vec![doc], "events-v2");
        assert_eq!(prepared[0].index, "events-v2");
        assert_eq!(prepared[0].source.get("kind"), Some(&json!("view")));
        assert_eq!(prepared[0].metadata, None);
    }
}
