use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::client::SearchGateway;
use crate::error::{GatewayError, Result};
use crate::types::{BulkFailure, BulkReport, CursorPage, Document};

/// Metadata fields requested alongside `_source` when opening a cursor, so
/// routing/partitioning information survives the copy.
const CURSOR_FIELDS: [&str; 4] = ["_source", "_parent", "_routing", "_timestamp"];

/// HTTP implementation of [`SearchGateway`] over the cluster's REST API.
///
/// One shared client carries the configured request timeout; every operation
/// is a single bounded request with no in-step retry.
#[derive(Debug, Clone)]
pub struct HttpSearchGateway {
    client: reqwest::Client,
}

impl HttpSearchGateway {
    /// Creates a gateway whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchGateway for HttpSearchGateway {
    async fn open_cursor(
        &self,
        location: &str,
        index: &str,
        ttl: &str,
        page_size: u32,
        filter: &Map<String, Value>,
    ) -> Result<Option<String>> {
        let url = format!("{}/{index}/_search", base_url(location));
        let body = open_request_body(page_size, filter);
        log::debug!("opening cursor over {location}/{index} (ttl {ttl})");

        let response = self
            .client
            .post(&url)
            .query(&[("scroll", ttl)])
            .json(&body)
            .send()
            .await?;
        let opened: OpenCursorResponse = read_json(response).await?;

        Ok(opened.scroll_id.filter(|token| !token.is_empty()))
    }

    async fn advance_cursor(
        &self,
        location: &str,
        cursor_token: &str,
        ttl: &str,
    ) -> Result<CursorPage> {
        let url = format!("{}/_search/scroll", base_url(location));
        let body = json!({"scroll": ttl, "scroll_id": cursor_token});

        let response = self.client.post(&url).json(&body).send().await?;
        let scrolled: ScrollResponse = read_json(response).await?;

        Ok(page_from_response(scrolled))
    }

    async fn bulk_write(
        &self,
        location: &str,
        documents: &[Document],
        chunk_size: usize,
    ) -> Result<BulkReport> {
        let url = format!("{}/_bulk", base_url(location));
        let mut report = BulkReport::default();

        log::debug!(
            "bulk writing {} documents to {location} in chunks of {chunk_size}",
            documents.len()
        );
        for chunk in documents.chunks(chunk_size.max(1)) {
            let body = bulk_body(chunk)?;
            let response = self
                .client
                .post(&url)
                .header("Content-Type", "application/x-ndjson")
                .body(body)
                .send()
                .await?;
            let written: BulkResponse = read_json(response).await?;
            report.merge(report_from_response(written));
        }

        Ok(report)
    }
}

fn base_url(location: &str) -> &str {
    location.trim_end_matches('/')
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GatewayError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Search body for the cursor-open request: caller filter plus page size and
/// the metadata field list. Our keys win on collision.
fn open_request_body(page_size: u32, filter: &Map<String, Value>) -> Map<String, Value> {
    let mut body = filter.clone();
    body.insert("size".to_string(), json!(page_size));
    body.insert("stored_fields".to_string(), json!(CURSOR_FIELDS));
    body
}

/// NDJSON payload for one bulk request. Every record is an `index` action
/// keyed by the document id, so duplicate delivery overwrites instead of
/// duplicating.
fn bulk_body(documents: &[Document]) -> Result<String> {
    let mut body = String::new();
    for doc in documents {
        let action = json!({"index": {"_index": doc.index, "_id": doc.id}});
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&doc.source)?);
        body.push('\n');
    }
    Ok(body)
}

fn page_from_response(response: ScrollResponse) -> CursorPage {
    CursorPage {
        documents: response.hits.hits,
        cursor_token: response.scroll_id.filter(|token| !token.is_empty()),
        shards_failed: response.shards.failed,
        shards_total: response.shards.total,
    }
}

fn report_from_response(response: BulkResponse) -> BulkReport {
    let mut report = BulkReport::default();
    for item in response.items {
        let Some(status) = item.index else { continue };
        if status.error.is_some() || status.status >= 300 {
            let reason = status
                .error
                .map(|e| format!("{}: {}", e.kind, e.reason))
                .unwrap_or_else(|| "unknown failure".to_string());
            report.failures.push(BulkFailure {
                id: status.id,
                status: status.status,
                reason,
            });
        } else {
            report.written += 1;
        }
    }
    report
}

#[derive(Debug, Deserialize)]
struct OpenCursorResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    #[serde(rename = "_shards", default)]
    shards: ShardStats,
    #[serde(default)]
    hits: HitsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct ShardStats {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    failed: u32,
}

#[derive(Debug, Default, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: Option<BulkItemStatus>,
}

#[derive(Debug, Deserialize)]
struct BulkItemStatus {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
struct BulkItemError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    reason: String,
}
