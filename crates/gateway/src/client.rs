use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{BulkReport, CursorPage, Document};

/// Capability contract against a document-search cluster.
///
/// Locations are passed per call: one gateway value serves any number of
/// clusters, which lets a single controller read from one host and write to
/// another.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Opens a server-side cursor over `index` with the given time-to-live,
    /// page size, and optional source-side query filter.
    ///
    /// Returns `None` when the index has no matching documents.
    async fn open_cursor(
        &self,
        location: &str,
        index: &str,
        ttl: &str,
        page_size: u32,
        filter: &Map<String, Value>,
    ) -> Result<Option<String>>;

    /// Advances the cursor, returning the next page together with a possibly
    /// renewed token and the cluster's shard counters for the request.
    async fn advance_cursor(&self, location: &str, cursor_token: &str, ttl: &str)
        -> Result<CursorPage>;

    /// Writes `documents` against their embedded target index, in requests of
    /// at most `chunk_size` records each. Per-record failures are reported in
    /// the result, not raised.
    async fn bulk_write(
        &self,
        location: &str,
        documents: &[Document],
        chunk_size: usize,
    ) -> Result<BulkReport>;
}
