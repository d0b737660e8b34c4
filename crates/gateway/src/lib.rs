//! # Reindex Gateway
//!
//! Thin capability wrapper over a document-search cluster, exposing the three
//! operations the reindex controller needs:
//!
//! ```text
//! open_cursor     source index ──> opaque cursor token (or none if empty)
//! advance_cursor  cursor token ──> one page + renewed token + shard counters
//! bulk_write      documents    ──> written/failed counts per batch
//! ```
//!
//! Shard failures are *data* in the returned page, not errors — the
//! controller decides how fatal they are. Everything else that goes wrong on
//! the wire is a [`GatewayError`].

mod client;
mod error;
mod http;
mod types;

pub use client::SearchGateway;
pub use error::{GatewayError, Result};
pub use http::HttpSearchGateway;
pub use types::{BulkFailure, BulkReport, CursorPage, Document};
