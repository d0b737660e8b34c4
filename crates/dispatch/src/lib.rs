//! # Reindex Dispatch
//!
//! Capability wrapper around the invocation substrate that re-runs the
//! handler with a given payload. The controller only ever sees the
//! [`Dispatcher`] trait; which transport carries the payload is a deployment
//! decision:
//!
//! - [`HttpDispatcher`] hands the payload to the substrate's HTTP endpoint,
//!   fire-and-forget — delivery and retry are the substrate's business.
//! - [`QueueDispatcher`] parks payloads in an in-memory queue; the inline
//!   driver and the tests drain it deterministically.

mod error;
mod http;
mod queue;

pub use error::{DispatchError, Result};
pub use http::HttpDispatcher;
pub use queue::{DispatchEntry, QueueDispatcher};

use async_trait::async_trait;
use serde_json::Value;

/// Fire-and-forget re-invocation of the handler.
///
/// Implementations must not retry and must not wait for the dispatched step
/// to execute — the substrate's at-least-once delivery is the only guarantee
/// in force.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch_async(&self, job_id: &str, payload: &Value) -> Result<()>;
}
