use reindex_dispatch::DispatchError;
use reindex_gateway::GatewayError;
use reindex_protocol::InvalidJob;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReindexError>;

/// Step-fatal failures of the replication state machine.
///
/// Every variant stops the current job lineage and is surfaced to the
/// invoker; none schedules a retry. Partial per-record bulk failures are not
/// represented here — they are counts in the batch report, logged and
/// absorbed.
#[derive(Debug, Error)]
pub enum ReindexError {
    /// Required payload fields missing or empty; never retried.
    #[error("invalid job parameters: {0}")]
    InvalidJob(#[from] InvalidJob),

    /// Cursor open/advance transport failure against the source cluster.
    #[error("source cluster unavailable: {0}")]
    SourceUnavailable(#[source] GatewayError),

    /// The server reported partial shard failure while advancing; the
    /// cursor's consistency is gone, so the lineage terminates. Pages
    /// written by prior steps stay written.
    #[error("scroll failed on {failed} of {total} shards")]
    ShardFailure { failed: u32, total: u32 },

    /// Bulk-write transport failure against the target cluster.
    #[error("target cluster unavailable: {0}")]
    TargetUnavailable(#[source] GatewayError),

    /// The next step could not be handed to the invocation substrate.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}
