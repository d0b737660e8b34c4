use reindex_dispatch::{DispatchError, QueueDispatcher};
use reindex_protocol::JobRequest;

use crate::controller::{ReindexController, StepOutcome};
use crate::error::Result;

/// Result of driving a lineage synchronously to its terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveReport {
    /// Controller invocations consumed, the initial one included.
    pub steps: usize,
    /// Outcome of the final step (always [`StepOutcome::Finished`] unless an
    /// error cut the run short).
    pub outcome: StepOutcome,
}

/// Synchronous dispatch strategy: runs the first step, then keeps
/// re-invoking the controller with whatever lands on `queue` until it
/// drains. Observably identical to the asynchronous path, minus the
/// asynchrony — the controller must have been constructed with this same
/// queue as its dispatcher.
pub async fn drive_to_completion(
    controller: &ReindexController,
    queue: &QueueDispatcher,
    request: JobRequest,
) -> Result<DriveReport> {
    let mut outcome = controller.step(request).await?;
    let mut steps = 1;

    while let Some(entry) = queue.take()? {
        let request: JobRequest =
            serde_json::from_value(entry.payload).map_err(DispatchError::Serialization)?;
        outcome = controller.step(request).await?;
        steps += 1;
    }

    Ok(DriveReport { steps, outcome })
}
