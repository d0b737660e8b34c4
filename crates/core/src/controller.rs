use std::sync::Arc;

use reindex_dispatch::Dispatcher;
use reindex_gateway::SearchGateway;
use reindex_protocol::{JobDescriptor, JobRequest, ReindexConfig, StepAck};

use crate::error::{ReindexError, Result};
use crate::prepare::prepare_page;

/// What a successful step did. All three acknowledge identically to the
/// invoker; the distinction exists for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A cursor was opened over the source and the first data step was
    /// dispatched. No documents moved yet.
    CursorOpened,
    /// One page was copied to the target and the next step was dispatched.
    PageCopied { written: usize, failed: usize },
    /// The source is exhausted (or empty); nothing was dispatched.
    Finished,
}

impl StepOutcome {
    #[must_use]
    pub const fn ack(&self) -> StepAck {
        StepAck::ok()
    }
}

/// Drives one step of the copy per invocation and decides the next action.
///
/// The controller is stateless: everything it knows arrives in the payload,
/// everything it decides leaves in the dispatched payload or the returned
/// outcome. Collaborators are capability traits so deployments (and tests)
/// choose the transport.
pub struct ReindexController {
    gateway: Arc<dyn SearchGateway>,
    dispatcher: Arc<dyn Dispatcher>,
    config: ReindexConfig,
}

impl ReindexController {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn SearchGateway>,
        dispatcher: Arc<dyn Dispatcher>,
        config: ReindexConfig,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            config,
        }
    }

    /// Runs one step: validate, then open a cursor or advance the one the
    /// payload carries.
    pub async fn step(&self, request: JobRequest) -> Result<StepOutcome> {
        let job = request.resolve(&self.config)?;
        match job.scroll_id.clone() {
            None => self.open_cursor(&job).await,
            Some(token) => self.copy_page(&job, &token).await,
        }
    }

    /// First step of a lineage: acquire a cursor, hand the token to the next
    /// step. Opening and the first fetch are separate steps so each stays
    /// small and re-dispatchable.
    async fn open_cursor(&self, job: &JobDescriptor) -> Result<StepOutcome> {
        let token = self
            .gateway
            .open_cursor(
                &job.source_host,
                &job.source_index,
                &job.scroll,
                job.page.size,
                &job.page.filter,
            )
            .await
            .map_err(ReindexError::SourceUnavailable)?;

        let Some(token) = token else {
            log::info!(
                "no documents match in {}/{}; job finished at open",
                job.source_host,
                job.source_index
            );
            return Ok(StepOutcome::Finished);
        };

        self.dispatch_next(job, token).await?;
        Ok(StepOutcome::CursorOpened)
    }

    /// Data step: advance the cursor, copy the page, schedule the next step.
    async fn copy_page(&self, job: &JobDescriptor, token: &str) -> Result<StepOutcome> {
        let page = self
            .gateway
            .advance_cursor(&job.source_host, token, &job.scroll)
            .await
            .map_err(ReindexError::SourceUnavailable)?;

        if page.has_shard_failures() {
            // Cursor consistency is gone; drop the page even if non-empty.
            return Err(ReindexError::ShardFailure {
                failed: page.shards_failed,
                total: page.shards_total,
            });
        }

        let Some(next_token) = page.cursor_token else {
            log::info!("finished: {}/{} exhausted", job.source_host, job.source_index);
            return Ok(StepOutcome::Finished);
        };
        if page.documents.is_empty() {
            log::info!("finished: {}/{} exhausted", job.source_host, job.source_index);
            return Ok(StepOutcome::Finished);
        }

        let documents = prepare_page(page.documents, &job.target_index);
        let report = self
            .gateway
            .bulk_write(&job.target_host, &documents, job.write.chunk_size)
            .await
            .map_err(ReindexError::TargetUnavailable)?;

        let written = report.written;
        let failed = report.failed();
        if failed > 0 {
            // Per-record failures are final for this batch; operators watch
            // these counts.
            log::warn!(
                "bulk write to {}/{}: {written} written, {failed} failed",
                job.target_host,
                job.target_index
            );
            for failure in &report.failures {
                log::warn!(
                    "  failed id={} status={} reason={}",
                    failure.id,
                    failure.status,
                    failure.reason
                );
            }
        } else {
            log::info!(
                "bulk write to {}/{}: {written} written",
                job.target_host,
                job.target_index
            );
        }

        self.dispatch_next(job, next_token).await?;
        Ok(StepOutcome::PageCopied { written, failed })
    }

    /// Builds the next descriptor around the new token and hands it off.
    /// The acknowledgment to the current invoker does not wait on the
    /// dispatched step.
    async fn dispatch_next(&self, job: &JobDescriptor, token: String) -> Result<()> {
        let next = job.with_cursor(token);
        let payload = serde_json::to_value(&next)
            .map_err(reindex_dispatch::DispatchError::Serialization)?;
        self.dispatcher
            .dispatch_async(&next.lineage_id(), &payload)
            .await?;
        Ok(())
    }
}
