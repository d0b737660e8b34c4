use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DispatchError, Result};
use crate::Dispatcher;

/// HTTP client for the invocation substrate.
///
/// One POST per dispatch, bounded by the configured timeout. A non-success
/// status is surfaced as an error for the current step; nothing here retries
/// or observes whether the dispatched step ever ran.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDispatcher {
    /// Creates a dispatcher posting to `base_url`, e.g. the queue-ingestion
    /// endpoint that re-invokes the handler.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn step_url(&self, job_id: &str) -> String {
        format!(
            "{}/v1/jobs/{job_id}/steps",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch_async(&self, job_id: &str, payload: &Value) -> Result<()> {
        let url = self.step_url(job_id);
        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            log::debug!("dispatched next step for job {job_id}");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_url_shape() {
        let dispatcher =
            HttpDispatcher::new("http://substrate:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            dispatcher.step_url("ab12cd34"),
            "http://substrate:8080/v1/jobs/ab12cd34/steps"
        );
    }
}
