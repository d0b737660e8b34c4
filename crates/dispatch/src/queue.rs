use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DispatchError, Result};
use crate::Dispatcher;

/// One parked re-invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    pub job_id: String,
    pub payload: Value,
}

/// In-memory FIFO standing in for the invocation substrate.
///
/// Backs the synchronous/debug strategy: the inline driver drains it after
/// each step, which re-runs the controller in-process with exactly the
/// payloads the asynchronous path would have carried.
#[derive(Debug, Default)]
pub struct QueueDispatcher {
    entries: Mutex<VecDeque<DispatchEntry>>,
}

fn poison_err<T>(_: PoisonError<T>) -> DispatchError {
    DispatchError::QueuePoisoned
}

impl QueueDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest parked payload.
    pub fn take(&self) -> Result<Option<DispatchEntry>> {
        let mut entries = self.entries.lock().map_err(poison_err)?;
        Ok(entries.pop_front())
    }

    /// Removes and returns everything currently parked.
    pub fn drain(&self) -> Result<Vec<DispatchEntry>> {
        let mut entries = self.entries.lock().map_err(poison_err)?;
        Ok(entries.drain(..).collect())
    }

    /// Number of parked payloads.
    pub fn depth(&self) -> Result<usize> {
        let entries = self.entries.lock().map_err(poison_err)?;
        Ok(entries.len())
    }
}

#[async_trait]
impl Dispatcher for QueueDispatcher {
    async fn dispatch_async(&self, job_id: &str, payload: &Value) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poison_err)?;
        entries.push_back(DispatchEntry {
            job_id: job_id.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}
