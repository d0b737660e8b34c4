//! # Reindex Protocol
//!
//! Shared payload types for the reindex relay: the job descriptor carried
//! through every invocation, its validation/defaulting, the process-wide
//! configuration value, and the handler's acknowledgment shape.
//!
//! The descriptor is the only state that survives between steps — everything
//! a step needs travels inside it, and a re-dispatched descriptor is itself a
//! valid first-class payload.

mod ack;
mod config;
mod job;

pub use ack::{ErrorReply, StepAck};
pub use config::ReindexConfig;
pub use job::{
    BulkOptions, InvalidJob, JobDescriptor, JobRequest, PageOptions, ScanOptions, WriteOptions,
};
