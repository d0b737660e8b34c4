//! # Reindex Core
//!
//! The replication state machine. One invocation = one step:
//!
//! ```text
//! payload without cursor token ──> Validate ──> OpenCursor ──┬─> dispatch next
//! payload with cursor token    ──> Validate ──> Continue  ───┤
//!                                                            └─> Done (no dispatch)
//! ```
//!
//! Progress lives entirely in the cursor token carried by the dispatched
//! payload; the controller itself stores nothing between steps. Duplicate
//! delivery of a step may rewrite a page — target writes are keyed upserts,
//! a property the operator provides and the controller assumes.

mod controller;
mod driver;
mod error;
mod prepare;

pub use controller::{ReindexController, StepOutcome};
pub use driver::{drive_to_completion, DriveReport};
pub use error::{ReindexError, Result};
pub use prepare::prepare_page;
