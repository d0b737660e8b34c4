use serde::{Deserialize, Serialize};

/// Success acknowledgment returned to the invoker: `{"acknowledged": true}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepAck {
    pub acknowledged: bool,
}

impl StepAck {
    #[must_use]
    pub const fn ok() -> Self {
        Self { acknowledged: true }
    }
}

/// Fatal error result returned to the invoker: `{"error": "<message>"}`.
/// No further dispatch occurs once this is produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
