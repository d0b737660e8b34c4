use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Failures handing a payload to the invocation substrate.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("dispatch rejected with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("dispatch queue lock poisoned")]
    QueuePoisoned,
}
