use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Transport- and protocol-level failures talking to a search cluster.
///
/// Shard failures are deliberately not represented here — they arrive as
/// counters inside a successfully decoded page.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search cluster returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
