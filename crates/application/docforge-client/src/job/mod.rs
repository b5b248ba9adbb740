pub mod backend;
pub mod channel;
pub mod engine;
pub mod resolver;

/// High-level error type for job submission.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Missing auth token or user id. Raised before any network traffic.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("owner and repo must be non-empty")]
    InvalidTarget,
    #[error("invalid service endpoint: {0}")]
    Endpoint(String),
    #[error("terminal request failed: {0}")]
    Terminal(String),
}

/// The raw terminal response, before outcome classification.
#[derive(Debug, Clone)]
pub struct TerminalResponse {
    pub status: u16,
    pub body: Vec<u8>,
}
