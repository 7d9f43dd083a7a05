use std::fmt;

use thiserror::Error;

/// Which leg of a read-modify-write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStage {
    Read,
    Write,
}

impl fmt::Display for SinkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkStage::Read  => f.write_str("accessing"),
            SinkStage::Write => f.write_str("updating"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `body` is the upstream error payload.
    #[error("Error {stage} results store [{status}]: {body}")]
    Upstream { stage: SinkStage, status: u16, body: String },

    #[error("Malformed response from results store: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Results sink misconfigured: {0}")]
    Misconfigured(String),
}

pub type Result<T> = std::result::Result<T, SinkError>;
