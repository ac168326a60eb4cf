use thiserror::Error;

/// Failures talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected by backend: {0}")]
    Rejected(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            BackendError::Transport(_) => 2001,
            BackendError::Unauthorized(_) => 2002,
            BackendError::Forbidden(_) => 2003,
            BackendError::NotFound(_) => 2004,
            BackendError::Rejected(_) => 2005,
            BackendError::Status { .. } => 2006,
            BackendError::Decode(_) => 2101,
            BackendError::Unavailable(_) => 2200,
        }
    }
}
