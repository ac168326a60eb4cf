use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("not signed in")]
    Unauthorized,
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::InvalidCredentials => 1002,
            AuthError::Unauthorized => 1004,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<crate::backend::errors::BackendError> for AuthError {
    fn from(e: crate::backend::errors::BackendError) -> Self {
        AuthError::Repository(e.to_string())
    }
}
