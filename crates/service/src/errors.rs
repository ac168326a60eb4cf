use thiserror::Error;

use crate::backend::errors::BackendError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Message suitable for inline display next to a form.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(m) => m.clone(),
            ServiceError::Model(models::errors::ModelError::Validation(m)) => m.clone(),
            other => other.to_string(),
        }
    }
}
