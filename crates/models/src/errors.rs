use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}
