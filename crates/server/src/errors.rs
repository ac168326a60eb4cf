use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::backend::BackendError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", Some(message.into()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, title = self.title, message = ?self.message, "request failed");
        }
        let body = serde_json::json!({ "error": self.title, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

fn from_backend(e: &BackendError) -> JsonApiError {
    match e {
        // 会话过期或被后端拒绝时按未登录处理
        BackendError::Unauthorized(_) => JsonApiError::unauthorized(e.to_string()),
        BackendError::Forbidden(_) => JsonApiError::new(StatusCode::FORBIDDEN, "forbidden", Some(e.to_string())),
        BackendError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "not_found", Some(e.to_string())),
        _ => JsonApiError::new(StatusCode::BAD_GATEWAY, "backend_error", Some(e.to_string())),
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
                JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", Some(e.user_message()))
            }
            ServiceError::Model(ModelError::Unknown { .. }) => {
                JsonApiError::new(StatusCode::NOT_FOUND, "not_found", Some(e.to_string()))
            }
            ServiceError::NotFound(m) => JsonApiError::new(StatusCode::NOT_FOUND, "not_found", Some(m.clone())),
            ServiceError::Unauthorized => JsonApiError::unauthorized("sign in required"),
            ServiceError::Backend(b) => from_backend(b),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => JsonApiError::bad_request(m),
            AuthError::InvalidCredentials | AuthError::Unauthorized => JsonApiError::unauthorized(e.to_string()),
            AuthError::Repository(m) => JsonApiError::new(StatusCode::BAD_GATEWAY, "auth_backend_error", Some(m)),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl IntoResponse for StartupError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let msg = self.to_string();
        error!(error = %msg, "startup error");
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
