//! Quote wizard drafts. Each draft lives server-side under its id until submitted or closed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use service::quote::{Advance, FormPatch, Submission, WizardView};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/quote", post(open))
        .route("/api/quote/:id", get(view).patch(update).delete(close))
        .route("/api/quote/:id/next", post(next))
        .route("/api/quote/:id/back", post(back))
        .route("/api/quote/:id/services/retry", post(retry_services))
        .route("/api/quote/:id/submit", post(submit))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenQuote {
    /// Package chosen from a pricing card.
    #[serde(default)]
    pub service_id: Option<Uuid>,
}

#[utoipa::path(post, path = "/api/quote", tag = "quote", request_body = crate::openapi::OpenQuoteRequest,
    responses((status = 201, description = "Draft opened at the first step")))]
pub async fn open(State(state): State<ServerState>, body: Option<Json<OpenQuote>>) -> (StatusCode, Json<WizardView>) {
    let preselected = body.and_then(|Json(b)| b.service_id);
    (StatusCode::CREATED, Json(state.quotes.open(preselected).await))
}

#[utoipa::path(get, path = "/api/quote/{id}", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Current draft"), (status = 404, description = "Unknown or expired draft")))]
pub async fn view(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<WizardView>, JsonApiError> {
    Ok(Json(state.quotes.view(id).await?))
}

#[utoipa::path(patch, path = "/api/quote/{id}", tag = "quote", request_body = crate::openapi::FormPatchRequest,
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Fields merged"), (status = 404, description = "Unknown or expired draft")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FormPatch>,
) -> Result<Json<WizardView>, JsonApiError> {
    Ok(Json(state.quotes.update(id, patch).await?))
}

#[utoipa::path(post, path = "/api/quote/{id}/next", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Moved forward"), (status = 422, description = "Step requirements not met")))]
pub async fn next(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Response, JsonApiError> {
    let advance = state.quotes.next(id).await?;
    let status = match advance {
        Advance::Moved { .. } => StatusCode::OK,
        Advance::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    Ok((status, Json(advance)).into_response())
}

#[utoipa::path(post, path = "/api/quote/{id}/back", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Moved back, entered data kept")))]
pub async fn back(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<WizardView>, JsonApiError> {
    Ok(Json(state.quotes.back(id).await?))
}

#[utoipa::path(post, path = "/api/quote/{id}/services/retry", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 200, description = "Service list reloaded or failure shown")))]
pub async fn retry_services(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<WizardView>, JsonApiError> {
    Ok(Json(state.quotes.retry_services(id).await?))
}

#[utoipa::path(post, path = "/api/quote/{id}/submit", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 201, description = "Lead stored"),
        (status = 422, description = "Required data missing"),
        (status = 502, description = "Backend refused the lead, draft kept")))]
pub async fn submit(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Response, JsonApiError> {
    let submission = state.quotes.submit(id).await?;
    let status = match submission {
        Submission::Accepted { .. } => StatusCode::CREATED,
        Submission::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Submission::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(submission)).into_response())
}

#[utoipa::path(delete, path = "/api/quote/{id}", tag = "quote",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses((status = 204, description = "Draft discarded"), (status = 404, description = "Unknown or expired draft")))]
pub async fn close(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.quotes.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
