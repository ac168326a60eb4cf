use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use models::lead::LeadStatus;
use serde::Deserialize;
use service::admin::leads::LeadsView;
use service::admin::LeadFilter;
use uuid::Uuid;

use super::auth::AdminContext;
use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/admin/leads", get(list))
        .route("/admin/leads/:id/status", put(set_status))
}

#[derive(Debug, Deserialize)]
pub struct LeadsParams {
    /// `all` or a lead status; omitted keeps the current filter.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusChange {
    pub status: LeadStatus,
}

#[utoipa::path(get, path = "/admin/leads", tag = "admin",
    params(("status" = Option<String>, Query, description = "all | new | contacted | qualified | converted | lost")),
    responses((status = 200, description = "Leads, newest first, with service names"), (status = 400, description = "Unknown filter"), (status = 401, description = "Not signed in")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Query(params): Query<LeadsParams>,
) -> Result<Json<LeadsView>, JsonApiError> {
    let filter = params
        .status
        .as_deref()
        .map(str::parse::<LeadFilter>)
        .transpose()
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?;

    let ws = state.workspaces.get(ctx.user.id).await;
    let mut ws = ws.lock().await;
    if let Some(filter) = filter {
        ws.leads.set_filter(filter);
    }
    ws.leads.refresh(state.tables.as_ref(), &ctx.caller).await;
    Ok(Json(ws.leads.view()))
}

#[utoipa::path(put, path = "/admin/leads/{id}/status", tag = "admin", request_body = crate::openapi::StatusChangeRequest,
    params(("id" = Uuid, Path, description = "Lead id")),
    responses((status = 200, description = "Status written, list re-fetched"), (status = 404, description = "Unknown lead"), (status = 401, description = "Not signed in")))]
pub async fn set_status(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusChange>,
) -> Result<Json<LeadsView>, JsonApiError> {
    let ws = state.workspaces.get(ctx.user.id).await;
    let mut ws = ws.lock().await;
    ws.leads.set_status(state.tables.as_ref(), &ctx.caller, id, body.status).await?;
    Ok(Json(ws.leads.view()))
}
