//! Admin content panels. One generic handler set serves services, testimonials and portfolio;
//! the panel state lives in the signed-in admin's workspace between requests.

use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post, put},
    Extension, Json, Router,
};
use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use serde::Deserialize;
use serde_json::Value;
use service::admin::{Managed, PanelView, SharedWorkspace};
use uuid::Uuid;

use super::auth::AdminContext;
use crate::errors::JsonApiError;
use crate::state::ServerState;

type PanelResult<T> = Result<Json<PanelView<T>>, JsonApiError>;

pub fn router() -> Router<ServerState> {
    panel_routes::<Service>("/admin/services")
        .merge(panel_routes::<Testimonial>("/admin/testimonials"))
        .merge(panel_routes::<PortfolioItem>("/admin/portfolio"))
        .route("/admin/services/draft/features", post(add_feature))
        .route("/admin/services/draft/features/:index", put(update_feature).delete(remove_feature))
        .route("/admin/portfolio/draft/results", post(add_result))
        .route("/admin/portfolio/draft/results/:key", put(edit_result).delete(remove_result))
}

fn panel_routes<T: Managed>(base: &str) -> Router<ServerState> {
    let mut router = Router::new()
        .route(base, get(list::<T>))
        .route(&format!("{base}/:id/edit"), post(start_edit::<T>))
        .route(&format!("{base}/:id/toggle"), post(toggle::<T>))
        .route(&format!("{base}/draft"), patch(patch_draft::<T>))
        .route(&format!("{base}/draft/save"), post(save::<T>))
        .route(&format!("{base}/draft/cancel"), post(cancel::<T>));
    if T::blank().is_some() {
        router = router.route(&format!("{base}/add"), post(start_add::<T>));
    }
    if T::CAN_DELETE {
        router = router.route(&format!("{base}/:id"), delete(remove::<T>));
    }
    router
}

async fn workspace(state: &ServerState, ctx: &AdminContext) -> SharedWorkspace {
    state.workspaces.get(ctx.user.id).await
}

/// Re-fetch the whole table and show it.
pub async fn list<T: Managed>(State(state): State<ServerState>, Extension(ctx): Extension<AdminContext>) -> Json<PanelView<T>> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.refresh(state.tables.as_ref(), &ctx.caller).await;
    Json(panel.view())
}

pub async fn start_add<T: Managed>(State(state): State<ServerState>, Extension(ctx): Extension<AdminContext>) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.start_add()?;
    Ok(Json(panel.view()))
}

pub async fn start_edit<T: Managed>(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<Uuid>,
) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.start_edit(id)?;
    Ok(Json(panel.view()))
}

pub async fn patch_draft<T: Managed>(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Json(fields): Json<Value>,
) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.patch_draft(fields)?;
    Ok(Json(panel.view()))
}

pub async fn save<T: Managed>(State(state): State<ServerState>, Extension(ctx): Extension<AdminContext>) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.save(state.tables.as_ref(), &ctx.caller).await?;
    Ok(Json(panel.view()))
}

pub async fn cancel<T: Managed>(State(state): State<ServerState>, Extension(ctx): Extension<AdminContext>) -> Json<PanelView<T>> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.cancel();
    Json(panel.view())
}

pub async fn toggle<T: Managed>(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<Uuid>,
) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.toggle(state.tables.as_ref(), &ctx.caller, id).await?;
    Ok(Json(panel.view()))
}

pub async fn remove<T: Managed>(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<Uuid>,
) -> PanelResult<T> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let panel = T::panel(&mut ws);
    panel.delete(state.tables.as_ref(), &ctx.caller, id).await?;
    Ok(Json(panel.view()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureText {
    pub value: String,
}

#[utoipa::path(post, path = "/admin/services/draft/features", tag = "admin",
    responses((status = 200, description = "Empty feature appended to the open draft"), (status = 422, description = "No open draft"), (status = 401, description = "Not signed in")))]
pub async fn add_feature(State(state): State<ServerState>, Extension(ctx): Extension<AdminContext>) -> PanelResult<Service> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    ws.services.add_feature()?;
    Ok(Json(ws.services.view()))
}

#[utoipa::path(put, path = "/admin/services/draft/features/{index}", tag = "admin", request_body = crate::openapi::FeatureTextRequest,
    params(("index" = usize, Path, description = "Feature position")),
    responses((status = 200, description = "Feature text replaced"), (status = 422, description = "No open draft or index out of range"), (status = 401, description = "Not signed in")))]
pub async fn update_feature(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(index): Path<usize>,
    Json(body): Json<FeatureText>,
) -> PanelResult<Service> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    ws.services.update_feature(index, body.value)?;
    Ok(Json(ws.services.view()))
}

#[utoipa::path(delete, path = "/admin/services/draft/features/{index}", tag = "admin",
    params(("index" = usize, Path, description = "Feature position")),
    responses((status = 200, description = "Feature removed"), (status = 422, description = "No open draft or index out of range"), (status = 401, description = "Not signed in")))]
pub async fn remove_feature(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(index): Path<usize>,
) -> PanelResult<Service> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    ws.services.remove_feature(index)?;
    Ok(Json(ws.services.view()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewResult {
    pub key: String,
    pub value: String,
}

/// Rename, revalue, or both. Rename applies first.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultEdit {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[utoipa::path(post, path = "/admin/portfolio/draft/results", tag = "admin", request_body = crate::openapi::NewResultRequest,
    responses((status = 200, description = "Result added to the open draft"), (status = 422, description = "No open draft, empty or duplicate name"), (status = 401, description = "Not signed in")))]
pub async fn add_result(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Json(body): Json<NewResult>,
) -> PanelResult<PortfolioItem> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    ws.portfolio.add_result(&body.key, body.value)?;
    Ok(Json(ws.portfolio.view()))
}

#[utoipa::path(put, path = "/admin/portfolio/draft/results/{key}", tag = "admin", request_body = crate::openapi::ResultEditRequest,
    params(("key" = String, Path, description = "Current result name")),
    responses((status = 200, description = "Result renamed or revalued"), (status = 422, description = "Empty or duplicate name"), (status = 404, description = "Unknown result"), (status = 401, description = "Not signed in")))]
pub async fn edit_result(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(key): Path<String>,
    Json(body): Json<ResultEdit>,
) -> PanelResult<PortfolioItem> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    let mut current = key;
    if let Some(to) = body.key {
        ws.portfolio.rename_result(&current, &to)?;
        current = to.trim().to_string();
    }
    if let Some(value) = body.value {
        ws.portfolio.set_result(&current, value)?;
    }
    Ok(Json(ws.portfolio.view()))
}

#[utoipa::path(delete, path = "/admin/portfolio/draft/results/{key}", tag = "admin",
    params(("key" = String, Path, description = "Result name")),
    responses((status = 200, description = "Result removed"), (status = 404, description = "Unknown result"), (status = 401, description = "Not signed in")))]
pub async fn remove_result(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AdminContext>,
    Path(key): Path<String>,
) -> PanelResult<PortfolioItem> {
    let ws = workspace(&state, &ctx).await;
    let mut ws = ws.lock().await;
    ws.portfolio.remove_result(&key)?;
    Ok(Json(ws.portfolio.view()))
}
