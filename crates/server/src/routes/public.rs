//! Public site: content sections, shell view resolution, health and metrics.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use common::types::Health;
use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use serde::Deserialize;
use service::site::{resolve_view, ShellView, SitePage};
use utoipa::OpenApi;

use super::auth::session_token;
use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/view", get(view))
        .route("/api/site", get(site))
        .route("/api/services", get(services))
        .route("/api/testimonials", get(testimonials))
        .route("/api/portfolio", get(portfolio))
}

#[utoipa::path(get, path = "/health", tag = "public", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/metrics", tag = "public", responses((status = 200, description = "Prometheus text format")))]
pub async fn metrics() -> impl IntoResponse {
    match service::metrics::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        Err(e) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "metrics_error", Some(e.to_string()))
            .into_response(),
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub path: Option<String>,
}

/// Which shell the given path shows. A missing or stale session falls back to the login form.
#[utoipa::path(get, path = "/api/view", tag = "public",
    params(("path" = Option<String>, Query, description = "Location path, defaults to /")),
    responses((status = 200, description = "public | admin_login | admin_dashboard")))]
pub async fn view(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(params): Query<ViewParams>,
) -> Json<ShellView> {
    let path = params.path.as_deref().unwrap_or("/");
    let user = match session_token(&headers) {
        Some(token) => state.auth.current_user(&token).await.ok(),
        None => None,
    };
    Json(resolve_view(path, user.as_ref()))
}

/// Whole landing page; each dynamic section reports its own failure.
#[utoipa::path(get, path = "/api/site", tag = "public", responses((status = 200, description = "Static copy plus dynamic sections")))]
pub async fn site(State(state): State<ServerState>) -> Json<SitePage> {
    Json(SitePage::load(&state.content).await)
}

#[utoipa::path(get, path = "/api/services", tag = "public",
    responses((status = 200, description = "Active services by sort order"), (status = 502, description = "Backend unavailable")))]
pub async fn services(State(state): State<ServerState>) -> Result<Json<Vec<Service>>, JsonApiError> {
    Ok(Json(state.content.active_services().await?))
}

#[utoipa::path(get, path = "/api/testimonials", tag = "public",
    responses((status = 200, description = "Featured testimonials, newest first"), (status = 502, description = "Backend unavailable")))]
pub async fn testimonials(State(state): State<ServerState>) -> Result<Json<Vec<Testimonial>>, JsonApiError> {
    Ok(Json(state.content.featured_testimonials().await?))
}

#[utoipa::path(get, path = "/api/portfolio", tag = "public",
    responses((status = 200, description = "Featured portfolio items, newest first"), (status = 502, description = "Backend unavailable")))]
pub async fn portfolio(State(state): State<ServerState>) -> Result<Json<Vec<PortfolioItem>>, JsonApiError> {
    Ok(Json(state.content.featured_portfolio().await?))
}
