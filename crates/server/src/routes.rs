use std::path::Path;

use axum::{middleware, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::ServerState;

pub mod admin;
pub mod auth;
pub mod leads;
pub mod public;
pub mod quote;

/// Build the full application router: public content, quote wizard, admin auth,
/// session-guarded admin panels, and the static shell as fallback.
pub fn build_router(state: ServerState, frontend_dir: &str, cors: CorsLayer) -> Router {
    let index = Path::new(frontend_dir).join("index.html");
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    // 需要登录的后台接口
    let admin_routes = admin::router()
        .merge(leads::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    Router::new()
        .merge(public::router())
        .merge(quote::router())
        .merge(auth::router())
        .merge(admin_routes)
        .with_state(state)
        .fallback_service(static_dir)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                // 请求到达时打点
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
