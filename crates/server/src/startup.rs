use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::runtime::{self, Backends};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire the router over an already-built backend pair.
pub fn build_app(backends: Backends, cfg: &AppConfig) -> Router {
    let state = ServerState::new(backends, cfg);
    routes::build_router(state, &cfg.server.frontend_dir, build_cors())
}

/// Public entry: build the app against the hosted backend and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.server.frontend_dir).await?;

    let backends = Backends::rest(&cfg.backend).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(backends, &cfg);

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = %cfg.backend.url, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
