use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use service::auth::domain::{AdminUser, LoginInput};
use service::auth::errors::AuthError;
use service::backend::Caller;
use tracing::warn;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const SESSION_COOKIE: &str = "auth_token";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Signed-in admin attached to guarded requests.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user: AdminUser,
    /// Backend calls made on the admin's behalf carry their token.
    pub caller: Caller,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Bearer header first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Signed in, session cookie set"), (status = 400, description = "Missing fields"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;

    // 设置 HttpOnly Cookie，浏览器端无需手动携带 token
    let mut cookie = Cookie::new(SESSION_COOKIE, session.access_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.secure_cookie);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(LoginOutput { user_id: session.user.id, email: session.user.email, token: session.access_token }),
    ))
}

/// Ends the backend session and clears the cookie. Backend failures are logged, not returned.
#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Signed out")))]
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(token) = session_token(&headers) {
        if let Ok(user) = state.auth.current_user(&token).await {
            state.workspaces.discard(user.id).await;
        }
        if let Err(e) = state.auth.logout(&token).await {
            warn!(error = %e, "sign out failed");
        }
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current admin"), (status = 401, description = "Not signed in")))]
pub async fn me(State(state): State<ServerState>, headers: HeaderMap) -> Result<Json<AdminUser>, JsonApiError> {
    let token = session_token(&headers).ok_or_else(|| JsonApiError::unauthorized("sign in required"))?;
    Ok(Json(state.auth.current_user(&token).await?))
}

/// Guard for admin routes: resolves the session with the backend and attaches [`AdminContext`].
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(token) = session_token(req.headers()) else {
        warn!(path = %req.uri().path(), "missing session token");
        return Err(JsonApiError::unauthorized("sign in required"));
    };
    let user = match state.auth.current_user(&token).await {
        Ok(user) => user,
        Err(e @ AuthError::Repository(_)) => return Err(e.into()),
        Err(e) => {
            warn!(path = %req.uri().path(), error = %e, "session rejected");
            return Err(JsonApiError::unauthorized("session expired, sign in again"));
        }
    };
    req.extensions_mut().insert(AdminContext { user, caller: Caller::Bearer(token) });
    Ok(next.run(req).await)
}
