use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::auth::domain::{AdminSession, AdminUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::backend::errors::BackendError;
use crate::backend::rest::RestBackend;

#[derive(Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for AdminUser {
    fn from(u: UserBody) -> Self {
        AdminUser { id: u.id, email: u.email.unwrap_or_default() }
    }
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserBody,
}

#[async_trait]
impl AuthRepository for RestBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthError> {
        let req = self
            .client()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self.authorize(req, None).send().await.map_err(BackendError::from)?;
        let body: TokenBody = match RestBackend::handle_response(response).await {
            Ok(b) => b,
            Err(BackendError::Rejected(_)) | Err(BackendError::Unauthorized(_)) => {
                return Err(AuthError::InvalidCredentials)
            }
            Err(e) => return Err(e.into()),
        };
        let expires_at = body.expires_at.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0));
        Ok(AdminSession {
            user: body.user.into(),
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_at,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let req = self.client().post(self.auth_url("logout"));
        let response = self.authorize(req, Some(access_token)).send().await.map_err(BackendError::from)?;
        match RestBackend::check_status(response).await {
            Ok(_) => Ok(()),
            // 会话已失效时视为已登出
            Err(BackendError::Unauthorized(_)) | Err(BackendError::Forbidden(_)) | Err(BackendError::NotFound(_)) => {
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "sign_out failed");
                Err(e.into())
            }
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>, AuthError> {
        let req = self.client().get(self.auth_url("user"));
        let response = self.authorize(req, Some(access_token)).send().await.map_err(BackendError::from)?;
        match RestBackend::handle_response::<UserBody>(response).await {
            Ok(u) => Ok(Some(u.into())),
            Err(BackendError::Unauthorized(_)) | Err(BackendError::Forbidden(_)) | Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_body_decodes() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700000000,
            "refresh_token": "r1",
            "user": {"id": "7d1f0a52-54b4-4a7e-9d0c-2f0c6f1f5d11", "email": "admin@example.com", "role": "authenticated"}
        }"#;
        let t: TokenBody = serde_json::from_str(body).unwrap();
        assert_eq!(t.access_token, "jwt");
        assert_eq!(t.expires_at, Some(1_700_000_000));
        let user: AdminUser = t.user.into();
        assert_eq!(user.email, "admin@example.com");
    }
}
