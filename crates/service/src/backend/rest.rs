use std::time::Duration;

use async_trait::async_trait;
use configs::BackendConfig;
use models::Table;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::errors::BackendError;
use super::query::Query;
use super::repository::{Caller, TableRepository};

/// Error body shapes returned by the REST and auth endpoints.
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ApiErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description)
    }
}

/// HTTP client for the hosted backend's table and auth endpoints.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl RestBackend {
    pub fn new(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            anon_key: cfg.anon_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Every request carries the anon key; the bearer is the session token when there is one.
    pub(crate) fn authorize(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        // 尝试解析为后端错误响应，失败则使用原始文本
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .and_then(ApiErrorResponse::into_message)
            .unwrap_or(text);
        Err(match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message),
            StatusCode::FORBIDDEN => BackendError::Forbidden(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                BackendError::Rejected(message)
            }
            _ => BackendError::Status { status: status.as_u16(), message },
        })
    }
}

#[async_trait]
impl TableRepository for RestBackend {
    #[instrument(skip(self, caller, query), fields(table = %table))]
    async fn select(&self, caller: &Caller, table: Table, query: &Query) -> Result<Vec<Value>, BackendError> {
        let req = self.client.get(self.table_url(table)).query(&query.to_params());
        let response = self.authorize(req, caller.token()).send().await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        debug!(rows = rows.len(), "select ok");
        Ok(rows)
    }

    #[instrument(skip(self, caller, row), fields(table = %table))]
    async fn insert(&self, caller: &Caller, table: Table, row: Value) -> Result<(), BackendError> {
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&[row]);
        let response = self.authorize(req, caller.token()).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, caller, patch), fields(table = %table, id = %id))]
    async fn update(&self, caller: &Caller, table: Table, id: Uuid, patch: Value) -> Result<Value, BackendError> {
        let req = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.authorize(req, caller.token()).send().await?;
        let mut rows: Vec<Value> = Self::handle_response(response).await?;
        rows.pop().ok_or_else(|| BackendError::NotFound(format!("{} row {}", table, id)))
    }

    #[instrument(skip(self, caller), fields(table = %table, id = %id))]
    async fn delete(&self, caller: &Caller, table: Table, id: Uuid) -> Result<bool, BackendError> {
        let req = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let response = self.authorize(req, caller.token()).send().await?;
        let rows: Vec<Value> = Self::handle_response(response).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new(&BackendConfig {
            url: "https://demo.supabase.co/".into(),
            anon_key: "anon-key".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn urls_are_built_from_base() {
        let b = backend();
        assert_eq!(b.base_url(), "https://demo.supabase.co");
        assert_eq!(b.table_url(Table::Portfolio), "https://demo.supabase.co/rest/v1/portfolio");
        assert_eq!(b.auth_url("user"), "https://demo.supabase.co/auth/v1/user");
    }

    #[test]
    fn bearer_falls_back_to_anon_key() {
        let b = backend();
        let anon = b.authorize(b.client.get("https://demo.supabase.co/x"), None).build().unwrap();
        assert_eq!(anon.headers()["apikey"], "anon-key");
        assert_eq!(anon.headers()[header::AUTHORIZATION], "Bearer anon-key");

        let signed = b.authorize(b.client.get("https://demo.supabase.co/x"), Some("tok")).build().unwrap();
        assert_eq!(signed.headers()[header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy"}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_message().as_deref(), Some("new row violates row-level security policy"));

        let auth_body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(auth_body).unwrap();
        assert_eq!(parsed.into_message().as_deref(), Some("Invalid login credentials"));
    }
}
