use async_trait::async_trait;
use models::Table;
use serde_json::Value;
use uuid::Uuid;

use super::errors::BackendError;
use super::query::Query;

/// Who a backend request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Public visitor, authorised by the anon key only.
    Anonymous,
    /// Signed-in admin carrying a session access token.
    Bearer(String),
}

impl Caller {
    pub fn token(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::Bearer(t) => Some(t),
        }
    }
}

/// Table-level access to the hosted backend. Rows travel as JSON objects.
#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn select(&self, caller: &Caller, table: Table, query: &Query) -> Result<Vec<Value>, BackendError>;
    /// Insert one row without reading it back.
    async fn insert(&self, caller: &Caller, table: Table, row: Value) -> Result<(), BackendError>;
    /// Update the row with `id` and return it; `NotFound` when no row matched.
    async fn update(&self, caller: &Caller, table: Table, id: Uuid, patch: Value) -> Result<Value, BackendError>;
    /// Returns whether a row was removed.
    async fn delete(&self, caller: &Caller, table: Table, id: Uuid) -> Result<bool, BackendError>;
}
