//! In-memory stand-in for the hosted backend, used by tests and local demos.
//!
//! Access rules follow the row-level policies the real project is set up with:
//! anonymous callers may read services, testimonials and portfolio and may
//! insert leads; everything else requires a live admin session.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use models::Table;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::BackendError;
use super::query::Query;
use super::repository::{Caller, TableRepository};
use crate::auth::domain::{AdminSession, AdminUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::{mock::MockAuthRepository, AuthRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    failing: Mutex<HashSet<Table>>,
    auth: MockAuthRepository,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    pub fn with_admin(self, email: &str, password: &str) -> Self {
        self.auth.add_admin(email, password);
        self
    }

    /// Store rows as-is, filling `id` and timestamps when absent.
    pub fn seed(&self, table: Table, rows: Vec<Value>) -> Vec<Uuid> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let stored = tables.entry(table).or_default();
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            if let Value::Object(obj) = row {
                let obj = with_defaults(obj);
                ids.push(row_id(&obj).unwrap_or_default());
                stored.push(Value::Object(obj));
            }
        }
        ids
    }

    /// Snapshot of a table for assertions.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.get(&table).cloned().unwrap_or_default()
    }

    /// Make every request against `table` fail until [`MemoryBackend::restore`].
    pub fn fail(&self, table: Table) {
        self.failing.lock().unwrap_or_else(|e| e.into_inner()).insert(table);
    }

    pub fn restore(&self, table: Table) {
        self.failing.lock().unwrap_or_else(|e| e.into_inner()).remove(&table);
    }

    fn check(&self, caller: &Caller, table: Table, op: Op) -> Result<(), BackendError> {
        if self.failing.lock().unwrap_or_else(|e| e.into_inner()).contains(&table) {
            return Err(BackendError::Unavailable(format!("{} is unavailable", table)));
        }
        match caller {
            Caller::Bearer(token) => {
                if self.auth.user_for(token).is_none() {
                    return Err(BackendError::Unauthorized("invalid or expired session".into()));
                }
                Ok(())
            }
            Caller::Anonymous => {
                let allowed = match op {
                    Op::Select => matches!(table, Table::Services | Table::Testimonials | Table::Portfolio),
                    Op::Insert => table == Table::Leads,
                    Op::Update | Op::Delete => false,
                };
                if allowed {
                    Ok(())
                } else {
                    Err(BackendError::Forbidden(format!("row-level security denies {:?} on {}", op, table)))
                }
            }
        }
    }
}

fn row_id(obj: &Map<String, Value>) -> Option<Uuid> {
    obj.get("id").and_then(Value::as_str).and_then(|s| s.parse().ok())
}

fn with_defaults(mut obj: Map<String, Value>) -> Map<String, Value> {
    let now = Value::String(Utc::now().to_rfc3339());
    obj.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    obj.entry("created_at").or_insert_with(|| now.clone());
    obj.entry("updated_at").or_insert(now);
    obj
}

#[async_trait]
impl TableRepository for MemoryBackend {
    async fn select(&self, caller: &Caller, table: Table, query: &Query) -> Result<Vec<Value>, BackendError> {
        self.check(caller, table, Op::Select)?;
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tables.get(&table).map(|rows| query.apply(rows)).unwrap_or_default())
    }

    async fn insert(&self, caller: &Caller, table: Table, row: Value) -> Result<(), BackendError> {
        self.check(caller, table, Op::Insert)?;
        let Value::Object(obj) = row else {
            return Err(BackendError::Rejected("row must be a JSON object".into()));
        };
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.entry(table).or_default().push(Value::Object(with_defaults(obj)));
        Ok(())
    }

    async fn update(&self, caller: &Caller, table: Table, id: Uuid, patch: Value) -> Result<Value, BackendError> {
        self.check(caller, table, Op::Update)?;
        let Value::Object(patch) = patch else {
            return Err(BackendError::Rejected("patch must be a JSON object".into()));
        };
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| r.as_object().and_then(row_id) == Some(id)))
            .ok_or_else(|| BackendError::NotFound(format!("{} row {}", table, id)))?;
        if let Value::Object(obj) = &mut *row {
            for (k, v) in patch {
                obj.insert(k, v);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, caller: &Caller, table: Table, id: Uuid) -> Result<bool, BackendError> {
        self.check(caller, table, Op::Delete)?;
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let Some(rows) = tables.get_mut(&table) else { return Ok(false) };
        let before = rows.len();
        rows.retain(|r| r.as_object().and_then(row_id) != Some(id));
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl AuthRepository for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthError> {
        self.auth.sign_in(email, password).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.auth.sign_out(access_token).await
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>, AuthError> {
        self.auth.current_user(access_token).await
    }
}
