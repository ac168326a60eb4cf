//! Backend collaborator: table CRUD and session auth over the hosted REST API.
//!
//! `TableRepository` moves untyped JSON rows; the helpers below decode them
//! into `models` records and record per-table metrics.

pub mod errors;
pub mod mock;
pub mod query;
pub mod repository;
pub mod rest;

pub use errors::BackendError;
pub use mock::MemoryBackend;
pub use query::{Direction, Query};
pub use repository::{Caller, TableRepository};
pub use rest::RestBackend;

use chrono::Utc;
use models::{Record, Table};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::metrics::{record_backend, BACKEND_REQUEST_DURATION};

fn observe<T>(table: Table, op: &str, result: &Result<T, BackendError>) {
    record_backend(table.name(), op, result.is_ok());
    if let Err(e) = result {
        warn!(table = %table, op = op, code = e.code(), error = %e, "backend request failed");
    }
}

pub async fn select_as<T: Record>(
    repo: &dyn TableRepository,
    caller: &Caller,
    query: &Query,
) -> Result<Vec<T>, BackendError> {
    let _timer = BACKEND_REQUEST_DURATION.with_label_values(&["select"]).start_timer();
    let result = match repo.select(caller, T::TABLE, query).await {
        Ok(rows) => rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(BackendError::from))
            .collect(),
        Err(e) => Err(e),
    };
    observe(T::TABLE, "select", &result);
    result
}

pub async fn insert_row<B: Serialize>(
    repo: &dyn TableRepository,
    caller: &Caller,
    table: Table,
    row: &B,
) -> Result<(), BackendError> {
    let _timer = BACKEND_REQUEST_DURATION.with_label_values(&["insert"]).start_timer();
    let result = match serde_json::to_value(row) {
        Ok(row) => repo.insert(caller, table, row).await,
        Err(e) => Err(e.into()),
    };
    observe(table, "insert", &result);
    result
}

/// Update by id; `patch` is stamped with a fresh `updated_at` first.
pub async fn update_as<T: Record>(
    repo: &dyn TableRepository,
    caller: &Caller,
    id: Uuid,
    patch: Value,
) -> Result<T, BackendError> {
    let _timer = BACKEND_REQUEST_DURATION.with_label_values(&["update"]).start_timer();
    let result = match repo.update(caller, T::TABLE, id, touch(patch)).await {
        Ok(row) => serde_json::from_value(row).map_err(BackendError::from),
        Err(e) => Err(e),
    };
    observe(T::TABLE, "update", &result);
    result
}

pub async fn delete_row(
    repo: &dyn TableRepository,
    caller: &Caller,
    table: Table,
    id: Uuid,
) -> Result<bool, BackendError> {
    let _timer = BACKEND_REQUEST_DURATION.with_label_values(&["delete"]).start_timer();
    let result = repo.delete(caller, table, id).await;
    observe(table, "delete", &result);
    result
}

/// Add `updated_at = now` to an object patch.
pub fn touch(mut patch: Value) -> Value {
    if let Value::Object(obj) = &mut patch {
        obj.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::testimonial::Testimonial;
    use serde_json::json;

    #[test]
    fn touch_only_adds_timestamp() {
        let p = touch(json!({"is_featured": false}));
        let obj = p.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["is_featured"], false);
        assert!(obj["updated_at"].is_string());
    }

    #[tokio::test]
    async fn select_as_decodes_rows() -> anyhow::Result<()> {
        let db = MemoryBackend::new();
        db.seed(
            Table::Testimonials,
            vec![json!({
                "client_name": "Mike", "client_company": "Mike's HVAC", "client_role": "Owner",
                "testimonial_text": "Phones ringing", "rating": 5, "is_featured": true
            })],
        );
        let rows: Vec<Testimonial> = select_as(&db, &Caller::Anonymous, &Query::new()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_company, "Mike's HVAC");
        Ok(())
    }
}
