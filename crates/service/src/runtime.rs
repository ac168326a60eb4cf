//! Runtime environment helpers
//!
//! Wires the backend collaborator from configuration and re-exports
//! `common::env::ensure_env` so binaries only depend on `service`.

use std::sync::Arc;

use configs::BackendConfig;

use crate::auth::repository::AuthRepository;
use crate::backend::{BackendError, RestBackend, TableRepository};

/// Table and auth handles sharing one HTTP client.
#[derive(Clone)]
pub struct Backends {
    pub tables: Arc<dyn TableRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Backends {
    pub fn rest(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let rest = Arc::new(RestBackend::new(cfg)?);
        Ok(Self { tables: rest.clone(), auth: rest })
    }

    /// Same handles backed by one in-memory store.
    pub fn memory(backend: Arc<crate::backend::MemoryBackend>) -> Self {
        Self { tables: backend.clone(), auth: backend }
    }
}

/// Warn on a missing static asset directory.
pub async fn ensure_env(frontend_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir).await
}
