use std::sync::Arc;

use configs::AppConfig;
use service::admin::Workspaces;
use service::auth::repository::AuthRepository;
use service::auth::AuthService;
use service::backend::TableRepository;
use service::content::ContentService;
use service::quote::{DraftStore, QuoteService};
use service::runtime::Backends;

/// Shared handles for every route.
#[derive(Clone)]
pub struct ServerState {
    pub tables: Arc<dyn TableRepository>,
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub content: ContentService,
    pub quotes: QuoteService,
    pub workspaces: Workspaces,
    /// `Secure` attribute on the session cookie.
    pub secure_cookie: bool,
}

impl ServerState {
    pub fn new(backends: Backends, cfg: &AppConfig) -> Self {
        let Backends { tables, auth } = backends;
        Self {
            content: ContentService::new(tables.clone()),
            quotes: QuoteService::new(tables.clone(), DraftStore::new(&cfg.quote)),
            auth: Arc::new(AuthService::new(auth)),
            workspaces: Workspaces::new(&cfg.admin),
            secure_cookie: cfg.admin.secure_cookie,
            tables,
        }
    }
}
