use std::sync::Arc;
use std::time::Duration;

use configs::AdminConfig;
use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::leads::LeadTriage;
use super::panel::Panel;

/// Everything one signed-in admin has open in the dashboard.
#[derive(Default)]
pub struct AdminWorkspace {
    pub services: Panel<Service>,
    pub testimonials: Panel<Testimonial>,
    pub portfolio: Panel<PortfolioItem>,
    pub leads: LeadTriage,
}

pub type SharedWorkspace = Arc<Mutex<AdminWorkspace>>;

/// Workspaces keyed by admin user id; idle ones are evicted.
#[derive(Clone)]
pub struct Workspaces {
    cache: Cache<Uuid, SharedWorkspace>,
}

impl Workspaces {
    pub fn new(cfg: &AdminConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(cfg.max_workspaces)
            .time_to_idle(Duration::from_secs(cfg.workspace_ttl_secs))
            .build();
        Self { cache }
    }

    pub async fn get(&self, user_id: Uuid) -> SharedWorkspace {
        self.cache
            .get_with(user_id, async { Arc::new(Mutex::new(AdminWorkspace::default())) })
            .await
    }

    /// Drop the workspace on sign-out.
    pub async fn discard(&self, user_id: Uuid) {
        self.cache.invalidate(&user_id).await;
    }
}
