//! Public data access: the three collections shown on the marketing page.

use std::sync::Arc;

use models::portfolio::PortfolioItem;
use models::service::Service;
use models::testimonial::Testimonial;
use tracing::instrument;

use crate::backend::{select_as, Caller, Direction, Query, TableRepository};
use crate::errors::ServiceError;

pub fn active_services_query() -> Query {
    Query::new().eq("is_active", true).order("sort_order", Direction::Asc)
}

pub fn featured_query() -> Query {
    Query::new().eq("is_featured", true).order("created_at", Direction::Desc)
}

/// Read-only access made on behalf of anonymous visitors.
#[derive(Clone)]
pub struct ContentService {
    repo: Arc<dyn TableRepository>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn TableRepository>) -> Self { Self { repo } }

    /// Active services in display order.
    #[instrument(skip(self))]
    pub async fn active_services(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(select_as(self.repo.as_ref(), &Caller::Anonymous, &active_services_query()).await?)
    }

    /// Featured testimonials, newest first.
    #[instrument(skip(self))]
    pub async fn featured_testimonials(&self) -> Result<Vec<Testimonial>, ServiceError> {
        Ok(select_as(self.repo.as_ref(), &Caller::Anonymous, &featured_query()).await?)
    }

    /// Featured portfolio items, newest first.
    #[instrument(skip(self))]
    pub async fn featured_portfolio(&self) -> Result<Vec<PortfolioItem>, ServiceError> {
        Ok(select_as(self.repo.as_ref(), &Caller::Anonymous, &featured_query()).await?)
    }
}
