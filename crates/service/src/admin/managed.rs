use models::errors::ModelError;
use models::portfolio::{PortfolioDraft, PortfolioItem};
use models::service::{Service, ServiceDraft};
use models::testimonial::{Testimonial, TestimonialDraft};
use models::Record;
use serde::{de::DeserializeOwned, Serialize};

use super::panel::Panel;
use super::workspace::AdminWorkspace;
use crate::backend::{Direction, Query};

/// A record type with an admin management panel.
pub trait Managed: Record {
    type Draft: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Singular noun used in messages.
    const LABEL: &'static str;
    /// The boolean column the panel's toggle flips.
    const FLAG: &'static str;
    const CAN_DELETE: bool;

    /// Admins see every row, visible or not.
    fn list_query() -> Query;
    fn flag(&self) -> bool;
    fn to_draft(&self) -> Self::Draft;
    /// Blank add form; `None` when the panel has no add.
    fn blank() -> Option<Self::Draft>;
    fn validate(draft: &Self::Draft) -> Result<(), ModelError>;
    fn panel(ws: &mut AdminWorkspace) -> &mut Panel<Self>;
}

impl Managed for Service {
    type Draft = ServiceDraft;
    const LABEL: &'static str = "service";
    const FLAG: &'static str = "is_active";
    const CAN_DELETE: bool = false;

    fn list_query() -> Query {
        Query::new().order("sort_order", Direction::Asc)
    }
    fn flag(&self) -> bool { self.is_active }
    fn to_draft(&self) -> ServiceDraft { Service::to_draft(self) }
    fn blank() -> Option<ServiceDraft> { None }
    fn validate(draft: &ServiceDraft) -> Result<(), ModelError> { draft.validate() }
    fn panel(ws: &mut AdminWorkspace) -> &mut Panel<Self> { &mut ws.services }
}

impl Managed for Testimonial {
    type Draft = TestimonialDraft;
    const LABEL: &'static str = "testimonial";
    const FLAG: &'static str = "is_featured";
    const CAN_DELETE: bool = true;

    fn list_query() -> Query {
        Query::new().order("created_at", Direction::Desc)
    }
    fn flag(&self) -> bool { self.is_featured }
    fn to_draft(&self) -> TestimonialDraft { Testimonial::to_draft(self) }
    fn blank() -> Option<TestimonialDraft> { Some(TestimonialDraft::default()) }
    fn validate(draft: &TestimonialDraft) -> Result<(), ModelError> { draft.validate() }
    fn panel(ws: &mut AdminWorkspace) -> &mut Panel<Self> { &mut ws.testimonials }
}

impl Managed for PortfolioItem {
    type Draft = PortfolioDraft;
    const LABEL: &'static str = "portfolio item";
    const FLAG: &'static str = "is_featured";
    const CAN_DELETE: bool = true;

    fn list_query() -> Query {
        Query::new().order("created_at", Direction::Desc)
    }
    fn flag(&self) -> bool { self.is_featured }
    fn to_draft(&self) -> PortfolioDraft { PortfolioItem::to_draft(self) }
    fn blank() -> Option<PortfolioDraft> { Some(PortfolioDraft::default()) }
    fn validate(draft: &PortfolioDraft) -> Result<(), ModelError> { draft.validate() }
    fn panel(ws: &mut AdminWorkspace) -> &mut Panel<Self> { &mut ws.portfolio }
}
