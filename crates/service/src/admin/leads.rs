use std::str::FromStr;

use models::lead::{Lead, LeadStatus};
use models::service::Service;
use serde::{Serialize, Serializer};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend::{select_as, update_as, Caller, Direction, Query, TableRepository};
use crate::errors::ServiceError;

pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Client-side status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadFilter {
    #[default]
    All,
    Status(LeadStatus),
}

impl LeadFilter {
    pub fn matches(self, lead: &Lead) -> bool {
        match self {
            LeadFilter::All => true,
            LeadFilter::Status(s) => lead.status == s,
        }
    }
}

impl FromStr for LeadFilter {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(LeadFilter::All);
        }
        Ok(LeadFilter::Status(s.parse()?))
    }
}

impl Serialize for LeadFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LeadFilter::All => serializer.serialize_str("all"),
            LeadFilter::Status(s) => serializer.serialize_str(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadRow {
    #[serde(flatten)]
    pub lead: Lead,
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadsView {
    pub filter: LeadFilter,
    pub statuses: [LeadStatus; 5],
    pub total: usize,
    pub leads: Vec<LeadRow>,
    pub error: Option<String>,
}

/// Lead list plus the service names needed to label it.
#[derive(Debug, Default)]
pub struct LeadTriage {
    leads: Vec<Lead>,
    services: Vec<Service>,
    filter: LeadFilter,
    load_error: Option<String>,
}

impl LeadTriage {
    pub fn leads(&self) -> &[Lead] { &self.leads }

    pub fn filter(&self) -> LeadFilter { self.filter }

    pub fn set_filter(&mut self, filter: LeadFilter) {
        self.filter = filter;
    }

    /// Fetch all leads (newest first) and all services together.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self, repo: &dyn TableRepository, caller: &Caller) {
        let leads_query = Query::new().order("created_at", Direction::Desc);
        let services_query = Query::new();
        let (leads, services) = tokio::join!(
            select_as::<Lead>(repo, caller, &leads_query),
            select_as::<Service>(repo, caller, &services_query),
        );
        match (leads, services) {
            (Ok(leads), Ok(services)) => {
                self.leads = leads;
                self.services = services;
                self.load_error = None;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "lead triage refresh failed");
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Lead> {
        let filter = self.filter;
        self.leads.iter().filter(move |l| filter.matches(l))
    }

    pub fn service_name(&self, lead: &Lead) -> &str {
        lead.service_id
            .and_then(|id| self.services.iter().find(|s| s.id == id))
            .map(|s| s.name.as_str())
            .unwrap_or(UNKNOWN_SERVICE)
    }

    /// Direct single-field update, then re-fetch. Any status may follow any other.
    #[instrument(skip(self, repo, caller))]
    pub async fn set_status(
        &mut self,
        repo: &dyn TableRepository,
        caller: &Caller,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<(), ServiceError> {
        update_as::<Lead>(repo, caller, id, json!({ "status": status })).await?;
        info!(lead_id = %id, status = %status, "lead_status_updated");
        self.refresh(repo, caller).await;
        Ok(())
    }

    pub fn view(&self) -> LeadsView {
        LeadsView {
            filter: self.filter,
            statuses: LeadStatus::ALL,
            total: self.leads.len(),
            leads: self
                .visible()
                .map(|l| LeadRow { lead: l.clone(), service_name: self.service_name(l).to_string() })
                .collect(),
            error: self.load_error.clone(),
        }
    }
}
