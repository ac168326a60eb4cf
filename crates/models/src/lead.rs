use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::table::{Record, Table};
use crate::{nullable, require};

/// Triage status of a lead. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ModelError::Unknown { kind: "lead status", value: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// A prospective-customer inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company_name: String,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    pub business_type: String,
    #[serde(default)]
    pub current_website: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    pub status: LeadStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub stripe_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Lead {
    const TABLE: Table = Table::Leads;
    fn id(&self) -> Uuid { self.id }
}

/// Row inserted by the public quote form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub service_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub business_type: String,
    pub current_website: String,
    pub message: String,
    pub status: LeadStatus,
    pub payment_status: PaymentStatus,
}

impl NewLead {
    /// Presence checks only; email and phone formats are not inspected.
    pub fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("company_name", &self.company_name)?;
        Ok(())
    }
}
