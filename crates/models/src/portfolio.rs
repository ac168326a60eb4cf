use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::table::{Record, Table};
use crate::{nullable, require};

pub const INDUSTRIES: [&str; 7] = [
    "Plumbing",
    "Electrical",
    "HVAC",
    "Roofing",
    "General Contractor",
    "Landscaping",
    "Painting",
];

pub const SERVICE_TYPES: [&str; 3] = ["Basic", "Pro", "Enterprise"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: Uuid,
    pub client_name: String,
    pub project_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub industry: String,
    #[serde(default, deserialize_with = "nullable")]
    pub service_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub results: ResultMetrics,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for PortfolioItem {
    const TABLE: Table = Table::Portfolio;
    fn id(&self) -> Uuid { self.id }
}

impl PortfolioItem {
    pub fn to_draft(&self) -> PortfolioDraft {
        PortfolioDraft {
            client_name: self.client_name.clone(),
            project_title: self.project_title.clone(),
            description: self.description.clone(),
            industry: self.industry.clone(),
            service_type: self.service_type.clone(),
            image_url: self.image_url.clone(),
            website_url: self.website_url.clone(),
            results: self.results.clone(),
            is_featured: self.is_featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioDraft {
    pub client_name: String,
    pub project_title: String,
    pub description: String,
    pub industry: String,
    pub service_type: String,
    pub image_url: String,
    pub website_url: Option<String>,
    pub results: ResultMetrics,
    pub is_featured: bool,
}

impl Default for PortfolioDraft {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            project_title: String::new(),
            description: String::new(),
            industry: String::new(),
            service_type: "Basic".into(),
            image_url: String::new(),
            website_url: None,
            results: ResultMetrics::default(),
            is_featured: true,
        }
    }
}

impl PortfolioDraft {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("client_name", &self.client_name)?;
        require("project_title", &self.project_title)?;
        self.results.validate()
    }
}

/// Metric name to display value, e.g. `"Leads" -> "+150%"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMetrics(BTreeMap<String, String>);

impl ResultMetrics {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Adds a new metric row. The key must be non-empty and not already present.
    pub fn add(&mut self, key: &str, value: impl Into<String>) -> Result<(), ModelError> {
        let key = valid_key(key)?;
        if self.0.contains_key(&key) {
            return Err(duplicate(&key));
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    /// Renames a metric, keeping its value.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), ModelError> {
        let to = valid_key(to)?;
        if !self.0.contains_key(from) {
            return Err(unknown(from));
        }
        if to == from {
            return Ok(());
        }
        if self.0.contains_key(&to) {
            return Err(duplicate(&to));
        }
        if let Some(value) = self.0.remove(from) {
            self.0.insert(to, value);
        }
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), ModelError> {
        let slot = self.0.get_mut(key).ok_or_else(|| unknown(key))?;
        *slot = value.into();
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<String, ModelError> {
        self.0.remove(key).ok_or_else(|| unknown(key))
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.0.keys().any(|k| k.trim().is_empty()) {
            return Err(ModelError::Validation("result metric name cannot be empty".into()));
        }
        Ok(())
    }
}

fn valid_key(key: &str) -> Result<String, ModelError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ModelError::Validation("result metric name cannot be empty".into()));
    }
    Ok(key.to_string())
}

fn duplicate(key: &str) -> ModelError {
    ModelError::Validation(format!("result metric '{}' already exists", key))
}

fn unknown(key: &str) -> ModelError {
    ModelError::Unknown { kind: "result metric", value: key.to_string() }
}
