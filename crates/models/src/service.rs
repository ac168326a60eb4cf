use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::table::{Record, Table};
use crate::{nullable, require};

/// A purchasable package with a price and an ordered feature list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub features: FeatureList,
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Service {
    const TABLE: Table = Table::Services;
    fn id(&self) -> Uuid { self.id }
}

impl Service {
    pub fn to_draft(&self) -> ServiceDraft {
        ServiceDraft {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            features: self.features.clone(),
            is_active: self.is_active,
        }
    }
}

/// Editable fields of a service; this is also the exact update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDraft {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub features: FeatureList,
    pub is_active: bool,
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ModelError::Validation("price must be a non-negative number".into()));
        }
        Ok(())
    }
}

/// Ordered list of feature lines, edited by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureList(Vec<String>);

impl FeatureList {
    pub fn new(items: Vec<String>) -> Self { Self(items) }

    pub fn as_slice(&self) -> &[String] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Appends an empty line for the admin to fill in.
    pub fn add(&mut self) {
        self.0.push(String::new());
    }

    pub fn update(&mut self, index: usize, value: impl Into<String>) -> Result<(), ModelError> {
        let slot = self.0.get_mut(index).ok_or_else(|| out_of_range(index))?;
        *slot = value.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<String, ModelError> {
        if index >= self.0.len() {
            return Err(out_of_range(index));
        }
        Ok(self.0.remove(index))
    }
}

fn out_of_range(index: usize) -> ModelError {
    ModelError::Validation(format!("feature index {} out of range", index))
}

impl From<Vec<&str>> for FeatureList {
    fn from(v: Vec<&str>) -> Self {
        Self(v.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row_with_null_columns() {
        let row = serde_json::json!({
            "id": "7d1f0a52-54b4-4a7e-9d0c-2f0c6f1f5d11",
            "name": "Basic",
            "price": 499,
            "description": null,
            "features": null,
            "is_active": true,
            "sort_order": 1,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00.123456+00:00"
        });
        let s: Service = serde_json::from_value(row).unwrap();
        assert_eq!(s.price, 499.0);
        assert!(s.description.is_empty());
        assert!(s.features.is_empty());
    }

    #[test]
    fn feature_list_edits_by_index() {
        let mut f = FeatureList::from(vec!["5 pages", "Hosting"]);
        f.add();
        assert_eq!(f.as_slice(), ["5 pages", "Hosting", ""]);
        f.update(2, "SEO").unwrap();
        assert_eq!(f.remove(0).unwrap(), "5 pages");
        assert_eq!(f.as_slice(), ["Hosting", "SEO"]);
        assert!(f.update(5, "x").is_err());
        assert!(f.remove(2).is_err());
    }

    #[test]
    fn draft_validation() {
        let mut d = ServiceDraft {
            name: "Pro".into(),
            price: 999.0,
            description: String::new(),
            features: FeatureList::default(),
            is_active: true,
        };
        assert!(d.validate().is_ok());
        d.price = -1.0;
        assert!(d.validate().is_err());
        d.price = f64::NAN;
        assert!(d.validate().is_err());
        d.price = 0.0;
        d.name = "  ".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn draft_rejects_unknown_fields() {
        let v = serde_json::json!({
            "name": "x", "price": 1.0, "description": "", "features": [], "is_active": true, "sort_order": 3
        });
        assert!(serde_json::from_value::<ServiceDraft>(v).is_err());
    }
}
