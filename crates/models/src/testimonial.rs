use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::table::{Record, Table};
use crate::{nullable, require};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub client_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub client_company: String,
    #[serde(default, deserialize_with = "nullable")]
    pub client_role: String,
    pub testimonial_text: String,
    pub rating: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Testimonial {
    const TABLE: Table = Table::Testimonials;
    fn id(&self) -> Uuid { self.id }
}

impl Testimonial {
    pub fn to_draft(&self) -> TestimonialDraft {
        TestimonialDraft {
            client_name: self.client_name.clone(),
            client_company: self.client_company.clone(),
            client_role: self.client_role.clone(),
            testimonial_text: self.testimonial_text.clone(),
            rating: self.rating,
            image_url: self.image_url.clone(),
            is_featured: self.is_featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestimonialDraft {
    pub client_name: String,
    pub client_company: String,
    pub client_role: String,
    pub testimonial_text: String,
    pub rating: i32,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

/// Blank add form: five stars, featured.
impl Default for TestimonialDraft {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_company: String::new(),
            client_role: String::new(),
            testimonial_text: String::new(),
            rating: 5,
            image_url: None,
            is_featured: true,
        }
    }
}

impl TestimonialDraft {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("client_name", &self.client_name)?;
        require("testimonial_text", &self.testimonial_text)?;
        if !(1..=5).contains(&self.rating) {
            return Err(ModelError::Validation("rating must be between 1 and 5".into()));
        }
        Ok(())
    }
}
