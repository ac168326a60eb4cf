//! Record types persisted by the hosted backend.
//! - One module per table, each with the stored row and the editable draft.
//! - Drafts carry their own validation so every caller rejects the same input.

pub mod errors;
pub mod table;
pub mod service;
pub mod lead;
pub mod testimonial;
pub mod portfolio;

pub use table::{Record, Table};

use serde::{Deserialize, Deserializer};

/// Treat a JSON `null` column like a missing one.
pub(crate) fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Shared check for required text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
