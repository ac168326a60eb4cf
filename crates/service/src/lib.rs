//! Service layer for the contractor site.
//! - `backend` talks to the hosted tables and auth endpoints.
//! - `content`/`site` compose the public page, `quote` runs the lead wizard.
//! - `admin` holds the back-office panels; `auth` gates them.

pub mod admin;
pub mod auth;
pub mod backend;
pub mod content;
pub mod errors;
pub mod metrics;
pub mod quote;
pub mod runtime;
pub mod site;
