//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Admin sessions are owned by the hosted backend; this module signs in,
//! signs out and resolves the current user for an access token.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
