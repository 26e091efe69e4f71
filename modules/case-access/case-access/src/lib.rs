//! Case Access Module
//!
//! Resolves an external caller identity into a role-scoped domain context and
//! verifies caller- and resource-level checks against case records. Account
//! and case record data come from injected collaborators; two backends ship
//! with the module (in-memory and `SeaORM`).
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{CaseAccessConfig, DatabaseConfig, VisibilityConfig};
pub use domain::{CaseAccessLocalClient, Service};
pub use module::CaseAccessModule;
