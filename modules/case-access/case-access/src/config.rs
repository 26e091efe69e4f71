//! Configuration for the case access module.

use std::path::Path;

use anyhow::Context;
use case_access_sdk::{CaseStatus, SupportStatus};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment prefix. Nested keys are separated with `__`.
pub const ENV_PREFIX: &str = "CASE_ACCESS__";

/// Module configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseAccessConfig {
    pub visibility: VisibilityConfig,
    /// SQL backend. When absent the module has no storage of its own and
    /// expects collaborators to be supplied by the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

/// Case statuses visible to each role-scoped lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisibilityConfig {
    /// Statuses an assessor can see.
    pub assessor_statuses: Vec<CaseStatus>,
    /// Statuses accessors and qualifying accessors can see.
    pub accessor_statuses: Vec<CaseStatus>,
    /// Support assignment statuses that make a record visible to an accessor's unit.
    pub support_statuses: Vec<SupportStatus>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            assessor_statuses: vec![
                CaseStatus::PendingIntake,
                CaseStatus::UnderAssessment,
                CaseStatus::InProgress,
            ],
            accessor_statuses: vec![CaseStatus::InProgress, CaseStatus::Complete],
            support_statuses: vec![SupportStatus::Active, SupportStatus::Closed],
        }
    }
}

/// SQL database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_conns: u32,
    /// Apply pending migrations on startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            max_conns: 1,
            run_migrations: true,
        }
    }
}

/// Load configuration: defaults, then the optional YAML file, then
/// `CASE_ACCESS__*` environment variables.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or a value has the wrong shape.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CaseAccessConfig> {
    let mut figment = Figment::from(Serialized::defaults(CaseAccessConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("invalid case_access configuration")
}
