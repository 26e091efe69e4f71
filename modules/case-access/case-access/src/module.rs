//! Case access module bootstrap.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::Context;
use case_access_sdk::{AccountDirectoryClient, CaseAccessClient, CaseRecordLookupClient};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{CaseAccessConfig, DatabaseConfig};
use crate::domain::{CaseAccessLocalClient, Service};
use crate::infra::storage::SeaOrmCaseAccessRepository;
use crate::infra::storage::migrations::Migrator;

/// Case access module.
///
/// Wires the account directory and case record lookup into a [`Service`]
/// and exposes it as a [`CaseAccessClient`]. Initialization happens once;
/// the resulting client is stateless and can be shared across requests.
pub struct CaseAccessModule {
    service: OnceLock<Arc<Service>>,
}

impl Default for CaseAccessModule {
    fn default() -> Self {
        Self {
            service: OnceLock::new(),
        }
    }
}

impl CaseAccessModule {
    pub const MODULE_NAME: &'static str = "case-access";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize against the configured SQL database.
    ///
    /// # Errors
    ///
    /// Fails if no database is configured, the connection cannot be opened,
    /// migrations fail, or the module was already initialized.
    #[tracing::instrument(skip_all)]
    pub async fn init(&self, cfg: &CaseAccessConfig) -> anyhow::Result<Arc<dyn CaseAccessClient>> {
        info!("Initializing {} module", Self::MODULE_NAME);

        let db_cfg = cfg
            .database
            .as_ref()
            .context("case_access requires a `database` section to initialize its storage")?;
        let db = connect(db_cfg).await?;
        if db_cfg.run_migrations {
            Migrator::up(&db, None)
                .await
                .context("failed to run case_access migrations")?;
            info!("Applied case_access migrations");
        }

        let repo = Arc::new(SeaOrmCaseAccessRepository::new(db));
        self.init_with(repo.clone(), repo, cfg)
    }

    /// Initialize with externally provided collaborators.
    ///
    /// # Errors
    ///
    /// Fails if the module was already initialized.
    pub fn init_with(
        &self,
        directory: Arc<dyn AccountDirectoryClient>,
        records: Arc<dyn CaseRecordLookupClient>,
        cfg: &CaseAccessConfig,
    ) -> anyhow::Result<Arc<dyn CaseAccessClient>> {
        let svc = Arc::new(Service::new(directory, records, cfg.visibility.clone()));
        self.service
            .set(svc.clone())
            .map_err(|_| anyhow::anyhow!("{} module already initialized", Self::MODULE_NAME))?;

        let api: Arc<dyn CaseAccessClient> = Arc::new(CaseAccessLocalClient::new(svc));
        info!("{} module initialized successfully", Self::MODULE_NAME);
        Ok(api)
    }

    /// The service, once initialized.
    #[must_use]
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.get().cloned()
    }
}

/// Open a connection pool for `cfg`.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.max_connections(cfg.max_conns.max(1))
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to case_access database '{}'", cfg.dsn))
}
