use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use aitrace_core::PriceCatalog;
use aitrace_db::Db;

use crate::config::AppSettings;
use crate::error::{AppError, Result};
use crate::pricing;
use crate::services::AppServices;
use crate::startup::AppPaths;

/// Paths and tuning needed to run the billing engine locally.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub conflict_retries: u32,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self::from_settings(db_path, &AppSettings::default())
    }

    pub fn from_settings(db_path: PathBuf, settings: &AppSettings) -> Self {
        Self {
            db_path,
            catalog_path: settings.pricing.catalog_path.clone(),
            busy_timeout: Duration::from_millis(settings.storage.busy_timeout_ms),
            conflict_retries: settings.ingest.conflict_retries,
        }
    }

    pub fn from_paths(paths: &AppPaths, settings: &AppSettings) -> Self {
        Self::from_settings(paths.db_path.clone(), settings)
    }
}

/// Application state shared by front ends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<PriceCatalog>,
    pub services: AppServices,
}

impl AppState {
    /// Loads the configured price catalog, falling back to the built-in one.
    pub fn new(config: AppConfig) -> Result<Self> {
        let catalog = pricing::load_catalog(config.catalog_path.as_deref())?;
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: AppConfig, catalog: PriceCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let services = AppServices::new(&config, catalog.clone());
        Self {
            config,
            catalog,
            services,
        }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path, self.config.busy_timeout)
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open_with_busy_timeout(
            &self.config.db_path,
            self.config.busy_timeout,
        )?)
    }

    pub fn export_catalog(&self, path: &Path) -> Result<()> {
        pricing::write_catalog(path, &self.catalog)
    }
}

pub fn setup_db(path: &Path, busy_timeout: Duration) -> Result<()> {
    let mut db = Db::open_with_busy_timeout(path, busy_timeout)?;
    db.migrate()?;
    Ok(())
}
