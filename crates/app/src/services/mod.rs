mod log;
mod pricing;
mod projects;

use std::sync::Arc;

use aitrace_core::PriceCatalog;
use aitrace_db::Db;

use crate::app::AppConfig;
use crate::error::{AppError, Result};

pub use log::{LogService, StepLogOutcome, TraceLogOutcome};
pub use pricing::{CatalogEntry, PricingService};
pub use projects::ProjectsService;

type SharedConfig = Arc<AppConfig>;
type SharedCatalog = Arc<PriceCatalog>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub log: LogService,
    pub pricing: PricingService,
    pub projects: ProjectsService,
}

impl AppServices {
    pub fn new(config: &AppConfig, catalog: SharedCatalog) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            log: LogService::new(shared.clone(), catalog.clone()),
            pricing: PricingService::new(catalog),
            projects: ProjectsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open_with_busy_timeout(
        &config.db_path,
        config.busy_timeout,
    )?)
}

fn missing_project(name: &str) -> AppError {
    AppError::NotFound(format!("project {name} not found"))
}
