pub mod app;
pub mod config;
pub mod error;
pub mod pricing;
pub mod requests;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::{AppSettings, IngestSettings, LoggingSettings, PricingSettings, StorageSettings};
pub use error::{ApiError, AppError, Result};
pub use pricing::{load_catalog, load_catalog_file, load_initial_catalog, write_catalog};
pub use requests::{
    CompletionTokensDetails, LogStepRequest, LogTraceRequest, PromptTokensDetails, UsagePayload,
};
pub use services::{
    AppServices, CatalogEntry, LogService, PricingService, ProjectsService, StepLogOutcome,
    TraceLogOutcome,
};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::time::{format_trace_timestamp, parse_trace_timestamp};
