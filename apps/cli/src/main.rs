mod args;
mod config;
mod paths;

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use aitrace_app::{
    AppConfig, AppPaths, AppState, LogStepRequest, LogTraceRequest, UsagePayload,
    ensure_app_data_dir,
};
use clap::Parser;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use args::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = config::load_or_create(cli.config.as_deref()).map_err(io::Error::other)?;
    init_tracing(&config.settings.logging.filter);
    if config.created {
        tracing::info!(path = %config.file.display(), "created config with defaults");
    }

    let data_dir = paths::resolve_data_dir(&config.settings).map_err(io::Error::other)?;
    let app_paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&app_paths)?;

    let state = AppState::new(AppConfig::from_paths(&app_paths, &config.settings))?;
    let is_fresh_db = state.is_fresh_db();
    state.setup_db()?;

    match cli.command {
        Command::Init => {
            if is_fresh_db {
                println!("Created database at {}", app_paths.db_path.display());
            } else {
                println!("Database ready at {}", app_paths.db_path.display());
            }
            println!("Config: {}", config.file.display());
        }
        Command::Quote {
            provider,
            model,
            usage,
        } => {
            let payload: UsagePayload = read_json(&usage)?;
            let snapshot = payload.to_snapshot()?;
            let pricing = &state.services.pricing;
            let quote = pricing.quote(provider.as_deref(), model.as_deref(), Some(&snapshot));
            print_json(&quote)?;
        }
        Command::LogStep { payload } => {
            let request: LogStepRequest = read_json(&payload)?;
            print_json(&state.services.log.log_step(&request)?)?;
        }
        Command::LogTrace { payload } => {
            let request: LogTraceRequest = read_json(&payload)?;
            print_json(&state.services.log.log_trace(&request)?)?;
        }
        Command::Project { name } => {
            print_json(&state.services.projects.get(&name)?)?;
        }
        Command::Projects => {
            print_json(&state.services.projects.list()?)?;
        }
        Command::Catalog { export } => match export {
            Some(path) => {
                state.export_catalog(&path)?;
                println!("Wrote catalog to {}", path.display());
            }
            None => print_json(&state.services.pricing.catalog_summary())?,
        },
    }
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)
            .map_err(|err| io::Error::other(format!("read {}: {}", path.display(), err)))?
    };
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
