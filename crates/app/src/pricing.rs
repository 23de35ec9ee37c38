use std::fs;
use std::path::Path;

use aitrace_core::PriceCatalog;

use crate::error::Result;

const INITIAL_PRICING: &str = include_str!("../initial-pricing.json");

/// The configured catalog file if there is one, otherwise the built-in defaults.
pub fn load_catalog(path: Option<&Path>) -> Result<PriceCatalog> {
    match path {
        Some(path) => load_catalog_file(path),
        None => load_initial_catalog(),
    }
}

pub fn load_catalog_file(path: &Path) -> Result<PriceCatalog> {
    let contents = fs::read_to_string(path)?;
    let catalog = PriceCatalog::from_json_str(&contents)?;
    tracing::info!(path = %path.display(), models = catalog.len(), "loaded price catalog");
    Ok(catalog)
}

pub fn load_initial_catalog() -> Result<PriceCatalog> {
    Ok(PriceCatalog::from_json_str(INITIAL_PRICING)?)
}

pub fn write_catalog(path: &Path, catalog: &PriceCatalog) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, catalog.to_json_string()?)?;
    Ok(())
}
