use std::path::PathBuf;

use aitrace_app::AppSettings;

const APP_DIR_NAME: &str = "aitrace";

pub fn config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "resolve config dir: no platform config directory".to_string())
}

/// The configured data dir, or the platform data dir.
pub fn resolve_data_dir(settings: &AppSettings) -> Result<PathBuf, String> {
    if let Some(dir) = &settings.data_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "resolve data dir: no platform data directory".to_string())
}
