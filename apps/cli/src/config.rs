use std::fs;
use std::path::{Path, PathBuf};

use aitrace_app::AppSettings;

use crate::paths::config_dir;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub settings: AppSettings,
    pub file: PathBuf,
    pub created: bool,
}

/// Reads the config file, writing one with defaults first if it does not exist.
pub fn load_or_create(explicit: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let settings = AppSettings::from_toml_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            settings,
            file,
            created: false,
        });
    }

    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("create config dir {}: {}", parent.display(), err))?;
    }
    let settings = AppSettings::default();
    let contents = settings
        .to_toml_string()
        .map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents)
        .map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        settings,
        file,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_then_reads_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let created = load_or_create(Some(path.as_path())).expect("create");
        assert!(created.created);
        assert!(path.exists());

        let loaded = load_or_create(Some(path.as_path())).expect("load");
        assert!(!loaded.created);
        assert_eq!(loaded.settings, AppSettings::default());
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\nbusy_timeout_ms = -1\n").expect("write");
        let err = load_or_create(Some(path.as_path())).expect_err("invalid");
        assert!(err.contains("parse config"));
    }
}
