use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONFLICT_RETRIES: u32 = 3;
const DEFAULT_LOG_FILTER: &str = "info";

/// Settings persisted in `config.toml`. Missing keys take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub pricing: PricingSettings,
    pub storage: StorageSettings,
    pub ingest: IngestSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Replaces the built-in catalog when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub busy_timeout_ms: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Extra attempts after a write conflict before giving up.
    pub conflict_retries: u32,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| AppError::Message(format!("serialize config: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = AppSettings::from_toml_str("").expect("parse");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.storage.busy_timeout_ms, 5_000);
        assert_eq!(settings.ingest.conflict_retries, 3);
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = AppSettings::from_toml_str(
            r#"
            data_dir = "/var/lib/aitrace"

            [pricing]
            catalog_path = "/etc/aitrace/pricing.json"

            [ingest]
            conflict_retries = 0
            "#,
        )
        .expect("parse");
        assert_eq!(settings.data_dir, Some(PathBuf::from("/var/lib/aitrace")));
        assert_eq!(
            settings.pricing.catalog_path,
            Some(PathBuf::from("/etc/aitrace/pricing.json"))
        );
        assert_eq!(settings.ingest.conflict_retries, 0);
        assert_eq!(settings.storage.busy_timeout_ms, 5_000);
    }

    #[test]
    fn defaults_survive_a_write_and_read() {
        let written = AppSettings::default().to_toml_string().expect("serialize");
        let reread = AppSettings::from_toml_str(&written).expect("parse");
        assert_eq!(reread, AppSettings::default());
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = AppSettings::from_toml_str("[storage]\nbusy_timeout_ms = \"soon\"")
            .expect_err("invalid");
        assert!(matches!(err, AppError::Toml(_)));
    }
}
