use std::{env, path::PathBuf};

use dirs_next::config_dir;
use scriptdeck_util::expand_tilde;
use serde::{Deserialize, Serialize};

/// Catalog source used when neither config nor environment names one.
pub const DEFAULT_CATALOG_SOURCE: &str = "catalog.json";
/// Environment variable overriding the configured catalog source.
pub const CATALOG_ENV: &str = "SCRIPTDECK_CATALOG";
/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SCRIPTDECK_CONFIG_PATH";

/// Persistent ScriptDeck settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// File path or http(s) URL of the catalog document.
    pub catalog_source: String,
    /// Whether team and project must be chosen before the confirm step.
    pub require_context: bool,
    pub executor: ExecutorConfig,
}

/// Settings of the mock execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub latency_ms: u64,
    pub simulate_failure: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            catalog_source: DEFAULT_CATALOG_SOURCE.to_string(),
            require_context: true,
            executor: ExecutorConfig::default(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            simulate_failure: false,
        }
    }
}

impl RegistryConfig {
    /// Loads the config from [`default_config_path`], falling back to the
    /// defaults when the file is missing or malformed. `SCRIPTDECK_CATALOG`
    /// overrides the catalog source either way.
    pub fn load() -> Self {
        let path = default_config_path();
        let mut config = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<RegistryConfig>(&content).ok())
            .unwrap_or_default();

        if let Ok(source) = env::var(CATALOG_ENV)
            && !source.trim().is_empty()
        {
            config.catalog_source = source.trim().to_string();
        }
        config
    }

    /// Returns a copy with the catalog source replaced when `source` is set.
    pub fn with_catalog_source(mut self, source: Option<&str>) -> Self {
        if let Some(source) = source {
            self.catalog_source = source.to_string();
        }
        self
    }
}

/// Get the default path for the ScriptDeck configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scriptdeck")
        .join("config.json")
}
