use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use virtual_library_catalog::client::{BookSearchClientConfig, DEFAULT_CATALOG_URL};

const CONFIG_FILE: &str = "virtual_library";
const ENV_PREFIX: &str = "VIRTUAL_LIBRARY";
const DEFAULT_HISTORY_FILE: &str = "virtual_library_settings.json";

/// Settings of the discover host, layered from an optional `virtual_library.toml`
/// and `VIRTUAL_LIBRARY_*` environment variables
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DiscoverSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_history_path() -> PathBuf {
    PathBuf::from(DEFAULT_HISTORY_FILE)
}

impl DiscoverSettings {
    pub fn load() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn client_config(&self) -> BookSearchClientConfig {
        BookSearchClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }
}
