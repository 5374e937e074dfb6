//! Backend configuration
//!
//! Read from `~/.my-mission/config.yaml`, then overridden by environment
//! variables. A missing or unreadable file means defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_ITEMS_TABLE, DEFAULT_TIMEOUT_SECS, ENV_BACKEND_KEY,
    ENV_BACKEND_MODE, ENV_BACKEND_URL, ENV_ITEMS_TABLE,
};

/// Where items are persisted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Local,
    Remote,
}

impl BackendMode {
    fn parse(raw: &str) -> Option<BackendMode> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Some(BackendMode::Local),
            "remote" | "cloud" | "supabase" => Some(BackendMode::Remote),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            mode: BackendMode::Local,
            url: None,
            anon_key: None,
            table: String::from(DEFAULT_ITEMS_TABLE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Credentials for the hosted table, present only when both halves are set
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteSettings {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Load from the data directory and apply process environment overrides
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = match fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content),
            Err(_) => BackendConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Parse YAML, falling back to defaults on malformed content
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<BackendConfig>(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed config file");
                BackendConfig::default()
            }
        }
    }

    /// Override fields from environment lookups; blank values are ignored
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(mode) = get(ENV_BACKEND_MODE).as_deref().and_then(BackendMode::parse) {
            self.mode = mode;
        }
        if let Some(url) = get(ENV_BACKEND_URL) {
            self.url = Some(url);
        }
        if let Some(key) = get(ENV_BACKEND_KEY) {
            self.anon_key = Some(key);
        }
        if let Some(table) = get(ENV_ITEMS_TABLE) {
            self.table = table;
        }
    }

    /// Remote settings, or None when url or key is missing
    pub fn remote(&self) -> Option<RemoteSettings> {
        let url = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let anon_key = self.anon_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(RemoteSettings {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            table: self.table.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        })
    }
}
