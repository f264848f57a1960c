use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::error::AppError;

/// Prefix of every environment variable read by [`AppConfig`]
pub const ENV_PREFIX: &str = "CPT_";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Base URL of the problem store API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub env: Environment,
    /// Where preferences are persisted, see [`AppConfig::settings_path`]
    pub settings_path: Option<PathBuf>,
    /// Use the in-process store instead of the HTTP API
    #[serde(default)]
    pub offline: bool,
    /// Snapshot file backing the offline store, see [`AppConfig::data_path`]
    pub data_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read the configuration from `CPT_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(std::env::vars())
    }

    /// Read the configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| AppError::Config(e.to_string()))
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured preferences file, or `<config dir>/cpt/preferences.json`.
    pub fn settings_path(&self) -> PathBuf {
        self.settings_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cpt")
                .join("preferences.json")
        })
    }

    /// Configured offline snapshot, or `<data dir>/cpt/problems.json`.
    pub fn data_path(&self) -> PathBuf {
        self.data_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cpt")
                .join("problems.json")
        })
    }

    /// Offline quick links, kept as `links.json` beside [`Self::data_path`].
    pub fn links_path(&self) -> PathBuf {
        self.data_path().with_file_name("links.json")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            env: Environment::default(),
            settings_path: None,
            offline: false,
            data_path: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();

        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.env, Environment::Development);
        assert!(config.settings_path.is_none());
        assert!(!config.offline);
        assert!(config.settings_path().ends_with("cpt/preferences.json"));
        assert!(config.data_path().ends_with("cpt/problems.json"));
        assert!(config.links_path().ends_with("cpt/links.json"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("CPT_API_URL", "https://tracker.example.com/api"),
            ("CPT_REQUEST_TIMEOUT_SECS", "3"),
            ("CPT_ENV", "production"),
            ("CPT_SETTINGS_PATH", "/tmp/prefs.json"),
            ("CPT_OFFLINE", "true"),
            ("CPT_DATA_PATH", "/tmp/problems.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://tracker.example.com/api");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.env, Environment::Production);
        assert!(!config.env.is_development());
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/prefs.json"));
        assert!(config.offline);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/problems.json"));
        assert_eq!(config.links_path(), PathBuf::from("/tmp/links.json"));
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let result = AppConfig::from_vars(vars(&[("CPT_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
