//! Configuration management.
//!
//! The original platform hardcoded backend base URLs per page; here every
//! request goes through one `Settings` value resolved once at startup.
//!
//! Resolution order for the config file: explicit path, `PLAGIVIEW_CONFIG`,
//! `./plagiview.toml`, then `~/.config/plagiview/config.toml`. Missing files
//! fall back to defaults. `PLAGIVIEW_API_URL` and `PLAGIVIEW_TOKEN` override
//! file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default backend base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the platform backend.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Pause between triggering a reanalysis and re-fetching the result.
    pub reanalyze_delay_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            reanalyze_delay_secs: 2,
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Bearer token attached to authorized requests.
    pub token: Option<String>,
}

/// Resolved application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub auth: AuthSettings,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn reanalyze_delay(&self) -> Duration {
        Duration::from_secs(self.api.reanalyze_delay_secs)
    }

    /// Parse settings from TOML text.
    fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PLAGIVIEW_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("PLAGIVIEW_TOKEN") {
            if !token.is_empty() {
                self.auth.token = Some(token);
            }
        }
    }
}

/// Candidate config file locations, in priority order.
fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("PLAGIVIEW_CONFIG") {
        if !env_path.is_empty() {
            paths.push(PathBuf::from(env_path));
        }
    }
    paths.push(PathBuf::from("plagiview.toml"));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("plagiview").join("config.toml"));
    }
    paths
}

/// Load settings from the first config file found, then apply env overrides.
///
/// An explicitly requested file must exist and parse; auto-discovered files
/// are skipped when absent.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = None;

    for (idx, path) in candidate_paths(explicit).into_iter().enumerate() {
        let is_explicit = idx == 0 && explicit.is_some();
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                settings = Some(Settings::from_toml(&path, &text)?);
                break;
            }
            Err(source) if is_explicit => {
                return Err(ConfigError::Io { path, source });
            }
            Err(_) => continue,
        }
    }

    let mut settings = settings.unwrap_or_default();
    settings.apply_env();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.reanalyze_delay(), Duration::from_secs(2));
        assert_eq!(settings.auth.token, None);
    }

    #[test]
    fn test_parse_full_file() {
        let text = r#"
            [api]
            base_url = "https://soutenance.example.edu"
            timeout_secs = 10
            reanalyze_delay_secs = 5

            [auth]
            token = "abc123"
        "#;
        let settings = Settings::from_toml(Path::new("test.toml"), text).unwrap();
        assert_eq!(settings.api.base_url, "https://soutenance.example.edu");
        assert_eq!(settings.api.timeout_secs, 10);
        assert_eq!(settings.auth.token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = r#"
            [api]
            base_url = "http://10.0.0.2:5000"
        "#;
        let settings = Settings::from_toml(Path::new("test.toml"), text).unwrap();
        assert_eq!(settings.api.base_url, "http://10.0.0.2:5000");
        assert_eq!(settings.api.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = Settings::from_toml(Path::new("bad.toml"), "api = 3");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_settings(Some(Path::new("/nonexistent/plagiview.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
