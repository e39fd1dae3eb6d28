//! # Client configuration: `yorumator.toml`
//!
//! Defines the TOML file a frontend reads at startup (filename:
//! [`ClientConfig::filename`] = `"yorumator.toml"`) to find the review backend
//! and the directory its durable state lives in.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "https://yorumatorapp.onrender.com/api/v1"
//! timeout_secs = 30      # 0 disables the request timeout
//!
//! [storage]
//! dir = "/home/me/.local/share/yorumator"   # empty = platform default
//! ```
//!
//! All structs derive `Default` (with production defaults) so that a missing
//! or empty config file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://yorumatorapp.onrender.com/api/v1";

/// Top-level configuration stored in `yorumator.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. 0 disables it.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u32 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where durable client state (tokens) is kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Empty string means the platform data directory.
    #[serde(default)]
    pub dir: String,
}

impl ClientConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                ..ApiConfig::default()
            },
            storage: StorageConfig::default(),
        }
    }

    /// Builder method to set the storage directory.
    pub fn with_storage_dir(mut self, dir: impl Into<String>) -> Self {
        self.storage.dir = dir.into();
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.api.timeout_secs = secs;
        self
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "yorumator.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.storage.dir.is_empty());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "http://localhost:8000/api/v1/"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::new("http://localhost:8000/api/v1")
            .with_storage_dir("/tmp/yorumator")
            .with_timeout(5);
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
