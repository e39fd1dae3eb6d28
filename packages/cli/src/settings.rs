//! Startup configuration: `yorumator.toml`, then environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use store::ClientConfig;

pub const BASE_URL_ENV: &str = "YORUMATOR_API_BASE_URL";
pub const STORAGE_DIR_ENV: &str = "YORUMATOR_STORAGE_DIR";

const APP_DIR: &str = "yorumator";

/// `<config_dir>/yorumator/yorumator.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(ClientConfig::filename()))
}

/// Read the config file and apply environment overrides.
///
/// An explicit `path` must exist; the default location may be missing, in
/// which case the defaults apply.
pub fn load(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let mut config = match path {
        Some(path) => read(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read(&path)?,
            None => ClientConfig::default(),
        },
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read(path: &Path) -> anyhow::Result<ClientConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = ClientConfig::from_toml(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Non-empty values from `lookup` win over the file.
pub fn apply_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(base_url) = non_empty(BASE_URL_ENV) {
        config.api.base_url = base_url.trim().to_string();
    }
    if let Some(dir) = non_empty(STORAGE_DIR_ENV) {
        config.storage.dir = dir;
    }
}

/// Where tokens are kept: the configured dir, else the platform data dir.
pub fn storage_dir(config: &ClientConfig) -> PathBuf {
    if !config.storage.dir.trim().is_empty() {
        return PathBuf::from(config.storage.dir.trim());
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
