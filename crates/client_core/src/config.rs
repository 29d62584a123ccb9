use std::{fs, io::ErrorKind, path::Path};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const CONFIG_FILE: &str = "nextsearch.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

impl Settings {
    pub fn from_api_base(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize_api_base(raw)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
}

/// Reads `nextsearch.toml` from the working directory (if any) and the process
/// environment. Call once at startup.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let raw = read_config_file(Path::new(CONFIG_FILE))?;
    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
}

/// A missing file is `None`; any other read failure is reported.
fn read_config_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Later sources win: defaults, config file, `NEXTSEARCH_API_BASE`, `APP__API_BASE`.
pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut api_base = DEFAULT_API_BASE.to_string();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw).map_err(|source| ConfigError::File {
            path: CONFIG_FILE.into(),
            source,
        })?;
        if let Some(v) = file_cfg.api_base {
            api_base = v;
        }
    }

    if let Some(v) = env("NEXTSEARCH_API_BASE") {
        api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        api_base = v;
    }

    Settings::from_api_base(&api_base)
}

fn normalize_api_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.into(),
            reason: "empty value".into(),
        });
    }

    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        value: raw.into(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.into(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
