//! Client configuration.
//!
//! The backend base URL is resolved in priority order:
//! 1. `--base-url` CLI flag
//! 2. `base_url` in the config file
//! 3. `COFO_REVIEW_BASE_URL` environment variable
//! 4. the built-in default
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_BASE_URL: &str = "https://geo-tech-backend.onrender.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const BASE_URL_ENV: &str = "COFO_REVIEW_BASE_URL";

const APP_DIR: &str = "cofo-review";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

/// On-disk client config (`<config_dir>/cofo-review/config.json`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings every command runs with after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub session_path: PathBuf,
}

fn app_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| anyhow!("no user config directory; pass --config and --session"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

pub fn default_session_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(SESSION_FILE))
}

/// Load a config file, returning `None` when it does not exist.
pub fn load_config_optional(path: &Path) -> Result<Option<ClientConfig>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ClientConfig = serde_json::from_slice(&bytes).context("parse config JSON")?;
    validate_config(&config)?;
    Ok(Some(config))
}

/// Persist a config in a stable JSON format.
pub fn write_config(path: &Path, config: &ClientConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &ClientConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if let Some(base_url) = config.base_url.as_deref() {
        validate_base_url(base_url)?;
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be positive"));
    }
    Ok(())
}

pub fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = Url::parse(base_url.trim())
        .with_context(|| format!("invalid base_url {base_url:?}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "base_url must use http:// or https:// (got {base_url:?})"
        ));
    }
    if parsed.host_str().filter(|host| !host.is_empty()).is_none() {
        return Err(anyhow!("base_url is missing a host (got {base_url:?})"));
    }
    Ok(())
}

/// Pick the base URL by priority; blank values are skipped.
pub fn resolve_base_url(
    flag: Option<&str>,
    config: Option<&ClientConfig>,
    env_value: Option<&str>,
) -> Result<String> {
    let chosen = [
        flag,
        config.and_then(|config| config.base_url.as_deref()),
        env_value,
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|value| !value.is_empty())
    .unwrap_or(DEFAULT_BASE_URL);
    validate_base_url(chosen)?;
    Ok(chosen.trim_end_matches('/').to_string())
}

/// Resolve everything a command needs from flags, files and environment.
pub fn resolve(
    base_url_flag: Option<&str>,
    config_path: Option<&Path>,
    session_path: Option<&Path>,
) -> Result<ResolvedConfig> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    let config = load_config_optional(&config_path)?;
    let env_value = std::env::var(BASE_URL_ENV).ok();
    let base_url = resolve_base_url(base_url_flag, config.as_ref(), env_value.as_deref())?;
    let timeout_secs = config
        .as_ref()
        .map(|config| config.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let session_path = match session_path {
        Some(path) => path.to_path_buf(),
        None => default_session_path()?,
    };
    Ok(ResolvedConfig {
        base_url,
        timeout: Duration::from_secs(timeout_secs),
        session_path,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
