//! Catalog API configuration.
//!
//! Values come from environment variables, then the `[remote]` table of
//! `<config dir>/autoscore/config.toml`, then built-in defaults.

use std::fmt;
use std::path::PathBuf;

use crate::error::RemoteError;

const ENV_BASE_URL: &str = "AUTOSCORE_API_URL";
const ENV_API_KEY: &str = "AUTOSCORE_API_KEY";
const ENV_SCHEMA: &str = "AUTOSCORE_SCHEMA";
const ENV_TIMEOUT: &str = "AUTOSCORE_TIMEOUT_SECS";

const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://example.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    /// Database schema exposed by the API.
    pub schema: String,
    /// Transport timeout enforced by the HTTP client.
    pub timeout_secs: u64,
}

/// Where a configuration field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each configuration field.
#[derive(Debug)]
pub struct ConfigSources {
    pub base_url: ConfigSource,
    pub api_key: ConfigSource,
    pub schema: ConfigSource,
    pub timeout_secs: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    remote: Option<RemoteSection>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct RemoteSection {
    base_url: Option<String>,
    api_key: Option<String>,
    schema: Option<String>,
    timeout_secs: Option<u64>,
}

/// Path to the config file: `<config dir>/autoscore/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("autoscore").join("config.toml"))
}

fn load_config_file() -> Option<RemoteSection> {
    let path = config_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    match parse_config(&contents) {
        Ok(section) => section,
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {e}", path.display());
            None
        }
    }
}

fn parse_config(contents: &str) -> Result<Option<RemoteSection>, RemoteError> {
    let file: ConfigFile =
        toml::from_str(contents).map_err(|e| RemoteError::Config(e.to_string()))?;
    Ok(file.remote)
}

impl RemoteConfig {
    /// Load configuration. Priority: env vars > config file > defaults.
    ///
    /// `base_url` and `api_key` are required.
    pub fn load() -> Result<Self, RemoteError> {
        let file = load_config_file();
        resolve(|var| std::env::var(var).ok(), file.as_ref())
    }

    /// The API key with all but its last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

fn resolve(
    env: impl Fn(&str) -> Option<String>,
    file: Option<&RemoteSection>,
) -> Result<RemoteConfig, RemoteError> {
    let base_url = env(ENV_BASE_URL)
        .or_else(|| file.and_then(|f| f.base_url.clone()))
        .ok_or_else(|| {
            RemoteError::Config(format!(
                "Missing base_url. Set {ENV_BASE_URL} or add it to the config file"
            ))
        })?;

    let api_key = env(ENV_API_KEY)
        .or_else(|| file.and_then(|f| f.api_key.clone()))
        .ok_or_else(|| {
            RemoteError::Config(format!(
                "Missing api_key. Set {ENV_API_KEY} or add it to the config file"
            ))
        })?;

    let schema = env(ENV_SCHEMA)
        .or_else(|| file.and_then(|f| f.schema.clone()))
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

    let timeout_secs: u64 = match env(ENV_TIMEOUT) {
        Some(raw) => raw.parse().map_err(|_| {
            RemoteError::Config(format!("{ENV_TIMEOUT} must be a number of seconds, got '{raw}'"))
        })?,
        None => file
            .and_then(|f| f.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    Ok(RemoteConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
        schema,
        timeout_secs,
    })
}

/// Report where each configuration value would be loaded from.
pub fn config_sources() -> ConfigSources {
    let file = load_config_file();
    sources(|var| std::env::var(var).ok(), file.as_ref())
}

fn sources(env: impl Fn(&str) -> Option<String>, file: Option<&RemoteSection>) -> ConfigSources {
    let pick = |var: &'static str, in_file: bool, has_default: bool| {
        if env(var).is_some() {
            ConfigSource::EnvVar(var)
        } else if in_file {
            ConfigSource::ConfigFile
        } else if has_default {
            ConfigSource::Default
        } else {
            ConfigSource::Missing
        }
    };

    ConfigSources {
        base_url: pick(
            ENV_BASE_URL,
            file.is_some_and(|f| f.base_url.is_some()),
            false,
        ),
        api_key: pick(ENV_API_KEY, file.is_some_and(|f| f.api_key.is_some()), false),
        schema: pick(ENV_SCHEMA, file.is_some_and(|f| f.schema.is_some()), true),
        timeout_secs: pick(
            ENV_TIMEOUT,
            file.is_some_and(|f| f.timeout_secs.is_some()),
            true,
        ),
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
