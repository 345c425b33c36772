//! Configuration for picfg.
//!
//! TOML profiles, password resolution from the environment, and
//! translation to `picfg_core::ExtractorConfig`. Passwords are never read
//! from or written to the config file; a profile can only name the
//! environment variable that holds one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use picfg_core::{DEFAULT_PAGE_SIZE, ExtractorConfig, TlsVerification};

/// Environment variable consulted for the password when a profile
/// doesn't name its own.
pub const PASSWORD_ENV: &str = "PICFG_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named Prime server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause after each request, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Records requested per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Skip TLS certificate verification.
    #[serde(default = "default_insecure")]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            request_delay_ms: default_request_delay_ms(),
            page_size: default_page_size(),
            insecure: default_insecure(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_request_delay_ms() -> u64 {
    100
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_insecure() -> bool {
    true
}

/// A named Prime server profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://prime.example.com").
    pub url: Option<String>,

    /// API username.
    pub username: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Directory under which `pi_cfg_files/` is created.
    pub output_dir: Option<PathBuf>,

    /// Path to custom CA certificate (implies verification).
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "picfg", "picfg").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("picfg");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// A missing file is not an error. Environment overrides use the
/// `PICFG_` prefix with `__` as the nesting separator, e.g.
/// `PICFG_DEFAULTS__PAGE_SIZE=50`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PICFG_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| {
            let mut available: Vec<String> = self.profiles.keys().cloned().collect();
            available.sort();
            ConfigError::ProfileNotFound {
                name: name.into(),
                available,
            }
        })
    }

    /// The profile selected by `requested`, falling back to `default_profile`.
    ///
    /// An explicitly requested profile must exist; a missing default
    /// profile yields `None`.
    pub fn active_profile(&self, requested: Option<&str>) -> Result<Option<(String, &Profile)>, ConfigError> {
        if let Some(name) = requested {
            return self.profile(name).map(|p| Some((name.to_owned(), p)));
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name).map(|p| (name.to_owned(), p))))
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a password from the environment.
///
/// 1. The variable named by the profile's `password_env`
/// 2. `PICFG_PASSWORD`
pub fn resolve_password(profile: Option<&Profile>) -> Option<SecretString> {
    if let Some(env_name) = profile.and_then(|p| p.password_env.as_deref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }
    std::env::var(PASSWORD_ENV).ok().map(SecretString::from)
}

/// Parse a user-supplied server URL, adding `https://` when no scheme is given.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    url::Url::parse(&candidate)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .ok_or_else(|| ConfigError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {raw}"),
        })
}

/// Build an `ExtractorConfig` from resolved connection values plus
/// profile/default tuning.
pub fn extractor_config(
    url: url::Url,
    username: String,
    password: SecretString,
    profile: Option<&Profile>,
    defaults: &Defaults,
) -> ExtractorConfig {
    let tls = match profile {
        Some(Profile {
            ca_cert: Some(ca), ..
        }) => TlsVerification::CustomCa(ca.clone()),
        _ if profile.and_then(|p| p.insecure).unwrap_or(defaults.insecure) => {
            TlsVerification::DangerAcceptInvalid
        }
        _ => TlsVerification::SystemDefaults,
    };

    let mut config = ExtractorConfig::new(url, username, password);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.and_then(|p| p.timeout).unwrap_or(defaults.timeout));
    config.request_delay = Duration::from_millis(defaults.request_delay_ms);
    config.page_size = defaults.page_size;
    config
}
