//! Shared configuration for EE router tools.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `eerouter_core::RouterConfig`. The CLI layers its flags
//! on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use eerouter_core::{Generation, RouterConfig};

/// Keyring service name for stored router passwords.
pub const KEYRING_SERVICE: &str = "eerouter";

/// Environment variable consulted for the password when a profile names none.
pub const PASSWORD_ENV: &str = "EEROUTER_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
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

impl Config {
    /// Profile name to use: the explicit one, else `default_profile`, else
    /// `"default"`.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// The named profile. A missing `"default"` profile resolves to the
    /// built-in defaults so a fresh install works without a config file.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile {
                timeout: Some(self.defaults.timeout),
                ..Profile::default()
            }),
            None => Err(ConfigError::UnknownProfile {
                profile: name.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named router profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Router generation: 2 (BrightBox 2) or 3 (Smart Hub).
    #[serde(default = "default_version")]
    pub version: u32,

    /// Router host. Defaults per generation (192.168.1.254 for the Smart Hub).
    pub host: Option<String>,

    /// Login name (BrightBox 2 only).
    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            version: default_version(),
            host: None,
            username: default_username(),
            password: None,
            password_env: None,
            timeout: None,
        }
    }
}

fn default_version() -> u32 {
    3
}
fn default_username() -> String {
    eerouter_core::DEFAULT_USERNAME.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "eerouter", "eerouter").map_or_else(
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
    p.push("eerouter");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an
/// error; defaults apply.
///
/// Environment keys nest on `__`: `EEROUTER_PROFILES__HOME__HOST`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EEROUTER_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Password resolution (without CLI flags) ─────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve a profile's password from the credential chain.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    debug!(profile = profile_name, "password stored in keyring");
    Ok(())
}

/// A router host is a bare host or `host:port`, never a URL.
pub fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() || host.contains('/') {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("expected a host or host:port, got '{host}'"),
        });
    }
    Ok(())
}

/// Build a `RouterConfig` from a profile, without CLI flag overrides.
///
/// The password is required for the BrightBox 2 and looked up
/// opportunistically for the Smart Hub, which never uses it.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<RouterConfig, ConfigError> {
    let generation =
        Generation::from_version(profile.version).map_err(|e| ConfigError::Validation {
            field: "version".into(),
            reason: e.to_string(),
        })?;

    if let Some(ref host) = profile.host {
        validate_host(host)?;
    }

    let password = match generation {
        Generation::BrightBox2 => Some(resolve_password(profile, profile_name)?),
        Generation::SmartHub => resolve_password(profile, profile_name).ok(),
    };

    Ok(RouterConfig {
        version: profile.version,
        host: profile.host.clone(),
        username: Some(profile.username.clone()),
        password,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
    })
}
