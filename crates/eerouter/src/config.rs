//! CLI configuration: thin wrapper around `eerouter_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--host,
//! --router-version, --password, etc.) on top of the active profile.

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use eerouter_core::{Generation, RouterConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use eerouter_config::{
    Config, Profile, config_path, load_config, resolve_password, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Output format: flag, then the config's `defaults.output`, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Look up a profile, listing the alternatives when it doesn't exist.
pub fn find_profile(config: &Config, name: &str) -> Result<Profile, CliError> {
    config.profile(name).map_err(|_| {
        let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        CliError::ProfileNotFound {
            name: name.into(),
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        }
    })
}

/// Translate the active profile + global flags into a `RouterConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_router_config(global: &GlobalOpts, config: &Config) -> Result<RouterConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = find_profile(config, &profile_name)?;

    // 1. Generation (flag > profile)
    let version = global.router_version.unwrap_or(profile.version);
    let generation = Generation::from_version(version)?;

    // 2. Host (flag > profile > per-generation default)
    let host = global.host.clone().or_else(|| profile.host.clone());
    if let Some(ref host) = host {
        eerouter_config::validate_host(host)?;
    }

    // 3. Password: flag/env first, then the profile's credential chain.
    //    The Smart Hub never logs in, so it needs none.
    let password = match (&global.password, generation) {
        (Some(pw), _) => Some(SecretString::from(pw.clone())),
        (None, Generation::BrightBox2) => Some(resolve_password(&profile, &profile_name)?),
        (None, Generation::SmartHub) => None,
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(RouterConfig {
        version,
        host,
        username: Some(
            global
                .username
                .clone()
                .unwrap_or_else(|| profile.username.clone()),
        ),
        password,
        timeout: Duration::from_secs(timeout),
    })
}
