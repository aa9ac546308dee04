//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use eerouter_config::ConfigError;
use eerouter_core::CoreError;

/// Process exit codes. Success is 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the router at {url}")]
    #[diagnostic(
        code(eerouter::connection_failed),
        help(
            "Check that the router is reachable: {reason}\n\
             Override the address with --host, or raise --timeout."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(eerouter::auth_failed),
        help(
            "Verify the admin password printed on the back of the router.\n\
             Store it with: eerouter config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(eerouter::no_credentials),
        help(
            "The BrightBox 2 requires the admin password.\n\
             Run: eerouter config set-password --profile {profile}\n\
             Or set the EEROUTER_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(eerouter::not_found),
        help("Run: eerouter {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Router ───────────────────────────────────────────────────────

    #[error("The router returned data that could not be read: {message}")]
    #[diagnostic(code(eerouter::router_response))]
    RouterResponse { message: String },

    // ── Unsupported ──────────────────────────────────────────────────

    #[error("Router version {version} is not supported")]
    #[diagnostic(
        code(eerouter::unsupported_version),
        help("Use --router-version 2 (BrightBox 2) or 3 (Smart Hub).")
    )]
    UnsupportedVersion { version: u32 },

    #[error("Operation '{operation}' is not supported by this router")]
    #[diagnostic(code(eerouter::unsupported), help("This command requires {required}."))]
    Unsupported { operation: String, required: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eerouter::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(eerouter::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Check with: eerouter config show"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(eerouter::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {reason}")]
    #[diagnostic(code(eerouter::config_write))]
    ConfigWrite { reason: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(eerouter::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(eerouter::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::UnsupportedVersion { .. } | Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },

            CoreError::AuthenticationRequired => Self::AuthFailed {
                message: "no active session".into(),
            },

            CoreError::UnsupportedVersion { version } => Self::UnsupportedVersion { version },

            CoreError::Unsupported {
                operation,
                required,
            } => Self::Unsupported {
                operation,
                required,
            },

            CoreError::MalformedRecord(e) => Self::RouterResponse {
                message: e.to_string(),
            },

            CoreError::InvalidResponse { message } => Self::RouterResponse { message },

            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: "(none)".into(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
            ConfigError::Keyring(e) => Self::ConfigWrite {
                reason: format!("keyring: {e}"),
            },
            ConfigError::Serialization(e) => Self::ConfigWrite {
                reason: e.to_string(),
            },
        }
    }
}
