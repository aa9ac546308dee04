// ── Core error types ──
//
// Errors that reach callers of the router API. Transport and parse failures
// from eerouter-api are normally logged and swallowed at the fetch boundary;
// the `From<eerouter_api::Error>` impl covers the paths where they are not
// (client construction, endpoint URLs).

use thiserror::Error;

use crate::convert::CleanError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Not authenticated: log in to the router first")]
    AuthenticationRequired,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ── Capability errors ────────────────────────────────────────────
    #[error("Unsupported router version {version}: only versions 2 and 3 are supported")]
    UnsupportedVersion { version: u32 },

    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed device record: {0}")]
    MalformedRecord(#[from] CleanError),

    #[error("Unexpected router response: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eerouter_api::Error> for CoreError {
    fn from(err: eerouter_api::Error) -> Self {
        match err {
            eerouter_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            eerouter_api::Error::Unreachable { url, reason } => {
                CoreError::ConnectionFailed { url, reason }
            }
            eerouter_api::Error::Status { status, url } => CoreError::ConnectionFailed {
                url,
                reason: format!("HTTP {status}"),
            },
            eerouter_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid router host: {e}"),
            },
            eerouter_api::Error::Client(message) => CoreError::Config { message },
            eerouter_api::Error::Parse(e) => CoreError::InvalidResponse {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use eerouter_api::parse::ParseError;

    use super::*;

    #[test]
    fn status_maps_to_connection_failure() {
        let err = CoreError::from(eerouter_api::Error::Status {
            status: 503,
            url: "http://192.168.1.1/status_conn.xml".into(),
        });
        assert!(matches!(err, CoreError::ConnectionFailed { ref reason, .. } if reason == "HTTP 503"));
    }

    #[test]
    fn parse_failure_maps_to_invalid_response() {
        let err = CoreError::from(eerouter_api::Error::Parse(ParseError::ListNotFound(
            "known_device_list".into(),
        )));
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
        assert!(err.to_string().contains("known_device_list"));
    }

    #[test]
    fn unsupported_version_message() {
        let err = CoreError::UnsupportedVersion { version: 4 };
        assert_eq!(
            err.to_string(),
            "Unsupported router version 4: only versions 2 and 3 are supported"
        );
    }
}
