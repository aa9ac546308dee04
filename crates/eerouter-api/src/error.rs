use thiserror::Error;

use crate::parse::ParseError;

/// Top-level error type for the `eerouter-api` crate.
///
/// Covers transport failures and the structural parse failures of the
/// router documents. `eerouter-core` decides which of these reach the caller
/// and which degrade to an empty result.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The router could not be reached (raised by non-reqwest transports).
    #[error("Cannot reach router at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Non-success HTTP status on a data endpoint.
    #[error("Unexpected HTTP {status} from {url}")]
    Status { status: u16, url: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The document was fetched but its expected structure was not found.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns `true` for network-level failures, as opposed to a
    /// response the router actually produced.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Unreachable { .. } | Self::Status { .. }
        )
    }

    /// Returns `true` if the failure came from parsing a fetched document.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
