// ── Runtime router configuration ──
//
// Describes which router to talk to and how. Never touches disk: the CLI
// (or any other host) builds a `RouterConfig` and hands it to
// `Router::from_config`.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Default login name on both router generations.
pub const DEFAULT_USERNAME: &str = "admin";

/// Router hardware generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Generation {
    /// EE BrightBox 2 (version 2).
    #[strum(serialize = "BrightBox 2")]
    BrightBox2,
    /// EE Smart Hub (version 3).
    #[strum(serialize = "Smart Hub")]
    SmartHub,
}

impl Generation {
    pub fn from_version(version: u32) -> Result<Self, CoreError> {
        match version {
            2 => Ok(Self::BrightBox2),
            3 => Ok(Self::SmartHub),
            version => Err(CoreError::UnsupportedVersion { version }),
        }
    }

    pub fn version(self) -> u32 {
        match self {
            Self::BrightBox2 => 2,
            Self::SmartHub => 3,
        }
    }

    /// Factory-default LAN address.
    pub fn default_host(self) -> &'static str {
        match self {
            Self::BrightBox2 => "192.168.1.1",
            Self::SmartHub => "192.168.1.254",
        }
    }
}

/// Configuration for connecting to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router generation number: 2 (BrightBox 2) or 3 (Smart Hub).
    pub version: u32,
    /// Host or `host:port`. Defaults per generation.
    pub host: Option<String>,
    /// Login name (BrightBox 2 only). Defaults to `admin`.
    pub username: Option<String>,
    /// Admin password. Required for the BrightBox 2.
    pub password: Option<SecretString>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            version: 2,
            host: None,
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl RouterConfig {
    pub fn generation(&self) -> Result<Generation, CoreError> {
        Generation::from_version(self.version)
    }

    /// Configured host, or the generation's default.
    pub fn host_or_default(&self, generation: Generation) -> &str {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(generation.default_host())
    }

    pub fn username_or_default(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USERNAME)
    }
}
