// ── Router session drivers ──
//
// One driver per router generation, unified behind the `Router` enum. Every
// device query goes through the per-generation `fetch_devices` primitive:
// fetch the document, extract raw records, normalize. Transport and parse
// failures are logged and yield an empty list so a polling caller keeps
// running; session and record-shape errors are raised.

use secrecy::SecretString;
use tracing::{debug, error, warn};

use eerouter_api::{
    BrightBox2Client, HttpTransport, SmartHubClient, Transport, TransportConfig, password_digest,
};

use crate::config::{Generation, RouterConfig};
use crate::convert::{clean_devices, clean_ssids};
use crate::error::CoreError;
use crate::model::{Device, Ssid};
use crate::split::split_multimac;

// ── BrightBox 2 ──────────────────────────────────────────────────────

/// BrightBox 2 driver. Holds the `urn` session token while authenticated.
#[derive(Debug)]
pub struct BrightBox2<T = HttpTransport> {
    client: BrightBox2Client<T>,
    host: String,
    username: String,
    digest: String,
    urn: Option<String>,
}

impl<T: Transport> BrightBox2<T> {
    pub fn new(
        transport: T,
        host: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            client: BrightBox2Client::new(transport, host)?,
            host: host.to_owned(),
            username: username.to_owned(),
            digest: password_digest(password),
            urn: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.urn.is_some()
    }

    /// Log in. Returns `false` (and stays logged out) on rejected
    /// credentials or an unreachable router.
    pub async fn authenticate(&mut self) -> bool {
        debug!(username = %self.username, host = %self.host, "authenticating");
        match self.client.login(&self.username, &self.digest).await {
            Ok(Some(urn)) => {
                debug!("authenticated");
                self.urn = Some(urn);
                true
            }
            Ok(None) => {
                error!(host = %self.host, "authentication failed: no session token returned");
                false
            }
            Err(e) => {
                error!(host = %self.host, error = %e, "authentication request failed");
                false
            }
        }
    }

    /// Log out and drop the session. The session is cleared even when the
    /// logout request fails.
    pub async fn forget(&mut self) {
        let Some(urn) = self.urn.take() else {
            debug!("no session to log out of");
            return;
        };
        debug!(host = %self.host, "logging out");
        if let Err(e) = self.client.logout(&urn).await {
            warn!(host = %self.host, error = %e, "logout request failed");
        }
    }

    fn urn(&self) -> Result<&str, CoreError> {
        self.urn.as_deref().ok_or(CoreError::AuthenticationRequired)
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        let urn = self.urn()?;
        let raw = match self.client.known_devices(urn).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(host = %self.host, error = %e, "failed to read device list");
                return Ok(Vec::new());
            }
        };
        Ok(clean_devices(&raw)?)
    }

    pub async fn get_ssids(&self) -> Result<Vec<Ssid>, CoreError> {
        let urn = self.urn()?;
        let raw = match self.client.ssids(urn).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(host = %self.host, error = %e, "failed to read SSID list");
                return Ok(Vec::new());
            }
        };
        Ok(clean_ssids(&raw)?)
    }
}

// ── Smart Hub ────────────────────────────────────────────────────────

/// Smart Hub driver. Stateless: the device script needs no login.
#[derive(Debug)]
pub struct SmartHub<T = HttpTransport> {
    client: SmartHubClient<T>,
    host: String,
}

impl<T: Transport> SmartHub<T> {
    pub fn new(transport: T, host: &str) -> Result<Self, CoreError> {
        Ok(Self {
            client: SmartHubClient::new(transport, host)?,
            host: host.to_owned(),
        })
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        let raw = match self.client.known_devices().await {
            Ok(raw) => raw,
            Err(e) => {
                error!(host = %self.host, error = %e, "failed to read device list");
                return Ok(Vec::new());
            }
        };
        Ok(clean_devices(&split_multimac(raw))?)
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────

/// A connection to one router of either generation.
#[derive(Debug)]
pub enum Router<T = HttpTransport> {
    BrightBox2(BrightBox2<T>),
    SmartHub(SmartHub<T>),
}

impl Router<HttpTransport> {
    /// Build a router over the reqwest transport.
    ///
    /// The version is checked before anything else, so an unsupported
    /// version fails without touching the network.
    pub fn from_config(config: &RouterConfig) -> Result<Self, CoreError> {
        config.generation()?;
        let transport = HttpTransport::new(&TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        })?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Router<T> {
    /// Build a router over a caller-supplied transport.
    pub fn with_transport(config: &RouterConfig, transport: T) -> Result<Self, CoreError> {
        let generation = config.generation()?;
        let host = config.host_or_default(generation);
        debug!(%generation, host, "creating router");

        match generation {
            Generation::BrightBox2 => {
                let password = config.password.as_ref().ok_or_else(|| CoreError::Config {
                    message: "a password is required for the BrightBox 2".into(),
                })?;
                Ok(Self::BrightBox2(BrightBox2::new(
                    transport,
                    host,
                    config.username_or_default(),
                    password,
                )?))
            }
            Generation::SmartHub => Ok(Self::SmartHub(SmartHub::new(transport, host)?)),
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Self::BrightBox2(_) => Generation::BrightBox2,
            Self::SmartHub(_) => Generation::SmartHub,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Self::BrightBox2(r) => &r.host,
            Self::SmartHub(r) => &r.host,
        }
    }

    /// Always `true` for the Smart Hub, which has no session.
    pub fn is_authenticated(&self) -> bool {
        match self {
            Self::BrightBox2(r) => r.is_authenticated(),
            Self::SmartHub(_) => true,
        }
    }

    pub async fn authenticate(&mut self) -> bool {
        match self {
            Self::BrightBox2(r) => r.authenticate().await,
            Self::SmartHub(_) => true,
        }
    }

    pub async fn forget(&mut self) {
        if let Self::BrightBox2(r) = self {
            r.forget().await;
        }
    }

    /// Run `body` inside an authenticated session.
    ///
    /// Fails with `AuthenticationFailed` without running `body` if login is
    /// rejected. Once logged in, the session is closed exactly once after
    /// `body` finishes, whether it succeeded or not.
    ///
    /// Logout only runs if the returned future is driven to completion. A
    /// future dropped after login (a timeout or `select!` losing branch)
    /// leaves the router session open until [`Router::forget`] is called.
    pub async fn with_session<R, F>(&mut self, body: F) -> Result<R, CoreError>
    where
        F: AsyncFnOnce(&Self) -> Result<R, CoreError>,
    {
        if !self.authenticate().await {
            return Err(CoreError::AuthenticationFailed {
                message: format!("{} at {} rejected the login", self.generation(), self.host()),
            });
        }
        let result = body(&*self).await;
        self.forget().await;
        result
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        match self {
            Self::BrightBox2(r) => r.fetch_devices().await,
            Self::SmartHub(r) => r.fetch_devices().await,
        }
    }

    /// Every device the router has recorded, connected or not.
    pub async fn get_devices(&self) -> Result<Vec<Device>, CoreError> {
        let devices = self.fetch_devices().await?;
        debug!(count = devices.len(), "fetched devices");
        Ok(devices)
    }

    /// Devices currently active on IPv4.
    pub async fn get_active_devices(&self) -> Result<Vec<Device>, CoreError> {
        let active: Vec<Device> = self
            .fetch_devices()
            .await?
            .into_iter()
            .filter(Device::is_active)
            .collect();
        debug!(count = active.len(), "fetched active devices");
        Ok(active)
    }

    /// Configured wireless networks (BrightBox 2 only).
    pub async fn get_ssids(&self) -> Result<Vec<Ssid>, CoreError> {
        match self {
            Self::BrightBox2(r) => r.get_ssids().await,
            Self::SmartHub(_) => Err(CoreError::Unsupported {
                operation: "listing SSIDs".into(),
                required: "a BrightBox 2 (router version 2)".into(),
            }),
        }
    }
}
