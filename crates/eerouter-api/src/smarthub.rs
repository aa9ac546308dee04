// Smart Hub endpoints
//
// No authentication: the network page script is served to anyone on the
// LAN.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::parse::{RawRecord, parse_known_device_list};
use crate::transport::{HttpTransport, Request, Transport};

/// Path of the network-status script.
pub const NETWORK_SCRIPT_PATH: &str = "cgi/cgi_myNetwork.js";

#[derive(Debug, Clone)]
pub struct SmartHubClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
}

impl<T: Transport> SmartHubClient<T> {
    /// Client for the router at `host` (`address` or `address:port`).
    pub fn new(transport: T, host: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the network-status script text.
    pub async fn network_script(&self) -> Result<String, Error> {
        let url = self.base_url.join(NETWORK_SCRIPT_PATH)?;
        debug!("fetching network script from {url}");

        let resp = self.transport.send(Request::get(url.clone())).await?;
        if !resp.is_success() {
            return Err(Error::Status {
                status: resp.status,
                url: url.to_string(),
            });
        }
        Ok(resp.body)
    }

    /// Raw device records from the script's `known_device_list`.
    pub async fn known_devices(&self) -> Result<Vec<RawRecord>, Error> {
        let script = self.network_script().await?;
        Ok(parse_known_device_list(&script)?)
    }
}
