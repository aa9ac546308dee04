// ── Presence scanner ──
//
// Glue for presence-detection hosts: each scan opens a session, refreshes
// the known-device map and reports the MACs currently active.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, error};

use eerouter_api::{HttpTransport, Transport};

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::model::{Device, Timestamp};
use crate::router::Router;

/// Router port names and the interface labels reported for them.
pub const PORT_MAP: [(&str, &str); 6] = [
    ("ath0", "wifi5Ghz"),
    ("ath1", "wifi2.4Ghz"),
    ("eth0_0", "eth0"),
    ("eth0_1", "eth1"),
    ("eth0_2", "eth2"),
    ("eth0_3", "eth3"),
];

/// Interface label for a router port name. Unknown ports are returned as-is.
pub fn port_label(port: &str) -> &str {
    PORT_MAP
        .iter()
        .find(|(name, _)| *name == port)
        .map_or(port, |(_, label)| *label)
}

/// Per-device details exposed alongside presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraAttributes {
    pub ip: Option<String>,
    pub mac: String,
    pub port: Option<String>,
    pub last_active: Option<Timestamp>,
}

/// Tracks which devices are on the network across scans.
#[derive(Debug)]
pub struct DeviceScanner<T = HttpTransport> {
    router: Router<T>,
    devices: IndexMap<String, Device>,
}

impl DeviceScanner<HttpTransport> {
    pub fn from_config(config: &RouterConfig) -> Result<Self, CoreError> {
        Ok(Self::new(Router::from_config(config)?))
    }
}

impl<T: Transport> DeviceScanner<T> {
    pub fn new(router: Router<T>) -> Self {
        Self {
            router,
            devices: IndexMap::new(),
        }
    }

    pub fn router(&self) -> &Router<T> {
        &self.router
    }

    /// Whether the configured router can be logged into and reports at
    /// least one device. Failures are logged, not returned.
    pub async fn check_config(&mut self) -> bool {
        match self.router.with_session(async |r| r.get_devices().await).await {
            Ok(devices) => !devices.is_empty(),
            Err(e) => {
                error!(host = %self.router.host(), error = %e, "failed to connect to the router");
                false
            }
        }
    }

    /// Refresh the device map and return the MACs currently active.
    pub async fn scan_devices(&mut self) -> Result<Vec<String>, CoreError> {
        let devices = self.router.with_session(async |r| r.get_devices().await).await?;
        self.devices = devices.into_iter().map(|d| (d.mac.clone(), d)).collect();

        let macs: Vec<String> = self
            .devices
            .values()
            .filter(|d| d.is_active())
            .map(|d| d.mac.clone())
            .collect();
        debug!(?macs, "scan complete");
        Ok(macs)
    }

    /// Devices seen in the last scan, in router order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device(&self, mac: &str) -> Option<&Device> {
        self.devices.get(mac)
    }

    /// Hostname of a device from the last scan, if it has one.
    pub fn device_name(&self, mac: &str) -> Option<&str> {
        self.devices
            .get(mac)?
            .hostname
            .as_deref()
            .filter(|h| !h.is_empty())
    }

    pub fn extra_attributes(&self, mac: &str) -> Option<ExtraAttributes> {
        let device = self.devices.get(mac)?;
        Some(ExtraAttributes {
            ip: device.ip.clone(),
            mac: device.mac.clone(),
            port: device.port.as_deref().map(|p| port_label(p).to_owned()),
            last_active: device.time_last_active.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ports_are_relabelled() {
        assert_eq!(port_label("ath0"), "wifi5Ghz");
        assert_eq!(port_label("ath1"), "wifi2.4Ghz");
        assert_eq!(port_label("eth0_3"), "eth3");
    }

    #[test]
    fn unknown_ports_pass_through() {
        assert_eq!(port_label("wl0"), "wl0");
        assert_eq!(port_label(""), "");
    }
}
