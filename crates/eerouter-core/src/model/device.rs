// ── Device domain type ──

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A timestamp field from the router.
///
/// Routers report times as `YYYY/MM/DD hh:mm:ss`; anything else is kept as
/// the router sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Parsed(NaiveDateTime),
    Raw(String),
}

impl Timestamp {
    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Parsed(dt) => Some(dt),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(dt) => write!(f, "{}", dt.format(crate::convert::DATETIME_FORMAT)),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

/// A device known to the router, connected now or in the past.
///
/// `mac` is always present; every other text field is `None` when the router
/// reports it as unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub mac: String,
    pub hostname: Option<String>,
    /// Router port name, e.g. `eth0_1` or `ath0`.
    pub port: Option<String>,
    pub ip: Option<String>,
    pub ipv6: Option<String>,
    pub ipv6_ll: Option<String>,
    pub time_first_seen: Option<Timestamp>,
    pub time_last_active: Option<Timestamp>,
    pub activity: bool,
    pub activity_ip: bool,
    pub activity_ipv6: bool,
    pub activity_ipv6_ll: bool,
    pub dhcp_option: Option<String>,
    pub name: Option<String>,
    pub os: Option<String>,
    pub device: Option<String>,
    pub device_oui: Option<String>,
    pub device_serial: Option<String>,
    pub device_class: Option<String>,
}

impl Device {
    /// Whether the router currently sees the device on IPv4. This is the
    /// presence signal.
    pub fn is_active(&self) -> bool {
        self.activity_ip
    }

    /// Hostname, falling back to the router-assigned name.
    pub fn display_name(&self) -> Option<&str> {
        self.hostname.as_deref().or(self.name.as_deref())
    }
}
