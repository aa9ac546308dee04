// ── Wireless network domain type (BrightBox 2 only) ──

use secrecy::SecretString;
use serde::Serialize;

/// One wireless network configured on the router.
#[derive(Debug, Clone, Serialize)]
pub struct Ssid {
    pub ssid: String,
    pub enabled: bool,
    /// Router security mode code.
    pub security: Option<i64>,
    /// WPA passphrase. Never serialized.
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,
    pub broadcast: bool,
}
