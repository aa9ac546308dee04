// eerouter-core: device-list retrieval and normalization on top of eerouter-api.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod router;
pub mod scanner;
pub mod split;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_USERNAME, Generation, RouterConfig};
pub use convert::{CleanError, CleanRecord, FieldValue};
pub use error::CoreError;
pub use model::{Device, Ssid, Timestamp};
pub use router::{BrightBox2, Router, SmartHub};
pub use scanner::{DeviceScanner, ExtraAttributes, port_label};

// Transport seam, for callers supplying their own.
pub use eerouter_api::{HttpTransport, Request, Response, Transport};
