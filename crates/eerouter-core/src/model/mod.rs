// ── Domain model ──
//
// Normalized types handed to consumers. Built from cleaned router records
// in `convert`; never deserialized from the wire directly.

pub mod device;
pub mod ssid;

pub use device::{Device, Timestamp};
pub use ssid::Ssid;
