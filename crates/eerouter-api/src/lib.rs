//! Async client for the web management endpoints of EE home routers.
//!
//! Two router generations are covered:
//!
//! - **BrightBox 2** ([`BrightBox2Client`]): cookie session obtained from
//!   `login.cgi`, connected devices and SSIDs served as attribute blobs inside
//!   `status_conn.xml`.
//! - **Smart Hub** ([`SmartHubClient`]): unauthenticated, devices served as a
//!   JavaScript object-literal list inside `cgi/cgi_myNetwork.js`.
//!
//! Every request goes through the [`Transport`] seam; [`HttpTransport`] is the
//! `reqwest`-backed implementation. The [`parse`] module turns the raw
//! documents into [`RawRecord`]s. Normalizing those records is the job of
//! `eerouter-core`.

pub mod brightbox2;
pub mod error;
pub mod parse;
pub mod smarthub;
pub mod transport;

pub use brightbox2::{BrightBox2Client, password_digest};
pub use error::Error;
pub use parse::{ParseError, RawRecord};
pub use smarthub::SmartHubClient;
pub use transport::{HttpTransport, Method, Request, Response, Transport, TransportConfig};
