// Router document parsers
//
// Each router generation serves its device list in a different
// semi-structured text format. The parsers here only extract the known
// shapes and return flat string records; type conversion happens in
// `eerouter-core`.

pub mod device_db;
pub mod script;
pub mod ssid;
pub mod status_xml;

use std::borrow::Cow;

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use thiserror::Error;

pub use device_db::parse_device_db;
pub use script::{KNOWN_DEVICE_LIST, parse_known_device_list};
pub use ssid::{SSID_FIELDS, assemble_ssids, parse_ssid_value};
pub use status_xml::StatusDocument;

/// One device (or SSID) exactly as extracted from a router document:
/// router-specific field key to undecoded-type string value.
pub type RawRecord = IndexMap<String, String>;

/// Errors raised while extracting records from a fetched document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The status document is not well-formed XML.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An entity in an XML attribute could not be unescaped.
    #[error("failed to decode XML attribute: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// An expected element is absent from the status document.
    #[error("element <{0}> not found in status document")]
    MissingElement(String),

    /// The element exists but carries no `value` attribute.
    #[error("element <{element}> has no `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: String },

    /// The network-status script could not be tokenized or parsed.
    #[error("script syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The script parsed, but the device list variable is not declared.
    #[error("`{0}` variable not found in script")]
    ListNotFound(String),
}

/// Decode `%XX` escapes. Invalid UTF-8 is replaced rather than rejected and
/// malformed escapes are kept verbatim, so this never fails.
pub fn percent_decode(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}
