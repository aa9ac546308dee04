// BrightBox 2 SSID fields
//
// Each SSID property lives in its own status element, holding that
// property's values for every SSID as `'first','second',...`. Records are
// rebuilt by position.

use std::sync::LazyLock;

use regex::Regex;

use super::status_xml::StatusDocument;
use super::{ParseError, RawRecord, percent_decode};

/// Status elements that make up one SSID record, in schema order.
pub const SSID_FIELDS: [&str; 5] = [
    "ssid_ssid",
    "ssid_ssidEnable",
    "ssid_security",
    "ssid_wpaPassword",
    "ssid_broadcast",
];

#[allow(clippy::unwrap_used)]
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']*)'").unwrap());

/// Extract every single-quoted token, percent-decoded, in order.
pub fn parse_ssid_value(ssid_value: &str) -> Vec<String> {
    VALUE_RE
        .captures_iter(ssid_value)
        .filter_map(|cap| cap.get(1))
        .map(|m| percent_decode(m.as_str()).into_owned())
        .collect()
}

/// Zip the per-field value lists into one record per SSID position.
///
/// Lists are aligned purely by index. A position that a shorter list does
/// not reach gets the empty string, which the cleaner treats as "unknown".
pub fn assemble_ssids(doc: &StatusDocument) -> Result<Vec<RawRecord>, ParseError> {
    let columns = SSID_FIELDS
        .iter()
        .map(|field| Ok((*field, parse_ssid_value(doc.value(field)?))))
        .collect::<Result<Vec<_>, ParseError>>()?;

    let count = columns
        .iter()
        .map(|(_, values)| values.len())
        .max()
        .unwrap_or(0);

    Ok((0..count)
        .map(|index| {
            columns
                .iter()
                .map(|(field, values)| {
                    let value = values.get(index).cloned().unwrap_or_default();
                    ((*field).to_owned(), value)
                })
                .collect()
        })
        .collect())
}
