// ── Raw-record normalization ──
//
// Routers report every field as a string, with their own encodings for
// "unknown", booleans and dates. The converters here turn one raw token into
// a typed value; the cleaner applies a fixed schema of converters to each raw
// record, and the typed `Device` / `Ssid` values are built from the result.

use std::num::ParseIntError;

use chrono::NaiveDateTime;
use eerouter_api::RawRecord;
use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Device, Ssid, Timestamp};

/// Raw values that mean "no value".
pub const SENTINELS: [&str; 3] = ["Unknown", "NA", ""];

/// Format of router timestamps.
pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub fn is_sentinel(value: &str) -> bool {
    SENTINELS.contains(&value)
}

// ── Converters ──────────────────────────────────────────────────────

pub fn convert_string(value: &str) -> Option<String> {
    (!is_sentinel(value)).then(|| value.to_owned())
}

/// Base-10 integer. Sentinels are checked before parsing and give `None`.
pub fn convert_integer(value: &str) -> Result<Option<i64>, ParseIntError> {
    if is_sentinel(value) {
        return Ok(None);
    }
    value.trim().parse().map(Some)
}

/// Anything that can be read as a router boolean.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for str {
    /// Exactly `True`, `true`, `1`, `Yes` and `yes`.
    fn is_truthy(&self) -> bool {
        matches!(self, "True" | "true" | "1" | "Yes" | "yes")
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        self.as_str().is_truthy()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self == 1
    }
}

/// Router boolean. There is no null case: anything unrecognized is false.
pub fn convert_boolean<T: Truthy + ?Sized>(value: &T) -> bool {
    value.is_truthy()
}

/// `YYYY/MM/DD hh:mm:ss`, else `None` for a sentinel, else the raw text.
pub fn convert_datetime(value: &str) -> Option<Timestamp> {
    match NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        Ok(dt) => Some(Timestamp::Parsed(dt)),
        Err(_) if is_sentinel(value) => None,
        Err(_) => Some(Timestamp::Raw(value.to_owned())),
    }
}

// ── Schema ──────────────────────────────────────────────────────────

/// Conversion applied to one raw field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Converter {
    String,
    Integer,
    Boolean,
    Datetime,
}

impl Converter {
    pub fn apply(self, raw: &str) -> Result<FieldValue, ParseIntError> {
        Ok(match self {
            Self::String => convert_string(raw).map_or(FieldValue::Null, FieldValue::Text),
            Self::Integer => convert_integer(raw)?.map_or(FieldValue::Null, FieldValue::Integer),
            Self::Boolean => FieldValue::Bool(convert_boolean(raw)),
            Self::Datetime => match convert_datetime(raw) {
                Some(Timestamp::Parsed(dt)) => FieldValue::DateTime(dt),
                Some(Timestamp::Raw(text)) => FieldValue::Text(text),
                None => FieldValue::Null,
            },
        })
    }
}

/// One `(source, target, converter)` entry of a cleaning schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub source: &'static str,
    pub target: &'static str,
    pub converter: Converter,
}

const fn field(name: &'static str, converter: Converter) -> FieldSpec {
    FieldSpec {
        source: name,
        target: name,
        converter,
    }
}

/// Device records: every field keeps its router name.
pub const DEVICE_SCHEMA: &[FieldSpec] = &[
    field("mac", Converter::String),
    field("hostname", Converter::String),
    field("port", Converter::String),
    field("ip", Converter::String),
    field("ipv6", Converter::String),
    field("ipv6_ll", Converter::String),
    field("time_first_seen", Converter::Datetime),
    field("time_last_active", Converter::Datetime),
    field("activity", Converter::Boolean),
    field("activity_ip", Converter::Boolean),
    field("activity_ipv6", Converter::Boolean),
    field("activity_ipv6_ll", Converter::Boolean),
    field("dhcp_option", Converter::String),
    field("name", Converter::String),
    field("os", Converter::String),
    field("device", Converter::String),
    field("device_oui", Converter::String),
    field("device_serial", Converter::String),
    field("device_class", Converter::String),
];

/// SSID records, renamed from the status document's element names.
pub const SSID_SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        source: "ssid_ssid",
        target: "ssid",
        converter: Converter::String,
    },
    FieldSpec {
        source: "ssid_ssidEnable",
        target: "enabled",
        converter: Converter::Boolean,
    },
    FieldSpec {
        source: "ssid_security",
        target: "security",
        converter: Converter::Integer,
    },
    FieldSpec {
        source: "ssid_wpaPassword",
        target: "password",
        converter: Converter::String,
    },
    FieldSpec {
        source: "ssid_broadcast",
        target: "broadcast",
        converter: Converter::Boolean,
    },
];

// ── Cleaner ─────────────────────────────────────────────────────────

/// Typed output of one converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// A raw record after schema conversion, keyed by target field name in
/// schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CleanRecord(IndexMap<String, FieldValue>);

impl CleanRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field) {
            Some(FieldValue::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn flag(&self, field: &str) -> bool {
        matches!(self.get(field), Some(FieldValue::Bool(true)))
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.get(field) {
            Some(FieldValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn timestamp(&self, field: &str) -> Option<Timestamp> {
        match self.get(field) {
            Some(FieldValue::DateTime(dt)) => Some(Timestamp::Parsed(*dt)),
            Some(FieldValue::Text(text)) => Some(Timestamp::Raw(text.clone())),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A raw record that does not fit its schema.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("record {index} has no `{field}` field")]
    MissingField { index: usize, field: String },

    #[error("record {index}: `{field}` is not an integer ({value:?})")]
    InvalidInteger {
        index: usize,
        field: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Apply `schema` to every record. Fails on the first missing source field
/// or unconvertible value.
pub fn clean(schema: &[FieldSpec], records: &[RawRecord]) -> Result<Vec<CleanRecord>, CleanError> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| clean_record(schema, index, raw))
        .collect()
}

fn clean_record(
    schema: &[FieldSpec],
    index: usize,
    raw: &RawRecord,
) -> Result<CleanRecord, CleanError> {
    schema
        .iter()
        .map(|spec| {
            let value = raw.get(spec.source).ok_or_else(|| CleanError::MissingField {
                index,
                field: spec.source.to_owned(),
            })?;
            let converted = spec.converter.apply(value).map_err(|source| {
                CleanError::InvalidInteger {
                    index,
                    field: spec.source.to_owned(),
                    value: value.clone(),
                    source,
                }
            })?;
            Ok((spec.target.to_owned(), converted))
        })
        .collect::<Result<IndexMap<_, _>, _>>()
        .map(CleanRecord)
}

// ── Typed records ───────────────────────────────────────────────────

fn device_from_clean(record: &CleanRecord) -> Option<Device> {
    Some(Device {
        mac: record.text("mac")?,
        hostname: record.text("hostname"),
        port: record.text("port"),
        ip: record.text("ip"),
        ipv6: record.text("ipv6"),
        ipv6_ll: record.text("ipv6_ll"),
        time_first_seen: record.timestamp("time_first_seen"),
        time_last_active: record.timestamp("time_last_active"),
        activity: record.flag("activity"),
        activity_ip: record.flag("activity_ip"),
        activity_ipv6: record.flag("activity_ipv6"),
        activity_ipv6_ll: record.flag("activity_ipv6_ll"),
        dhcp_option: record.text("dhcp_option"),
        name: record.text("name"),
        os: record.text("os"),
        device: record.text("device"),
        device_oui: record.text("device_oui"),
        device_serial: record.text("device_serial"),
        device_class: record.text("device_class"),
    })
}

fn ssid_from_clean(record: &CleanRecord) -> Option<Ssid> {
    Some(Ssid {
        ssid: record.text("ssid")?,
        enabled: record.flag("enabled"),
        security: record.integer("security"),
        password: record.text("password").map(SecretString::from),
        broadcast: record.flag("broadcast"),
    })
}

/// Clean raw device records. Records whose MAC is unknown are dropped.
pub fn clean_devices(records: &[RawRecord]) -> Result<Vec<Device>, CleanError> {
    let devices: Vec<Device> = clean(DEVICE_SCHEMA, records)?
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let device = device_from_clean(record);
            if device.is_none() {
                warn!(index, "dropping device record without a MAC address");
            }
            device
        })
        .collect();
    debug!(count = devices.len(), "cleaned device records");
    Ok(devices)
}

/// Clean raw SSID records. Positions without an SSID name are discarded.
pub fn clean_ssids(records: &[RawRecord]) -> Result<Vec<Ssid>, CleanError> {
    Ok(clean(SSID_SCHEMA, records)?
        .iter()
        .filter_map(ssid_from_clean)
        .collect())
}
