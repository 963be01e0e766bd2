//! Response decoding.
//!
//! Turns the raw [`Value`] returned by the SNMP client into an
//! [`AttributeValue`] according to the attribute's [`ValueKind`].

use std::time::Duration;

use async_snmp::{Oid, Value};

use crate::error::{DecodeErrorKind, Error, Result, ValidationErrorKind};
use crate::oids::ValueKind;
use crate::tables::{IF_ADMIN_STATES, IF_OPER_STATES, IF_TYPES, LookupTable};

/// ifSpeed units per Mbit/s.
pub const SPEED_COEFFICIENT: u64 = 1_000_000;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Free-form text.
    Text(String),
    /// Unsigned integer.
    Integer(u64),
    /// Name from a lookup table.
    Label(&'static str),
    /// Elapsed time.
    Duration(Duration),
    /// Formatted hardware address (empty if the interface has none).
    PhysAddress(String),
    /// Interface speed in Mbit/s.
    Speed(u64),
}

impl AttributeValue {
    /// Integer payload, if this is an integer or speed.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(v) | Self::Speed(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is text, a label or an address.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::PhysAddress(s) => Some(s),
            Self::Label(s) => Some(s),
            _ => None,
        }
    }

    /// Duration payload.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) | Self::PhysAddress(s) => f.write_str(s),
            Self::Label(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Duration(d) => f.write_str(&format_duration(*d)),
            Self::Speed(v) => write!(f, "{} Mbit/s", v),
        }
    }
}

/// Separator placed between groups of a formatted hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MacDelimiter {
    /// `D4:CA:6D:68:E7:6E`
    #[default]
    Colon,
    /// `D4-CA-6D-68-E7-6E`
    Hyphen,
    /// `D4CA.6D68.E76E`
    Dot,
}

impl MacDelimiter {
    /// Delimiter character.
    pub const fn as_char(self) -> char {
        match self {
            Self::Colon => ':',
            Self::Hyphen => '-',
            Self::Dot => '.',
        }
    }

    /// Hex digits per group.
    pub const fn group_width(self) -> usize {
        match self {
            Self::Colon | Self::Hyphen => 2,
            Self::Dot => 4,
        }
    }
}

impl TryFrom<char> for MacDelimiter {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            ':' => Ok(Self::Colon),
            '-' => Ok(Self::Hyphen),
            '.' => Ok(Self::Dot),
            other => Err(Error::validation(ValidationErrorKind::InvalidDelimiter(
                other,
            ))),
        }
    }
}

/// Format raw address bytes as grouped uppercase hex.
///
/// ```
/// use snmp_device::{MacDelimiter, format_mac};
///
/// let mac = [0xD4, 0xCA, 0x6D, 0x68, 0xE7, 0x6E];
/// assert_eq!(format_mac(&mac, MacDelimiter::Colon), "D4:CA:6D:68:E7:6E");
/// assert_eq!(format_mac(&mac, MacDelimiter::Dot), "D4CA.6D68.E76E");
/// ```
pub fn format_mac(bytes: &[u8], delimiter: MacDelimiter) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    let width = delimiter.group_width();

    let mut out = String::with_capacity(hex.len() + hex.len() / width);
    for (i, c) in hex.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push(delimiter.as_char());
        }
        out.push(c);
    }
    out
}

/// Render a duration the way uptimes are usually shown: `3 days, 4:05:06.78`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    let hundredths = d.subsec_millis() / 10;

    let clock = if hundredths > 0 {
        format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, hundredths)
    } else {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Convert hundredths of a second to a duration.
pub fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::from_millis(ticks.saturating_mul(10))
}

/// Decode a value as described by `kind`.
pub fn decode(oid: &Oid, value: &Value, kind: ValueKind) -> Result<AttributeValue> {
    match kind {
        ValueKind::Text => Ok(AttributeValue::Text(decode_text(value))),
        ValueKind::Integer => decode_integer(oid, value).map(AttributeValue::Integer),
        ValueKind::TimeTicks => {
            decode_integer(oid, value).map(|t| AttributeValue::Duration(ticks_to_duration(t)))
        }
        ValueKind::InterfaceType => decode_label(oid, value, IF_TYPES).map(AttributeValue::Label),
        ValueKind::AdminStatus => {
            decode_label(oid, value, IF_ADMIN_STATES).map(AttributeValue::Label)
        }
        ValueKind::OperStatus => decode_label(oid, value, IF_OPER_STATES).map(AttributeValue::Label),
        ValueKind::PhysAddress => {
            decode_phys_address(oid, value, MacDelimiter::default()).map(AttributeValue::PhysAddress)
        }
        ValueKind::Speed => {
            decode_integer(oid, value).map(|bps| AttributeValue::Speed(bps / SPEED_COEFFICIENT))
        }
    }
}

/// Decode any scalar as text.
pub fn decode_text(value: &Value) -> String {
    match value {
        Value::OctetString(bytes) => String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => v.to_string(),
        Value::Counter64(v) => v.to_string(),
        Value::ObjectIdentifier(oid) => oid.to_string(),
        Value::IpAddress([a, b, c, d]) => format!("{}.{}.{}.{}", a, b, c, d),
        Value::Null => String::new(),
        other => describe(other),
    }
}

/// Decode a non-negative integer.
///
/// Octet strings are accepted only when they hold decimal digits and nothing else.
pub fn decode_integer(oid: &Oid, value: &Value) -> Result<u64> {
    let not_numeric = || {
        Error::decode(
            oid.clone(),
            DecodeErrorKind::NotNumeric {
                found: describe(value),
            },
        )
    };

    match value {
        Value::Integer(v) => u64::try_from(*v).map_err(|_| not_numeric()),
        Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Ok(u64::from(*v)),
        Value::Counter64(v) => Ok(*v),
        Value::OctetString(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| not_numeric())?.trim();
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(not_numeric());
            }
            text.parse().map_err(|_| not_numeric())
        }
        _ => Err(not_numeric()),
    }
}

/// Decode a numeric code through a lookup table.
pub fn decode_label(oid: &Oid, value: &Value, table: LookupTable) -> Result<&'static str> {
    let code = decode_integer(oid, value)?;
    table.lookup(code).ok_or_else(|| {
        Error::decode(
            oid.clone(),
            DecodeErrorKind::UnknownCode {
                table: table.name(),
                code,
            },
        )
    })
}

/// Decode a hardware address.
pub fn decode_phys_address(oid: &Oid, value: &Value, delimiter: MacDelimiter) -> Result<String> {
    match value {
        Value::OctetString(bytes) => Ok(format_mac(bytes, delimiter)),
        other => Err(Error::decode(
            oid.clone(),
            DecodeErrorKind::NotOctetString {
                found: describe(other),
            },
        )),
    }
}

/// Short description of a value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::OctetString(bytes) => format!("octet string \"{}\"", String::from_utf8_lossy(bytes)),
        Value::Integer(v) => format!("integer {}", v),
        Value::Null => "null".to_string(),
        Value::NoSuchObject => "noSuchObject".to_string(),
        Value::NoSuchInstance => "noSuchInstance".to_string(),
        Value::EndOfMibView => "endOfMibView".to_string(),
        other => format!("{:?}", other),
    }
}
