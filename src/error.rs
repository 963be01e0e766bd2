//! Error types for snmp-device.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

use async_snmp::Oid;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error from the SNMP collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Configuration validation error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationErrorKind {
    /// Address is not a dotted-quad IPv4 address.
    InvalidAddress(String),
    /// Community string is empty or whitespace.
    EmptyCommunity,
    /// Port outside 1..=65535.
    PortOutOfRange(u32),
    /// Version other than 1 or 2.
    UnsupportedVersion(u8),
    /// Zero-length interval or timeout.
    ZeroDuration,
    /// Physical address delimiter other than `:`, `-` or `.`.
    InvalidDelimiter(char),
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(a) => write!(f, "'{}' is not a dotted-quad IPv4 address", a),
            Self::EmptyCommunity => write!(f, "community string is empty"),
            Self::PortOutOfRange(p) => write!(f, "port {} is out of range 1..=65535", p),
            Self::UnsupportedVersion(v) => write!(f, "unsupported SNMP version {}", v),
            Self::ZeroDuration => write!(f, "duration must be greater than zero"),
            Self::InvalidDelimiter(c) => write!(f, "invalid physical address delimiter '{}'", c),
        }
    }
}

/// Response decode error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Expected a numeric value.
    NotNumeric { found: String },
    /// Expected an octet string.
    NotOctetString { found: String },
    /// Numeric code has no entry in the lookup table.
    UnknownCode { table: &'static str, code: u64 },
    /// Index column value is not a positive interface index.
    InvalidIndex(u64),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotNumeric { found } => write!(f, "expected a numeric value, got {}", found),
            Self::NotOctetString { found } => {
                write!(f, "expected an octet string, got {}", found)
            }
            Self::UnknownCode { table, code } => write!(f, "unknown {} code {}", table, code),
            Self::InvalidIndex(i) => write!(f, "invalid interface index {}", i),
        }
    }
}

/// Failures the facade itself detects in an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum QueryErrorKind {
    /// Agent answered with an exception value instead of data.
    #[error("agent returned {0}")]
    Exception(&'static str),
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration value.
    #[error("invalid configuration: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Session could not be established, or the agent never answered.
    #[error("could not connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: BoxError,
    },

    /// Operation needs a session but the device is not connected.
    #[error("device is not connected")]
    NotConnected,

    /// A single get or walk request failed.
    #[error("query for {oid} failed: {source}")]
    Query {
        oid: Oid,
        #[source]
        source: BoxError,
    },

    /// Response could not be decoded as the expected type.
    #[error("could not decode {oid}: {kind}")]
    Decode { oid: Oid, kind: DecodeErrorKind },

    /// Port is not in the last populated interface index list.
    #[error("no interface with index {port}")]
    UnknownInterface { port: u32 },

    /// Auto-update requested outside a tokio runtime.
    #[error("auto-update requires a tokio runtime")]
    NoRuntime,
}

impl Error {
    /// Create a validation error.
    pub fn validation(kind: ValidationErrorKind) -> Self {
        Self::Validation { kind }
    }

    /// Create a connection error.
    pub fn connection(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Create a query error.
    pub fn query(oid: Oid, source: impl Into<BoxError>) -> Self {
        Self::Query {
            oid,
            source: source.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(oid: Oid, kind: DecodeErrorKind) -> Self {
        Self::Decode { oid, kind }
    }

    /// Get the OID this error refers to, if any.
    pub fn oid(&self) -> Option<&Oid> {
        match self {
            Self::Query { oid, .. } => Some(oid),
            Self::Decode { oid, .. } => Some(oid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::validation(ValidationErrorKind::PortOutOfRange(70000));
        assert_eq!(
            err.to_string(),
            "invalid configuration: port 70000 is out of range 1..=65535"
        );
    }

    #[test]
    fn test_decode_display_and_oid() {
        let oid = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3, 7]);
        let err = Error::decode(
            oid.clone(),
            DecodeErrorKind::UnknownCode {
                table: "ifType",
                code: 999,
            },
        );
        assert_eq!(err.oid(), Some(&oid));
        assert!(err.to_string().ends_with("unknown ifType code 999"));
    }

    #[test]
    fn test_query_source_is_kept() {
        let oid = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 5, 0]);
        let err = Error::query(oid, "timed out");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "timed out");
    }

    #[test]
    fn test_unknown_interface_has_no_oid() {
        let err = Error::UnknownInterface { port: 42 };
        assert!(err.oid().is_none());
        assert_eq!(err.to_string(), "no interface with index 42");
    }
}
