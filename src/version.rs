//! SNMP version enumeration.

/// SNMP protocol version supported by the device facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
}

impl Version {
    /// Get the user-facing version number (1 or 2).
    pub const fn as_number(self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2c => 2,
        }
    }

    /// Create from a user-facing version number.
    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Version::V1),
            2 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl From<Version> for async_snmp::Version {
    fn from(v: Version) -> Self {
        match v {
            Version::V1 => async_snmp::Version::V1,
            Version::V2c => async_snmp::Version::V2c,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
        }
    }
}
