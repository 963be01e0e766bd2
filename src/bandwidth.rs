//! Bit-rate scaling for display.
//!
//! Octet counters are usually sampled twice and the delta turned into a rate.
//! These helpers turn such a rate into a human-readable figure with a binary
//! (1024-based) unit, rounded to one decimal place.

const KILO: u64 = 1024;
const MEGA: u64 = KILO * 1024;
const GIGA: u64 = MEGA * 1024;

/// Convert an octet count to bits.
pub const fn octets_to_bits(octets: u64) -> u64 {
    octets.saturating_mul(8)
}

/// Display unit for a bit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RateUnit {
    /// Below 1024 bits.
    Bits,
    /// 1024 bits and up.
    Kbits,
    /// 1024² bits and up.
    Mbits,
    /// 1024³ bits and up.
    Gbits,
}

impl RateUnit {
    /// Pick the unit for a bit count.
    pub const fn for_bits(bits: u64) -> Self {
        if bits >= GIGA {
            Self::Gbits
        } else if bits >= MEGA {
            Self::Mbits
        } else if bits >= KILO {
            Self::Kbits
        } else {
            Self::Bits
        }
    }

    /// Number of bits in one of this unit.
    pub const fn divisor(self) -> u64 {
        match self {
            Self::Bits => 1,
            Self::Kbits => KILO,
            Self::Mbits => MEGA,
            Self::Gbits => GIGA,
        }
    }

    /// Unit label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bits => "Bits/s",
            Self::Kbits => "Kbits/s",
            Self::Mbits => "Mbits/s",
            Self::Gbits => "Gbits/s",
        }
    }
}

impl std::fmt::Display for RateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bit rate scaled to its display unit.
///
/// ```
/// use snmp_device::BitRate;
///
/// assert_eq!(BitRate::from_bits(123_456_789).to_string(), "117.7 Mbits/s");
/// assert_eq!(BitRate::from_bits(500).to_string(), "500 Bits/s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitRate {
    bits: u64,
    unit: RateUnit,
}

impl BitRate {
    /// Scale a bit count.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits,
            unit: RateUnit::for_bits(bits),
        }
    }

    /// Scale an octet count.
    pub const fn from_octets(octets: u64) -> Self {
        Self::from_bits(octets_to_bits(octets))
    }

    /// Unscaled bit count.
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Selected unit.
    pub const fn unit(&self) -> RateUnit {
        self.unit
    }

    /// Value in the selected unit, rounded to one decimal place.
    ///
    /// Plain bit counts are returned unrounded.
    pub fn value(&self) -> f64 {
        match self.unit {
            RateUnit::Bits => self.bits as f64,
            unit => (self.bits as f64 / unit.divisor() as f64 * 10.0).round() / 10.0,
        }
    }
}

impl std::fmt::Display for BitRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            RateUnit::Bits => write!(f, "{} {}", self.bits, self.unit),
            unit => write!(f, "{:.1} {}", self.value(), unit),
        }
    }
}
