//! Device connection configuration.
//!
//! [`DeviceConfig`] holds everything needed to open a session with an agent.
//! Construction never fails: each field is validated on its own and an invalid
//! value is replaced by its documented default, with a warning logged for each
//! substitution. The setters are stricter and keep the current value when
//! handed something invalid.
//!
//! | Field             | Default     |
//! |-------------------|-------------|
//! | `address`         | `127.0.0.1` |
//! | `community`       | `public`    |
//! | `port`            | `161`       |
//! | `version`         | SNMPv2c     |
//! | `timeout`         | 5 s         |
//! | `update_interval` | 60 s        |

use std::time::Duration;

use crate::error::{Error, Result, ValidationErrorKind};
use crate::version::Version;

/// Default agent address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
/// Default community string.
pub const DEFAULT_COMMUNITY: &str = "public";
/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default auto-update interval.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Check that a string is a dotted-quad IPv4 address.
///
/// Surrounding whitespace is ignored. Each of the four components must be
/// made of ASCII digits only and lie in `0..=255`.
///
/// ```
/// use snmp_device::is_valid_address;
///
/// assert!(is_valid_address("0.0.0.0"));
/// assert!(is_valid_address("255.255.255.255"));
/// assert!(!is_valid_address("192.168.0.256"));
/// assert!(!is_valid_address("10.0.0"));
/// ```
pub fn is_valid_address(address: &str) -> bool {
    let parts: Vec<&str> = address.trim().split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u32>().is_ok_and(|n| n <= 255)
        })
}

/// Check that a number is a usable UDP port (`1..=65535`).
pub fn is_valid_port(port: u32) -> bool {
    (1..=65535).contains(&port)
}

/// Connection parameters for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    address: String,
    community: String,
    port: u16,
    version: Version,
    timeout: Duration,
    update_interval: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            community: DEFAULT_COMMUNITY.to_string(),
            port: DEFAULT_PORT,
            version: Version::default(),
            timeout: DEFAULT_TIMEOUT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

impl DeviceConfig {
    /// Create a configuration, substituting defaults for invalid fields.
    ///
    /// Each substitution is logged at warn level. Use [`resolve`](Self::resolve)
    /// to also get the list of rejected values.
    pub fn new(address: &str, community: &str, port: u32, version: u8) -> Self {
        Self::resolve(address, community, port, version).0
    }

    /// Create a configuration and report every field that fell back to its default.
    pub fn resolve(
        address: &str,
        community: &str,
        port: u32,
        version: u8,
    ) -> (Self, Vec<ValidationErrorKind>) {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Err(kind) = check_address(address) {
            rejected.push(kind);
        } else {
            config.address = address.trim().to_string();
        }

        if let Err(kind) = check_community(community) {
            rejected.push(kind);
        } else {
            config.community = community.to_string();
        }

        match check_port(port) {
            Ok(port) => config.port = port,
            Err(kind) => rejected.push(kind),
        }

        match Version::from_number(version) {
            Some(v) => config.version = v,
            None => rejected.push(ValidationErrorKind::UnsupportedVersion(version)),
        }

        for kind in &rejected {
            tracing::warn!(target: "snmp_device::config", { reason = %kind }, "invalid setting replaced by default");
        }

        (config, rejected)
    }

    /// Set the request timeout.
    ///
    /// A zero timeout is ignored with a warning.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if let Err(e) = self.set_timeout(timeout) {
            tracing::warn!(target: "snmp_device::config", error = %e, "keeping previous timeout");
        }
        self
    }

    /// Set the auto-update interval.
    ///
    /// A zero interval is ignored with a warning.
    pub fn update_interval(mut self, interval: Duration) -> Self {
        if let Err(e) = self.set_update_interval(interval) {
            tracing::warn!(target: "snmp_device::config", error = %e, "keeping previous update interval");
        }
        self
    }

    /// Agent IPv4 address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Community string.
    pub fn community(&self) -> &str {
        &self.community
    }

    /// Agent UDP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// SNMP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }

    /// Auto-update interval.
    pub fn interval(&self) -> Duration {
        self.update_interval
    }

    /// `address:port` string handed to the SNMP client.
    pub fn target(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Change the address. Invalid input keeps the current address.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        check_address(address).map_err(reject)?;
        self.address = address.trim().to_string();
        Ok(())
    }

    /// Change the community. Empty input keeps the current community.
    pub fn set_community(&mut self, community: &str) -> Result<()> {
        check_community(community).map_err(reject)?;
        self.community = community.to_string();
        Ok(())
    }

    /// Change the port. Out-of-range input keeps the current port.
    pub fn set_port(&mut self, port: u32) -> Result<()> {
        self.port = check_port(port).map_err(reject)?;
        Ok(())
    }

    /// Change the version. Unsupported input keeps the current version.
    pub fn set_version(&mut self, version: u8) -> Result<()> {
        self.version = Version::from_number(version)
            .ok_or(ValidationErrorKind::UnsupportedVersion(version))
            .map_err(reject)?;
        Ok(())
    }

    /// Change the request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.timeout = check_duration(timeout).map_err(reject)?;
        Ok(())
    }

    /// Change the auto-update interval.
    pub fn set_update_interval(&mut self, interval: Duration) -> Result<()> {
        self.update_interval = check_duration(interval).map_err(reject)?;
        Ok(())
    }
}

fn reject(kind: ValidationErrorKind) -> Error {
    tracing::warn!(target: "snmp_device::config", { reason = %kind }, "setting rejected");
    Error::validation(kind)
}

fn check_address(address: &str) -> std::result::Result<(), ValidationErrorKind> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(ValidationErrorKind::InvalidAddress(address.to_string()))
    }
}

fn check_community(community: &str) -> std::result::Result<(), ValidationErrorKind> {
    if community.trim().is_empty() {
        Err(ValidationErrorKind::EmptyCommunity)
    } else {
        Ok(())
    }
}

fn check_port(port: u32) -> std::result::Result<u16, ValidationErrorKind> {
    if is_valid_port(port) {
        Ok(port as u16)
    } else {
        Err(ValidationErrorKind::PortOutOfRange(port))
    }
}

fn check_duration(d: Duration) -> std::result::Result<Duration, ValidationErrorKind> {
    if d.is_zero() {
        Err(ValidationErrorKind::ZeroDuration)
    } else {
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_address_examples() {
        assert!(is_valid_address("0.0.0.0"));
        assert!(is_valid_address("255.255.255.255"));
        assert!(is_valid_address("192.168.0.255"));
        assert!(is_valid_address(" 10.1.2.3 "));
        assert!(!is_valid_address("192.168.0.256"));
        assert!(!is_valid_address("1.2.3"));
        assert!(!is_valid_address("1.2.3.4.5"));
        assert!(!is_valid_address("1.2..4"));
        assert!(!is_valid_address("a.b.c.d"));
        assert!(!is_valid_address("-1.2.3.4"));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_port_bounds() {
        assert!(!is_valid_port(0));
        assert!(is_valid_port(1));
        assert!(is_valid_port(65535));
        assert!(!is_valid_port(65536));
    }

    #[test]
    fn test_new_keeps_valid_fields() {
        let config = DeviceConfig::new("192.168.10.206", "private", 1161, 1);
        assert_eq!(config.address(), "192.168.10.206");
        assert_eq!(config.community(), "private");
        assert_eq!(config.port(), 1161);
        assert_eq!(config.version(), Version::V1);
        assert_eq!(config.target(), "192.168.10.206:1161");
    }

    #[test]
    fn test_resolve_substitutes_each_field_independently() {
        let (config, rejected) = DeviceConfig::resolve("300.1.1.1", "  ", 0, 3);
        assert_eq!(config, DeviceConfig::default());
        assert_eq!(
            rejected,
            vec![
                ValidationErrorKind::InvalidAddress("300.1.1.1".into()),
                ValidationErrorKind::EmptyCommunity,
                ValidationErrorKind::PortOutOfRange(0),
                ValidationErrorKind::UnsupportedVersion(3),
            ]
        );

        let (config, rejected) = DeviceConfig::resolve("10.0.0.1", "", 161, 2);
        assert_eq!(config.address(), "10.0.0.1");
        assert_eq!(config.community(), DEFAULT_COMMUNITY);
        assert_eq!(rejected, vec![ValidationErrorKind::EmptyCommunity]);
    }

    #[test]
    fn test_setters_keep_current_value_on_error() {
        let mut config = DeviceConfig::new("10.0.0.1", "public", 161, 2);

        assert!(config.set_address("10.0.0.999").is_err());
        assert_eq!(config.address(), "10.0.0.1");
        config.set_address("10.0.0.2").unwrap();
        assert_eq!(config.address(), "10.0.0.2");

        assert!(config.set_port(70000).is_err());
        assert_eq!(config.port(), 161);
        config.set_port(10161).unwrap();
        assert_eq!(config.port(), 10161);
        assert_eq!(config.version(), Version::V2c);

        assert!(config.set_version(3).is_err());
        config.set_version(1).unwrap();
        assert_eq!(config.version(), Version::V1);

        assert!(config.set_community("").is_err());
        assert_eq!(config.community(), "public");
    }

    #[test]
    fn test_zero_durations_rejected() {
        let config = DeviceConfig::default()
            .timeout(Duration::ZERO)
            .update_interval(Duration::ZERO);
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.interval(), DEFAULT_UPDATE_INTERVAL);

        let config = DeviceConfig::default()
            .timeout(Duration::from_secs(2))
            .update_interval(Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.interval(), Duration::from_secs(10));
    }

    proptest! {
        #[test]
        fn prop_any_quad_in_range_is_valid(a in 0u32..=255, b in 0u32..=255, c in 0u32..=255, d in 0u32..=255) {
            let address = format!("{}.{}.{}.{}", a, b, c, d);
            prop_assert!(is_valid_address(&address));
        }

        #[test]
        fn prop_component_over_255_is_invalid(pos in 0usize..4, bad in 256u32..100_000) {
            let mut parts = vec!["10".to_string(); 4];
            parts[pos] = bad.to_string();
            prop_assert!(!is_valid_address(&parts.join(".")));
        }

        #[test]
        fn prop_wrong_component_count_is_invalid(parts in proptest::collection::vec(0u32..=255, 0..10)) {
            prop_assume!(parts.len() != 4);
            let address = parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".");
            prop_assert!(!is_valid_address(&address));
        }

        #[test]
        fn prop_port_range(port in 0u32..200_000) {
            prop_assert_eq!(is_valid_port(port), (1..=65535).contains(&port));
        }
    }
}
