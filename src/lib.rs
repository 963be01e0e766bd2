// Error carries an OID inline for diagnostics.
#![allow(clippy::result_large_err)]

//! # snmp-device
//!
//! Typed, async access to the system and interface attributes of an
//! SNMP-managed network device.
//!
//! ## Features
//!
//! - SNMPv1 and v2c over UDP via [`async-snmp`](async_snmp)
//! - One-shot bulk population of device-wide attributes into a [`DeviceSnapshot`]
//! - On-demand queries for every IF-MIB ifTable column and the ifXTable
//!   multicast/broadcast counters
//! - Decoding of interface types, admin/oper states, uptimes, hardware
//!   addresses and link speeds
//! - Optional periodic refresh on a background tokio task
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_device::{Device, DeviceConfig, InterfaceAttribute};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> snmp_device::Result<()> {
//!     let device = Device::new(DeviceConfig::new("192.168.1.1", "public", 161, 2));
//!     let snapshot = device.connect().await?;
//!     println!("{} ({} interfaces)", snapshot.name(), snapshot.interface_count());
//!
//!     for port in snapshot.indexes() {
//!         let speed = device.interface_attribute(*port, InterfaceAttribute::Speed).await?;
//!         let mac = device.phys_address(*port, '-').await?;
//!         println!("{}: {} {}", port, speed, mac);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Auto-update
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use snmp_device::{Device, DeviceConfig};
//!
//! # async fn example() -> snmp_device::Result<()> {
//! let mut device = Device::new(DeviceConfig::default());
//! device.connect().await?;
//! device.set_auto_update(true, Some(Duration::from_secs(30)))?;
//! // device.snapshot() is refreshed every 30 seconds
//! device.set_auto_update(false, None)?;
//! # Ok(())
//! # }
//! ```

pub mod bandwidth;
pub mod config;
pub mod decode;
pub mod device;
pub mod error;
pub mod oids;
pub mod session;
pub mod tables;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use async_snmp::{Oid, Value, VarBind};
pub use bandwidth::{BitRate, RateUnit, octets_to_bits};
pub use config::{DeviceConfig, is_valid_address, is_valid_port};
pub use decode::{AttributeValue, MacDelimiter, format_duration, format_mac};
pub use device::{Device, DeviceSnapshot};
pub use error::{DecodeErrorKind, Error, QueryErrorKind, Result, ValidationErrorKind};
pub use oids::{InterfaceAttribute, SystemAttribute, ValueKind};
pub use session::{BoxFuture, Connector, SnmpSession, UdpConnector};
pub use tables::LookupTable;
pub use version::Version;
