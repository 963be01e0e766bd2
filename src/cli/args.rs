//! Command-line argument structures for the `snmp-device` driver.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::{DeviceConfig, Version};

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and interface table.
    #[default]
    Human,
    /// JSON output for scripting.
    Json,
}

/// Connection arguments.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Agent IPv4 address.
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Agent UDP port.
    #[arg(short = 'p', long = "port", default_value = "161")]
    pub port: u32,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "5")]
    pub timeout: f64,
}

impl CommonArgs {
    /// Build a device configuration, rejecting any invalid value.
    ///
    /// Unlike [`DeviceConfig::new`], nothing falls back to a default: a typo on
    /// the command line should not silently poll `127.0.0.1`.
    pub fn device_config(&self) -> Result<DeviceConfig, String> {
        let mut config = DeviceConfig::default();
        let version: Version = self.snmp_version.into();
        config.set_address(&self.address).map_err(|e| e.to_string())?;
        config
            .set_community(&self.community)
            .map_err(|e| e.to_string())?;
        config.set_port(self.port).map_err(|e| e.to_string())?;
        config
            .set_version(version.as_number())
            .map_err(|e| e.to_string())?;
        config
            .set_timeout(self.timeout_duration()?)
            .map_err(|e| e.to_string())?;
        Ok(config)
    }

    /// Get the timeout as a Duration.
    pub fn timeout_duration(&self) -> Result<Duration, String> {
        Duration::try_from_secs_f64(self.timeout)
            .map_err(|_| format!("invalid timeout '{}'", self.timeout))
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human or json.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Skip the per-interface table.
    #[arg(long = "no-interfaces")]
    pub no_interfaces: bool,

    /// Enable debug logging (snmp_device=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_device=trace, async_snmp=debug).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_device=trace,async_snmp=debug"
        } else if self.debug {
            "snmp_device=debug,async_snmp=warn"
        } else {
            "snmp_device=warn,async_snmp=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Periodic refresh arguments.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Re-poll every SECONDS and print again, with interface bit rates.
    #[arg(short = 'w', long = "watch", value_name = "SECONDS")]
    pub watch: Option<f64>,

    /// Stop after this many refreshes (default: run until interrupted).
    #[arg(short = 'n', long = "count", requires = "watch")]
    pub count: Option<u32>,
}

impl WatchArgs {
    /// Refresh interval, if watching.
    pub fn interval(&self) -> Result<Option<Duration>, String> {
        self.watch
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .ok()
                    .filter(|d| !d.is_zero())
                    .ok_or_else(|| format!("invalid watch interval '{}'", secs))
            })
            .transpose()
    }
}
