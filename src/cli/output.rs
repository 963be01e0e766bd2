//! Output formatting for the `snmp-device` driver.
//!
//! Supports a human-readable summary with an interface table, and JSON.

use crate::cli::args::OutputFormat;
use crate::{
    AttributeValue, BitRate, Device, DeviceSnapshot, InterfaceAttribute, format_duration,
};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

/// One row of the interface table.
///
/// Attributes the agent did not return are `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceRow {
    pub index: u32,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub if_type: Option<String>,
    pub mtu: Option<u64>,
    pub speed_mbps: Option<u64>,
    pub phys_address: Option<String>,
    pub admin_status: Option<String>,
    pub oper_status: Option<String>,
    pub in_octets: Option<u64>,
    pub out_octets: Option<u64>,
    pub in_errors: Option<u64>,
    pub out_errors: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_rate: Option<String>,
}

impl InterfaceRow {
    /// Query one interface.
    ///
    /// Failures are logged and leave the column empty.
    pub async fn fetch(device: &Device, index: u32) -> Self {
        let get = |attr: InterfaceAttribute| async move {
            match device.interface_attribute(index, attr).await {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(target: "snmp_device::cli", { index, attribute = %attr, error = %e }, "interface query failed");
                    None
                }
            }
        };
        let text = |v: Option<AttributeValue>| v.map(|v| v.to_string());
        let number = |v: Option<AttributeValue>| v.and_then(|v| v.as_u64());

        Self {
            index,
            description: text(get(InterfaceAttribute::Description).await),
            if_type: text(get(InterfaceAttribute::Type).await),
            mtu: number(get(InterfaceAttribute::Mtu).await),
            speed_mbps: number(get(InterfaceAttribute::Speed).await),
            phys_address: text(get(InterfaceAttribute::PhysAddress).await),
            admin_status: text(get(InterfaceAttribute::AdminStatus).await),
            oper_status: text(get(InterfaceAttribute::OperStatus).await),
            in_octets: number(get(InterfaceAttribute::InOctets).await),
            out_octets: number(get(InterfaceAttribute::OutOctets).await),
            in_errors: number(get(InterfaceAttribute::InErrors).await),
            out_errors: number(get(InterfaceAttribute::OutErrors).await),
            in_rate: None,
            out_rate: None,
        }
    }

    /// Fill in bit rates from the octet counters of an earlier sample.
    ///
    /// Counter wraps and resets produce no rate.
    pub fn set_rates(&mut self, previous: &InterfaceRow, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return;
        }
        let rate = |now: Option<u64>, before: Option<u64>| {
            let delta = now?.checked_sub(before?)?;
            Some(BitRate::from_octets((delta as f64 / secs) as u64).to_string())
        };
        self.in_rate = rate(self.in_octets, previous.in_octets);
        self.out_rate = rate(self.out_octets, previous.out_octets);
    }
}

/// Everything printed for one poll.
#[derive(Debug, Serialize)]
pub struct DeviceReport {
    pub target: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub contact: String,
    pub location: String,
    pub uptime: String,
    pub uptime_secs: f64,
    pub interface_count: u64,
    pub types: Vec<String>,
    pub failed_queries: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceRow>,
}

impl DeviceReport {
    /// Build a report from a snapshot and interface rows.
    pub fn new(device: &Device, snapshot: &DeviceSnapshot, interfaces: Vec<InterfaceRow>) -> Self {
        let config = device.config();
        Self {
            target: config.target(),
            version: config.version().to_string(),
            name: snapshot.name().to_string(),
            description: snapshot.description().to_string(),
            contact: snapshot.contact().to_string(),
            location: snapshot.location().to_string(),
            uptime: format_duration(snapshot.uptime()),
            uptime_secs: snapshot.uptime().as_secs_f64(),
            interface_count: snapshot.interface_count(),
            types: snapshot.types().iter().map(|t| t.to_string()).collect(),
            failed_queries: snapshot.failed(),
            interfaces,
        }
    }
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    /// Create a new output context.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write a report to stdout.
    pub fn write_report(&self, report: &DeviceReport) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout, report)
    }

    /// Write a report to any writer.
    pub fn write_to(&self, w: &mut impl Write, report: &DeviceReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => write_human(w, report),
            OutputFormat::Json => write_json(w, report),
        }
    }
}

fn write_human(w: &mut impl Write, report: &DeviceReport) -> io::Result<()> {
    writeln!(w, "{:<15}{}", "Name:", report.name)?;
    writeln!(w, "{:<15}{} ({})", "Target:", report.target, report.version)?;
    writeln!(w, "{:<15}{}", "Description:", report.description)?;
    writeln!(w, "{:<15}{}", "Contact:", report.contact)?;
    writeln!(w, "{:<15}{}", "Location:", report.location)?;
    writeln!(w, "{:<15}{}", "Uptime:", report.uptime)?;
    writeln!(w, "{:<15}{}", "Interfaces:", report.interface_count)?;
    writeln!(w, "{:<15}{}", "Types:", report.types.join(", "))?;
    if report.failed_queries > 0 {
        writeln!(w, "{:<15}{}", "Failed:", report.failed_queries)?;
    }

    if report.interfaces.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    writeln!(
        w,
        "{:>6}  {:<20} {:<16} {:>8} {:<17} {:<6} {:<6} {:>14} {:>14}",
        "Index", "Description", "Type", "Mbit/s", "Address", "Admin", "Oper", "In", "Out"
    )?;
    for row in &report.interfaces {
        let dash = || "-".to_string();
        let (inbound, outbound) = match (&row.in_rate, &row.out_rate) {
            (Some(i), Some(o)) => (i.clone(), o.clone()),
            _ => (
                row.in_octets.map_or_else(dash, |v| v.to_string()),
                row.out_octets.map_or_else(dash, |v| v.to_string()),
            ),
        };
        writeln!(
            w,
            "{:>6}  {:<20} {:<16} {:>8} {:<17} {:<6} {:<6} {:>14} {:>14}",
            row.index,
            truncate(row.description.as_deref().unwrap_or("-"), 20),
            truncate(row.if_type.as_deref().unwrap_or("-"), 16),
            row.speed_mbps.map_or_else(dash, |v| v.to_string()),
            row.phys_address
                .as_deref()
                .filter(|a| !a.is_empty())
                .unwrap_or("-"),
            row.admin_status.as_deref().unwrap_or("-"),
            row.oper_status.as_deref().unwrap_or("-"),
            inbound,
            outbound,
        )?;
    }
    Ok(())
}

fn write_json(w: &mut impl Write, report: &DeviceReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('~');
        out
    }
}

/// Write an error message to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}
