//! CLI utilities for snmp-device.
//!
//! This module provides command-line argument parsing and output formatting
//! for the `snmp-device` driver.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
