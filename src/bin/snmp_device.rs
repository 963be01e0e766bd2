//! snmp-device: Show system information and interfaces of an SNMP agent.

use snmp_device::Device;
use snmp_device::cli::args::{CommonArgs, OutputArgs, WatchArgs};
use snmp_device::cli::output::{DeviceReport, InterfaceRow, OutputContext, write_error};
use clap::Parser;
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// Poll an SNMP agent for system and interface information.
#[derive(Debug, Parser)]
#[command(name = "snmp-device", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    watch: WatchArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    args.output.init_tracing();

    let (config, interval) = match (args.common.device_config(), args.watch.interval()) {
        (Ok(config), Ok(interval)) => (config, interval),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut device = Device::new(config);
    let ctx = OutputContext::new(args.output.format);

    let snapshot = match device.connect().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let mut rows = interface_rows(&device, &args.output).await;
    if let Err(e) = ctx.write_report(&DeviceReport::new(&device, &snapshot, rows.clone())) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(interval) = interval else {
        device.disconnect();
        return ExitCode::SUCCESS;
    };

    if let Err(e) = device.set_auto_update(true, Some(interval)) {
        write_error(&e);
        return ExitCode::FAILURE;
    }

    let mut sampled = Instant::now();
    let mut refreshes = 0u32;
    while args.watch.count.is_none_or(|n| refreshes < n) {
        // Let the background refresh land before reading the snapshot.
        tokio::time::sleep(interval + Duration::from_millis(100)).await;
        refreshes += 1;

        let snapshot = device.snapshot();
        let mut current = interface_rows(&device, &args.output).await;
        let elapsed = sampled.elapsed();
        sampled = Instant::now();
        for row in &mut current {
            if let Some(previous) = rows.iter().find(|r| r.index == row.index) {
                row.set_rates(previous, elapsed);
            }
        }

        println!();
        if let Err(e) = ctx.write_report(&DeviceReport::new(&device, &snapshot, current.clone())) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        rows = current;
    }

    device.disconnect();
    ExitCode::SUCCESS
}

async fn interface_rows(device: &Device, output: &OutputArgs) -> Vec<InterfaceRow> {
    if output.no_interfaces {
        return Vec::new();
    }
    let mut rows = Vec::new();
    for index in device.indexes() {
        rows.push(InterfaceRow::fetch(device, index).await);
    }
    rows
}
