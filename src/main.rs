//! AMD Sensor Fusion Hub simulator
//!
//! Runs the sensor registry against a simulated hub and loopback bus, then
//! prints the resulting devices and their input reports.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use amd_sfh::{
    DeviceFactory, LoopbackBus, ReportCategory, RequestType, SensorKind, SensorSlot,
    SfhClient, SharedContext, SimConfig,
};

#[derive(Parser)]
#[command(name = "sfh-sim")]
#[command(about = "Expose simulated AMD Sensor Fusion Hub sensors as logical devices")]
struct Cli {
    /// Config file path (default: ~/.config/amd-sfh/sim.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the sensor presence mask (e.g. 0x9)
    #[arg(long, value_parser = parse_mask)]
    mask: Option<u32>,

    /// Input report polls per device
    #[arg(long, default_value_t = 1)]
    polls: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_mask(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid mask '{s}': {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(SimConfig::default_path);
    let mut config = SimConfig::load(&config_path)?;
    if let Some(mask) = cli.mask {
        config.hub.sensor_mask = mask;
    }

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Using config {:?}", config_path);

    let ctx = SharedContext::new(config.pci_device(), Arc::new(config.build_hub()));
    let bus = Arc::new(LoopbackBus::with_faults(config.faults.clone()));
    let mut client = SfhClient::new(DeviceFactory::with_default_sizes(bus.clone()));

    let report = client.init(ctx)?;
    println!(
        "Hub {} mask {}: {} device(s) created",
        config.hub.pci_slot,
        report.mask,
        report.created.len()
    );
    for (kind, err) in &report.failed {
        println!("  {kind}: failed ({err})");
    }

    print_registry(&client);

    for round in 0..cli.polls {
        for dev in client.registry().devices() {
            match dev.poll() {
                Ok(bytes) => println!("  [{round}] {:<22} {}", dev.kind(), hex(&bytes)),
                Err(e) => warn!("{}: poll failed: {}", dev.kind(), e),
            }
        }
    }

    let teardown = client.deinit();
    println!(
        "Removed {} device(s), {} failure(s), {} record(s) still on bus",
        teardown.destroyed,
        teardown.failures.len(),
        bus.outstanding()
    );
    Ok(())
}

fn print_registry(client: &SfhClient) {
    for kind in SensorKind::ALL {
        match client.registry().slot(kind) {
            SensorSlot::Device(dev) => {
                let mut feature = [0u8; sfh_transport::protocol::MAX_REPORT_SIZE];
                let feature_len = match dev.raw_request(
                    1,
                    ReportCategory::Feature,
                    RequestType::GetReport,
                    &mut feature,
                ) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("{}: feature report failed: {}", kind, e);
                        0
                    }
                };
                println!(
                    "  slot {}: {:<22} device {} \"{}\" input {}B feature {}B",
                    kind.index(),
                    kind,
                    dev.handle(),
                    dev.identity().name,
                    dev.report_size(),
                    feature_len
                );
                for warning in dev.warnings() {
                    println!("      warning: {warning}");
                }
            }
            SensorSlot::Absent => println!("  slot {}: {:<22} absent", kind.index(), kind),
            SensorSlot::Uninitialized => {
                println!("  slot {}: {:<22} uninitialized", kind.index(), kind)
            }
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
