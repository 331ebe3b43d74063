//! Simulator configuration
//!
//! TOML file describing the simulated hub: where it lives on PCI, which
//! sensors it reports, what its shared memory holds, and which bus steps
//! should fail.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use sfh_transport::protocol::{mask, pci};
use sfh_transport::{PciDevice, SensorKind, SensorSample, SimulatedHub};

use crate::loopback::BusFaults;

/// Simulated PCI function and presence mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_pci_slot")]
    pub pci_slot: String,
    #[serde(default = "default_mmio_base")]
    pub mmio_base: u64,
    #[serde(default = "default_sensor_mask")]
    pub sensor_mask: u32,
    /// Fail every presence-mask read
    #[serde(default)]
    pub unavailable: bool,
}

fn default_pci_slot() -> String {
    "0000:04:00.7".to_string()
}
fn default_mmio_base() -> u64 {
    0xFE00_0000
}
fn default_sensor_mask() -> u32 {
    mask::ALL_KNOWN
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            pci_slot: default_pci_slot(),
            mmio_base: default_mmio_base(),
            sensor_mask: default_sensor_mask(),
            unavailable: false,
        }
    }
}

/// Shared-memory contents for one sensor, in firmware fixed-point units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    pub sensor: SensorKind,
    pub values: Vec<i32>,
}

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default = "default_samples")]
    pub samples: Vec<SampleConfig>,
    #[serde(default)]
    pub faults: BusFaults,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_samples() -> Vec<SampleConfig> {
    vec![
        SampleConfig {
            sensor: SensorKind::Accelerometer,
            values: vec![0, 0, 9_810_000],
        },
        SampleConfig {
            sensor: SensorKind::Gyroscope,
            values: vec![0, 0, 0],
        },
        SampleConfig {
            sensor: SensorKind::Magnetometer,
            values: vec![22_000, -5_000, 41_000],
        },
        SampleConfig {
            sensor: SensorKind::AmbientLight,
            values: vec![320_000],
        },
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            hub: HubConfig::default(),
            samples: default_samples(),
            faults: BusFaults::default(),
        }
    }
}

impl SimConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("amd-sfh")
            .join("sim.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for sample in &self.samples {
            if sample.values.len() > 4 {
                bail!(
                    "{}: at most 4 sample values, got {}",
                    sample.sensor,
                    sample.values.len()
                );
            }
        }
        Ok(())
    }

    /// PCI function of the simulated hub
    pub fn pci_device(&self) -> PciDevice {
        PciDevice {
            vendor_id: pci::VENDOR_ID,
            device_id: pci::DEVICE_ID_SFH,
            slot: self.hub.pci_slot.clone(),
            mmio_base: self.hub.mmio_base,
        }
    }

    /// Build the simulated hub with its shared memory filled in
    pub fn build_hub(&self) -> SimulatedHub {
        let hub = SimulatedHub::new(self.hub.sensor_mask);
        hub.set_unavailable(self.hub.unavailable);
        for sample in &self.samples {
            let mut words = [0u32; 4];
            for (word, value) in words.iter_mut().zip(&sample.values) {
                *word = *value as u32;
            }
            hub.set_sample(sample.sensor, SensorSample(words));
        }
        hub
    }
}
