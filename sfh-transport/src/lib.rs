//! Hardware side of the AMD Sensor Fusion Hub
//!
//! This crate covers everything between the PCI-mapped hub and the logical
//! per-sensor devices:
//!
//! - Sensor kinds, presence mask and report categories
//! - The shared hardware context and presence detection
//! - Descriptor size resolution
//! - Per-sensor feature/input report encoders
//! - An in-memory hub for running without hardware

pub mod context;
pub mod descriptor;
pub mod error;
pub mod presence;
pub mod protocol;
pub mod reports;
pub mod sim;
pub mod types;

pub use context::{PciDevice, SharedContext};
pub use descriptor::{resolve_size, DescriptorSizeResolver, ReportSizeTable};
pub use error::SfhError;
pub use presence::read_presence_mask;
pub use reports::{encoder_for, ReportEncoder};
pub use sim::SimulatedHub;
pub use types::{PresenceMask, ReportCategory, SensorKind, SensorSample};

/// Low-level access to the hub - implemented by the PCI transport
///
/// Both calls are synchronous and bounded by a register or DMA read.
pub trait SensorHub: Send + Sync {
    /// Read the raw sensor presence bitmask
    fn sensor_mask(&self) -> Result<u32, SfhError>;

    /// Copy the latest sample out of a sensor's shared-memory region
    ///
    /// Returns `None` while the hub has not written any data for the sensor.
    fn read_sample(&self, kind: SensorKind) -> Option<SensorSample>;
}
