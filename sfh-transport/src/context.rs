//! Shared hardware context
//!
//! One context per physical hub. Every logical device holds a clone; none of
//! them mutate it.

use std::fmt;
use std::sync::Arc;

use crate::error::SfhError;
use crate::types::{SensorKind, SensorSample};
use crate::SensorHub;

/// PCI function the hub is reached through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciDevice {
    pub vendor_id: u16,
    pub device_id: u16,
    /// Bus address, e.g. `0000:04:00.7`
    pub slot: String,
    /// Base address of the mapped command/shared-memory region
    pub mmio_base: u64,
}

/// Hardware/transport handle shared by all logical devices of one hub
#[derive(Clone)]
pub struct SharedContext {
    pci: Arc<PciDevice>,
    hub: Arc<dyn SensorHub>,
}

impl SharedContext {
    pub fn new(pci: PciDevice, hub: Arc<dyn SensorHub>) -> Self {
        Self {
            pci: Arc::new(pci),
            hub,
        }
    }

    /// Check the context describes a usable, mapped device
    pub fn validate(&self) -> Result<(), SfhError> {
        if self.pci.slot.is_empty() {
            return Err(SfhError::InvalidContext("missing PCI slot".into()));
        }
        if self.pci.mmio_base == 0 {
            return Err(SfhError::InvalidContext(format!(
                "{}: shared memory not mapped",
                self.pci.slot
            )));
        }
        Ok(())
    }

    pub fn pci(&self) -> &PciDevice {
        &self.pci
    }

    pub fn hub(&self) -> &Arc<dyn SensorHub> {
        &self.hub
    }

    /// Current sample for a sensor, if the hub has written one
    pub fn sample(&self, kind: SensorKind) -> Option<SensorSample> {
        self.hub.read_sample(kind)
    }
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedContext")
            .field("pci", &self.pci)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedHub;

    fn pci(slot: &str, mmio_base: u64) -> PciDevice {
        PciDevice {
            vendor_id: crate::protocol::pci::VENDOR_ID,
            device_id: crate::protocol::pci::DEVICE_ID_SFH,
            slot: slot.into(),
            mmio_base,
        }
    }

    #[test]
    fn test_valid_context() {
        let ctx = SharedContext::new(
            pci("0000:04:00.7", 0xFE00_0000),
            Arc::new(SimulatedHub::new(0)),
        );
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_unmapped_context_rejected() {
        let hub = Arc::new(SimulatedHub::new(0));
        let ctx = SharedContext::new(pci("0000:04:00.7", 0), hub.clone());
        assert!(matches!(ctx.validate(), Err(SfhError::InvalidContext(_))));

        let ctx = SharedContext::new(pci("", 0x1000), hub);
        assert!(matches!(ctx.validate(), Err(SfhError::InvalidContext(_))));
    }

    #[test]
    fn test_clones_share_hub() {
        let hub = Arc::new(SimulatedHub::new(0));
        let ctx = SharedContext::new(pci("0000:04:00.7", 0x1000), hub.clone());
        let other = ctx.clone();
        hub.set_sample(SensorKind::Gyroscope, SensorSample([1, 2, 3, 4]));
        assert_eq!(
            other.sample(SensorKind::Gyroscope),
            Some(SensorSample([1, 2, 3, 4]))
        );
    }
}
