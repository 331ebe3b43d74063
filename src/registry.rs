// Sensor registry
//
// Fixed array of slots, one per sensor kind, indexed by the kind's ordinal.
// Populated once from the presence mask; torn down by destroying every device.

use std::fmt;

use tracing::{debug, info, warn};

use sfh_transport::{PresenceMask, SensorKind, SfhError, SharedContext};

use crate::bus::DeviceBus;
use crate::device::LogicalDevice;
use crate::factory::DeviceFactory;
use crate::identity::sensor_name;

/// Contents of one registry slot
#[derive(Debug, Default)]
pub enum SensorSlot {
    /// Not visited by initialization yet
    #[default]
    Uninitialized,
    /// Sensor not present, failed to initialize, or torn down
    Absent,
    /// Registered logical device
    Device(LogicalDevice),
}

impl SensorSlot {
    pub fn is_absent(&self) -> bool {
        matches!(self, SensorSlot::Absent)
    }

    pub fn device(&self) -> Option<&LogicalDevice> {
        match self {
            SensorSlot::Device(dev) => Some(dev),
            _ => None,
        }
    }
}

/// Outcome of populating the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Mask the registry was populated from
    pub mask: PresenceMask,
    /// Kinds that ended up with a registered device
    pub created: Vec<SensorKind>,
    /// Present kinds whose device could not be created
    pub failed: Vec<(SensorKind, SfhError)>,
}

/// Outcome of tearing the registry down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Devices handed to the bus for destruction
    pub destroyed: usize,
    /// Devices the bus failed to unregister
    pub failures: Vec<(SensorKind, SfhError)>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One slot per supported sensor kind
pub struct SensorRegistry {
    slots: [SensorSlot; SensorKind::COUNT],
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| SensorSlot::Uninitialized),
        }
    }

    /// Fill every slot from the presence mask
    ///
    /// Kinds are visited in declaration order. The factory is only called for
    /// present kinds, and a failure leaves that slot absent without stopping
    /// the remaining kinds.
    pub fn populate(
        &mut self,
        ctx: &SharedContext,
        mask: PresenceMask,
        factory: &DeviceFactory,
    ) -> InitReport {
        let mut report = InitReport {
            mask,
            ..Default::default()
        };

        let unknown = mask.unknown_bits();
        for idx in (0..u32::BITS as u8).filter(|i| unknown & (1u32 << i) != 0) {
            debug!("Skipping {} at mask bit {}", sensor_name(idx), idx);
        }

        for kind in SensorKind::ALL {
            let slot = &mut self.slots[kind.index()];
            if !mask.contains(kind) {
                debug!("{} not present", kind);
                *slot = SensorSlot::Absent;
                continue;
            }

            match factory.create_device(ctx, kind) {
                Ok(dev) => {
                    *slot = SensorSlot::Device(dev);
                    report.created.push(kind);
                }
                Err(e) => {
                    warn!("{} unavailable: {}", kind, e);
                    *slot = SensorSlot::Absent;
                    report.failed.push((kind, e));
                }
            }
        }

        report
    }

    /// Destroy every registered device and mark all slots absent
    ///
    /// Continues past unregister failures. Slots already absent are skipped,
    /// so calling this twice is harmless.
    pub fn teardown(&mut self, bus: &dyn DeviceBus) -> TeardownReport {
        let mut report = TeardownReport::default();

        for slot in self.slots.iter_mut() {
            let SensorSlot::Device(dev) = std::mem::replace(slot, SensorSlot::Absent) else {
                continue;
            };
            report.destroyed += 1;
            match bus.destroy(dev.handle()) {
                Ok(()) => info!("Removed {} device {}", dev.kind(), dev.handle()),
                Err(e) => {
                    warn!("Failed to remove {} device {}: {}", dev.kind(), dev.handle(), e);
                    report.failures.push((dev.kind(), e));
                }
            }
        }

        report
    }

    pub fn slot(&self, kind: SensorKind) -> &SensorSlot {
        &self.slots[kind.index()]
    }

    pub fn device(&self, kind: SensorKind) -> Option<&LogicalDevice> {
        self.slot(kind).device()
    }

    /// Registered devices in slot order
    pub fn devices(&self) -> impl Iterator<Item = &LogicalDevice> {
        self.slots.iter().filter_map(SensorSlot::device)
    }

    /// True once every slot holds either a device or an absence marker
    pub fn is_ready(&self) -> bool {
        !self
            .slots
            .iter()
            .any(|s| matches!(s, SensorSlot::Uninitialized))
    }

    /// Mask of the kinds that currently have a device
    pub fn layout(&self) -> PresenceMask {
        let kinds: Vec<_> = self.devices().map(LogicalDevice::kind).collect();
        PresenceMask::from_kinds(&kinds)
    }
}

impl fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.slots.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sfh_transport::{PciDevice, SimulatedHub};

    use crate::loopback::{BusFaults, LoopbackBus};

    fn context() -> SharedContext {
        SharedContext::new(
            PciDevice {
                vendor_id: 0x1022,
                device_id: 0x15E4,
                slot: "0000:04:00.7".into(),
                mmio_base: 0xFE00_0000,
            },
            Arc::new(SimulatedHub::new(0)),
        )
    }

    #[test]
    fn test_new_registry_not_ready() {
        let reg = SensorRegistry::new();
        assert!(!reg.is_ready());
        assert!(reg.devices().next().is_none());
    }

    #[test]
    fn test_populate_partial_mask() {
        let bus = Arc::new(LoopbackBus::new());
        let factory = DeviceFactory::with_default_sizes(bus.clone());
        let mut reg = SensorRegistry::new();

        let report = reg.populate(&context(), PresenceMask::from_bits(0b0110), &factory);
        assert!(reg.is_ready());
        assert_eq!(
            report.created,
            vec![SensorKind::Gyroscope, SensorKind::Magnetometer]
        );
        assert!(report.failed.is_empty());
        assert!(reg.slot(SensorKind::Accelerometer).is_absent());
        assert!(reg.slot(SensorKind::AmbientLight).is_absent());
        assert_eq!(reg.layout(), PresenceMask::from_bits(0b0110));
        // only present kinds reach the bus
        assert_eq!(bus.stats().allocated, 2);
    }

    #[test]
    fn test_unknown_bits_never_reach_bus() {
        let bus = Arc::new(LoopbackBus::new());
        let factory = DeviceFactory::with_default_sizes(bus.clone());
        let mut reg = SensorRegistry::new();

        let report = reg.populate(&context(), PresenceMask::from_bits(0xFFFF_FFF0), &factory);
        assert!(reg.is_ready());
        assert!(report.created.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(bus.stats().allocated, 0);

        reg.teardown(&*bus);
        let report = reg.populate(&context(), PresenceMask::from_bits(u32::MAX), &factory);
        assert_eq!(report.created.len(), SensorKind::COUNT);
        assert_eq!(reg.teardown(&*bus).destroyed, SensorKind::COUNT);
        assert_eq!(bus.outstanding(), 0);
    }

    #[test]
    fn test_teardown_continues_past_failures() {
        let bus = Arc::new(LoopbackBus::with_faults(BusFaults {
            destroy: vec![SensorKind::Accelerometer],
            ..Default::default()
        }));
        let factory = DeviceFactory::with_default_sizes(bus.clone());
        let mut reg = SensorRegistry::new();
        reg.populate(&context(), PresenceMask::from_bits(0b1111), &factory);

        let report = reg.teardown(&*bus);
        assert_eq!(report.destroyed, 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, SensorKind::Accelerometer);
        assert!(SensorKind::ALL.iter().all(|k| reg.slot(*k).is_absent()));
        assert_eq!(bus.stats().destroyed, 3);
    }

    #[test]
    fn test_teardown_of_unpopulated_registry() {
        let bus = LoopbackBus::new();
        let mut reg = SensorRegistry::new();
        let report = reg.teardown(&bus);
        assert_eq!(report, TeardownReport::default());
        assert!(reg.is_ready());
        assert_eq!(bus.stats().destroy_calls, 0);
    }
}
