// Loopback device bus
//
// In-process DeviceBus used by the simulator and the tests. It keeps every
// record it hands out so leaks and registrations can be inspected, and it can
// be told to fail individual steps per sensor kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sfh_transport::{SensorKind, SfhError};

use crate::bus::{zeroed_buffer, BusHandle, DeviceBus};
use crate::identity::DeviceIdentity;

/// Steps to fail, per sensor kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusFaults {
    /// Fail record allocation
    #[serde(default)]
    pub allocate: Vec<SensorKind>,
    /// Fail report buffer allocation
    #[serde(default)]
    pub buffer: Vec<SensorKind>,
    /// Reject registration
    #[serde(default)]
    pub register: Vec<SensorKind>,
    /// Fail unregistration (the record stays outstanding)
    #[serde(default)]
    pub destroy: Vec<SensorKind>,
}

/// Operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    pub allocated: usize,
    pub buffers: usize,
    pub registered: usize,
    pub destroyed: usize,
    pub destroy_calls: usize,
}

#[derive(Debug)]
struct Record {
    kind: SensorKind,
    identity: Option<DeviceIdentity>,
}

/// In-memory host bus
pub struct LoopbackBus {
    next_handle: AtomicU64,
    records: Mutex<HashMap<BusHandle, Record>>,
    stats: Mutex<BusStats>,
    faults: BusFaults,
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self::with_faults(BusFaults::default())
    }

    pub fn with_faults(faults: BusFaults) -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            records: Mutex::new(HashMap::new()),
            stats: Mutex::new(BusStats::default()),
            faults,
        }
    }

    /// Records allocated and not yet destroyed
    pub fn outstanding(&self) -> usize {
        self.records.lock().len()
    }

    /// Identities of currently registered devices, ordered by handle
    pub fn registered(&self) -> Vec<(BusHandle, DeviceIdentity)> {
        let mut out: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter_map(|(h, r)| r.identity.clone().map(|id| (*h, id)))
            .collect();
        out.sort_by_key(|(h, _)| *h);
        out
    }

    pub fn stats(&self) -> BusStats {
        *self.stats.lock()
    }

    fn kind_of(&self, handle: BusHandle) -> Result<SensorKind, SfhError> {
        self.records
            .lock()
            .get(&handle)
            .map(|r| r.kind)
            .ok_or_else(|| SfhError::RegistrationFailed(format!("unknown handle {handle}")))
    }
}

impl DeviceBus for LoopbackBus {
    fn allocate(&self, kind: SensorKind) -> Result<BusHandle, SfhError> {
        if self.faults.allocate.contains(&kind) {
            return Err(SfhError::AllocationFailed("device record"));
        }
        let handle = BusHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.records.lock().insert(
            handle,
            Record {
                kind,
                identity: None,
            },
        );
        self.stats.lock().allocated += 1;
        debug!("Allocated record {} for {}", handle, kind);
        Ok(handle)
    }

    fn alloc_report_buffer(&self, handle: BusHandle, len: usize) -> Result<Box<[u8]>, SfhError> {
        let kind = self
            .kind_of(handle)
            .map_err(|_| SfhError::AllocationFailed("report buffer"))?;
        if self.faults.buffer.contains(&kind) {
            return Err(SfhError::AllocationFailed("report buffer"));
        }
        let buf = zeroed_buffer(len)?;
        self.stats.lock().buffers += 1;
        Ok(buf)
    }

    fn register(&self, handle: BusHandle, identity: &DeviceIdentity) -> Result<(), SfhError> {
        if self.faults.register.contains(&identity.sensor) {
            return Err(SfhError::RegistrationFailed(format!(
                "bus rejected {}",
                identity.name
            )));
        }
        let mut records = self.records.lock();
        let record = records
            .get_mut(&handle)
            .ok_or_else(|| SfhError::RegistrationFailed(format!("unknown handle {handle}")))?;
        record.identity = Some(identity.clone());
        self.stats.lock().registered += 1;
        info!(
            "Added device {} \"{}\" ({:04X}:{:04X})",
            handle, identity.name, identity.vendor, identity.product
        );
        Ok(())
    }

    fn destroy(&self, handle: BusHandle) -> Result<(), SfhError> {
        self.stats.lock().destroy_calls += 1;
        let mut records = self.records.lock();
        let kind = records
            .get(&handle)
            .map(|r| r.kind)
            .ok_or_else(|| SfhError::UnregisterFailed(format!("unknown handle {handle}")))?;
        if self.faults.destroy.contains(&kind) {
            return Err(SfhError::UnregisterFailed(format!(
                "bus refused to remove {kind}"
            )));
        }
        records.remove(&handle);
        self.stats.lock().destroyed += 1;
        debug!("Destroyed record {} ({})", handle, kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_register_destroy() {
        let bus = LoopbackBus::new();
        let handle = bus.allocate(SensorKind::Gyroscope).unwrap();
        assert_eq!(bus.outstanding(), 1);
        assert!(bus.registered().is_empty());

        let (identity, _) = DeviceIdentity::for_sensor(SensorKind::Gyroscope);
        bus.register(handle, &identity).unwrap();
        assert_eq!(bus.registered(), vec![(handle, identity)]);

        bus.destroy(handle).unwrap();
        assert_eq!(bus.outstanding(), 0);
        assert_eq!(
            bus.stats(),
            BusStats {
                allocated: 1,
                buffers: 0,
                registered: 1,
                destroyed: 1,
                destroy_calls: 1,
            }
        );
    }

    #[test]
    fn test_faults_are_per_kind() {
        let bus = LoopbackBus::with_faults(BusFaults {
            register: vec![SensorKind::AmbientLight],
            ..Default::default()
        });
        let als = bus.allocate(SensorKind::AmbientLight).unwrap();
        let accel = bus.allocate(SensorKind::Accelerometer).unwrap();

        let (als_id, _) = DeviceIdentity::for_sensor(SensorKind::AmbientLight);
        let (accel_id, _) = DeviceIdentity::for_sensor(SensorKind::Accelerometer);
        assert!(matches!(
            bus.register(als, &als_id),
            Err(SfhError::RegistrationFailed(_))
        ));
        assert!(bus.register(accel, &accel_id).is_ok());
    }

    #[test]
    fn test_destroy_fault_keeps_record() {
        let bus = LoopbackBus::with_faults(BusFaults {
            destroy: vec![SensorKind::Magnetometer],
            ..Default::default()
        });
        let handle = bus.allocate(SensorKind::Magnetometer).unwrap();
        assert!(matches!(
            bus.destroy(handle),
            Err(SfhError::UnregisterFailed(_))
        ));
        assert_eq!(bus.outstanding(), 1);
    }

    #[test]
    fn test_faults_from_toml() {
        let faults: BusFaults = toml::from_str(
            r#"
            register = ["gyroscope"]
            buffer = ["ambient_light"]
            "#,
        )
        .unwrap();
        assert_eq!(faults.register, vec![SensorKind::Gyroscope]);
        assert_eq!(faults.buffer, vec![SensorKind::AmbientLight]);
        assert!(faults.allocate.is_empty());
    }
}
