//! In-memory sensor hub
//!
//! Stands in for the PCI transport when no hardware is present: the
//! simulator binary and the tests drive it directly.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::error::SfhError;
use crate::types::{SensorKind, SensorSample};
use crate::SensorHub;

/// Simulated hub with a fixed presence mask and writable shared memory
pub struct SimulatedHub {
    mask: u32,
    unavailable: AtomicBool,
    samples: RwLock<[Option<SensorSample>; SensorKind::COUNT]>,
    mask_reads: AtomicUsize,
}

impl SimulatedHub {
    pub fn new(mask: u32) -> Self {
        Self {
            mask,
            unavailable: AtomicBool::new(false),
            samples: RwLock::new([None; SensorKind::COUNT]),
            mask_reads: AtomicUsize::new(0),
        }
    }

    /// Make mask reads fail as if the hub stopped responding
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Write a sample into a sensor's shared-memory region
    pub fn set_sample(&self, kind: SensorKind, sample: SensorSample) {
        self.samples.write()[kind.index()] = Some(sample);
    }

    /// Number of presence-mask reads served so far
    pub fn mask_reads(&self) -> usize {
        self.mask_reads.load(Ordering::SeqCst)
    }
}

impl SensorHub for SimulatedHub {
    fn sensor_mask(&self) -> Result<u32, SfhError> {
        self.mask_reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SfhError::HardwareUnavailable(
                "simulated hub not responding".into(),
            ));
        }
        Ok(self.mask)
    }

    fn read_sample(&self, kind: SensorKind) -> Option<SensorSample> {
        self.samples.read()[kind.index()]
    }
}
