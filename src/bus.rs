// Host device-bus seam
//
// The bus owns its side of every device record. We only keep the handle
// needed to ask for registration and destruction.

use std::fmt;

use sfh_transport::{SensorKind, SfhError};

use crate::identity::DeviceIdentity;

/// Opaque reference to a device record owned by the host bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusHandle(u64);

impl BusHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host device-bus operations used while creating and destroying logical devices
pub trait DeviceBus: Send + Sync {
    /// Allocate an unregistered device record
    ///
    /// Fails with `AllocationFailed`.
    fn allocate(&self, kind: SensorKind) -> Result<BusHandle, SfhError>;

    /// Allocate a zeroed report buffer of exactly `len` bytes for a record
    fn alloc_report_buffer(&self, _handle: BusHandle, len: usize) -> Result<Box<[u8]>, SfhError> {
        zeroed_buffer(len)
    }

    /// Attach the identity and make the device visible to the host
    ///
    /// Fails with `RegistrationFailed`.
    fn register(&self, handle: BusHandle, identity: &DeviceIdentity) -> Result<(), SfhError>;

    /// Unregister the device if it was registered, then release the record
    fn destroy(&self, handle: BusHandle) -> Result<(), SfhError>;
}

/// Fallibly allocate a zero-filled buffer
pub fn zeroed_buffer(len: usize) -> Result<Box<[u8]>, SfhError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SfhError::AllocationFailed("report buffer"))?;
    buf.resize(len, 0);
    Ok(buf.into_boxed_slice())
}
