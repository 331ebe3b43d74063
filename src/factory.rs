// Logical device factory
//
// Creation runs allocate -> identity -> size -> buffer -> register. Every step
// can fail; a record that was allocated is destroyed again before the error
// is returned.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use sfh_transport::protocol::MAX_REPORT_SIZE;
use sfh_transport::{
    encoder_for, DescriptorSizeResolver, ReportCategory, ReportSizeTable, SensorKind, SfhError,
    SharedContext,
};

use crate::bus::{BusHandle, DeviceBus};
use crate::device::LogicalDevice;
use crate::identity::DeviceIdentity;

/// Builds and registers logical devices on a host bus
pub struct DeviceFactory {
    bus: Arc<dyn DeviceBus>,
    resolver: Arc<dyn DescriptorSizeResolver>,
}

impl DeviceFactory {
    pub fn new(bus: Arc<dyn DeviceBus>, resolver: Arc<dyn DescriptorSizeResolver>) -> Self {
        Self { bus, resolver }
    }

    /// Factory using the built-in report size table
    pub fn with_default_sizes(bus: Arc<dyn DeviceBus>) -> Self {
        Self::new(bus, Arc::new(ReportSizeTable))
    }

    pub fn bus(&self) -> &dyn DeviceBus {
        self.bus.as_ref()
    }

    /// Create and register the logical device for `kind`
    pub fn create_device(
        &self,
        ctx: &SharedContext,
        kind: SensorKind,
    ) -> Result<LogicalDevice, SfhError> {
        let handle = self.bus.allocate(kind).inspect_err(|e| {
            error!("Failed to allocate device for {}: {}", kind, e);
        })?;
        let record = PendingRecord::new(self.bus.as_ref(), handle);

        let (identity, warnings) = DeviceIdentity::for_sensor(kind);
        for warning in &warnings {
            warn!("{}: {}", kind, warning);
        }

        let report_size = self
            .resolver
            .resolve_size(kind, ReportCategory::Input)
            .map_err(|e| {
                error!("{}: failed to get input descriptor size: {}", kind, e);
                match e {
                    SfhError::UnsupportedSensor(_) => e,
                    _ => SfhError::UnsupportedSensor(kind as u8),
                }
            })?;
        if report_size > MAX_REPORT_SIZE {
            error!(
                "{}: input report of {} bytes exceeds hardware maximum",
                kind, report_size
            );
            return Err(SfhError::ReportTooLarge {
                size: report_size,
                max: MAX_REPORT_SIZE,
            });
        }

        let report_buf = self
            .bus
            .alloc_report_buffer(handle, report_size)
            .inspect_err(|_| {
                error!("{}: failed to allocate memory for report buffer", kind);
            })?;
        debug_assert_eq!(report_buf.len(), report_size);

        self.bus.register(handle, &identity).map_err(|e| {
            error!("{}: failed to add device: {}", kind, e);
            match e {
                SfhError::RegistrationFailed(_) => e,
                other => SfhError::RegistrationFailed(other.to_string()),
            }
        })?;
        let handle = record.commit();

        info!(
            "Registered {} as device {} ({} byte input reports)",
            kind, handle, report_size
        );
        Ok(LogicalDevice::new(
            ctx.clone(),
            identity,
            warnings,
            encoder_for(kind),
            report_buf,
            handle,
        ))
    }
}

/// Allocated bus record that is destroyed unless committed
struct PendingRecord<'a> {
    bus: &'a dyn DeviceBus,
    handle: BusHandle,
    armed: bool,
}

impl<'a> PendingRecord<'a> {
    fn new(bus: &'a dyn DeviceBus, handle: BusHandle) -> Self {
        Self {
            bus,
            handle,
            armed: true,
        }
    }

    fn commit(mut self) -> BusHandle {
        self.armed = false;
        self.handle
    }
}

impl Drop for PendingRecord<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("Releasing partially created device {}", self.handle);
        if let Err(e) = self.bus.destroy(self.handle) {
            warn!("Failed to release device {}: {}", self.handle, e);
        }
    }
}
