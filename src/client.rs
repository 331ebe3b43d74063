// Sensor hub client
//
// Entry points for the owning driver: `init` on attach, `deinit` on detach.

use tracing::{info, warn};

use sfh_transport::{read_presence_mask, PresenceMask, SfhError, SharedContext};

use crate::factory::DeviceFactory;
use crate::registry::{InitReport, SensorRegistry, TeardownReport};

/// Lifecycle state of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No devices registered
    Detached,
    /// Registry populated; devices may be serving reports
    Ready,
}

/// Turns the sensors of one hub into logical devices
pub struct SfhClient {
    factory: DeviceFactory,
    registry: SensorRegistry,
    state: ClientState,
}

impl SfhClient {
    pub fn new(factory: DeviceFactory) -> Self {
        Self {
            factory,
            registry: SensorRegistry::new(),
            state: ClientState::Detached,
        }
    }

    /// Discover present sensors and register one logical device per sensor
    ///
    /// Only a malformed context fails the whole call. A presence read failure
    /// is treated as no sensors present, and per-sensor creation failures just
    /// leave that sensor absent.
    pub fn init(&mut self, ctx: SharedContext) -> Result<InitReport, SfhError> {
        if self.state == ClientState::Ready {
            return Err(SfhError::AlreadyInitialized);
        }
        ctx.validate()?;

        let mask = read_presence_mask(&ctx).unwrap_or_else(|e| {
            warn!("{}: {}; no sensors will be exposed", ctx.pci().slot, e);
            PresenceMask::EMPTY
        });

        let report = self.registry.populate(&ctx, mask, &self.factory);
        self.state = ClientState::Ready;
        info!(
            "{}: {} of {} present sensors initialized",
            ctx.pci().slot,
            report.created.len(),
            mask.count()
        );
        Ok(report)
    }

    /// Remove all logical devices
    ///
    /// Safe to call repeatedly; later calls find nothing to remove.
    pub fn deinit(&mut self) -> TeardownReport {
        let report = self.registry.teardown(self.factory.bus());
        self.state = ClientState::Detached;
        if !report.is_clean() {
            warn!(
                "{} of {} devices failed to unregister",
                report.failures.len(),
                report.destroyed
            );
        }
        report
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn state(&self) -> ClientState {
        self.state
    }
}

impl Drop for SfhClient {
    fn drop(&mut self) {
        if self.state == ClientState::Ready {
            self.deinit();
        }
    }
}
