// Logical per-sensor device
//
// One registered device per present sensor. Report requests from the host are
// routed to the encoder chosen for the sensor kind at creation time.

use parking_lot::Mutex;
use tracing::trace;

use sfh_transport::protocol::INPUT_REPORT_ID;
use sfh_transport::{ReportCategory, ReportEncoder, SensorKind, SfhError, SharedContext};

use crate::bus::BusHandle;
use crate::identity::{DeviceIdentity, IdentityWarning};

/// Host report request type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    GetReport,
    SetReport,
}

/// A sensor exposed to the host as its own device
pub struct LogicalDevice {
    kind: SensorKind,
    ctx: SharedContext,
    identity: DeviceIdentity,
    warnings: Vec<IdentityWarning>,
    encoder: &'static dyn ReportEncoder,
    /// Input report size resolved at creation; never changes
    report_size: usize,
    report_buf: Mutex<Box<[u8]>>,
    handle: BusHandle,
}

impl LogicalDevice {
    pub(crate) fn new(
        ctx: SharedContext,
        identity: DeviceIdentity,
        warnings: Vec<IdentityWarning>,
        encoder: &'static dyn ReportEncoder,
        report_buf: Box<[u8]>,
        handle: BusHandle,
    ) -> Self {
        Self {
            kind: identity.sensor,
            ctx,
            identity,
            warnings,
            encoder,
            report_size: report_buf.len(),
            report_buf: Mutex::new(report_buf),
            handle,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Non-fatal diagnostics raised while the device was created
    pub fn warnings(&self) -> &[IdentityWarning] {
        &self.warnings
    }

    /// Size of the input report buffer in bytes
    pub fn report_size(&self) -> usize {
        self.report_size
    }

    pub fn handle(&self) -> BusHandle {
        self.handle
    }

    pub fn context(&self) -> &SharedContext {
        &self.ctx
    }

    /// Serve a raw report request from the host
    ///
    /// GET_REPORT is answered by the sensor's encoder; SET_REPORT is not
    /// supported by the hub. Returns the number of bytes written into `buf`.
    pub fn raw_request(
        &self,
        report_id: u8,
        category: ReportCategory,
        request: RequestType,
        buf: &mut [u8],
    ) -> Result<usize, SfhError> {
        trace!(
            "{}: {:?} {} report {}",
            self.kind,
            request,
            category,
            report_id
        );
        match (request, category) {
            (RequestType::SetReport, _) => Err(SfhError::UnsupportedRequest("SET_REPORT")),
            (RequestType::GetReport, ReportCategory::Feature) => {
                self.encoder.feature_report(report_id, buf)
            }
            (RequestType::GetReport, ReportCategory::Input) => {
                let sample = self.ctx.sample(self.kind).ok_or(SfhError::NoSample(self.kind))?;
                self.encoder.input_report(report_id, &sample, buf)
            }
        }
    }

    /// Refresh the input report from shared memory
    ///
    /// Encodes into the device's own report buffer and returns the bytes that
    /// go to the host.
    pub fn poll(&self) -> Result<Vec<u8>, SfhError> {
        let sample = self.ctx.sample(self.kind).ok_or(SfhError::NoSample(self.kind))?;
        let mut buf = self.report_buf.lock();
        let n = self.encoder.input_report(INPUT_REPORT_ID, &sample, &mut buf)?;
        Ok(buf[..n].to_vec())
    }

    /// Length of the report buffer as currently allocated
    pub fn buffer_len(&self) -> usize {
        self.report_buf.lock().len()
    }
}

impl std::fmt::Debug for LogicalDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicalDevice")
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("report_size", &self.report_size)
            .field("name", &self.identity.name)
            .finish_non_exhaustive()
    }
}
