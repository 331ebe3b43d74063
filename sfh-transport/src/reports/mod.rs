//! Per-sensor report encoders
//!
//! Each sensor kind has a feature report (sensor properties) and an input
//! report (current sample). Layouts are packed little-endian and their sizes
//! are what the descriptor size resolver hands out.

mod accel;
mod als;
mod gyro;
mod magno;

pub use accel::{AccelEncoder, AccelFeatureReport, AccelInputReport};
pub use als::{AlsEncoder, AlsFeatureReport, AlsInputReport};
pub use gyro::{GyroEncoder, GyroFeatureReport, GyroInputReport};
pub use magno::{MagnoEncoder, MagnoFeatureReport, MagnoInputReport};

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::SfhError;
use crate::protocol::{defaults, usage, FW_MULTIPLIER};
use crate::types::{SensorKind, SensorSample};

/// Encodes the feature and input reports of one sensor kind
pub trait ReportEncoder: Send + Sync {
    /// Sensor kind this encoder serves
    fn kind(&self) -> SensorKind;

    /// Write the feature report into `buf`, returning the number of bytes written
    fn feature_report(&self, report_id: u8, buf: &mut [u8]) -> Result<usize, SfhError>;

    /// Write the input report for `sample` into `buf`, returning the number of bytes written
    fn input_report(
        &self,
        report_id: u8,
        sample: &SensorSample,
        buf: &mut [u8],
    ) -> Result<usize, SfhError>;
}

/// Properties shared by every feature report
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CommonFeature {
    pub report_id: u8,
    pub connection_type: u8,
    pub report_state: u8,
    pub power_state: u8,
    pub sensor_state: u8,
    pub report_interval: U32,
}

impl CommonFeature {
    pub fn new(report_id: u8) -> Self {
        Self {
            report_id,
            connection_type: usage::CONNECTION_TYPE_PC_INTEGRATED,
            report_state: usage::REPORTING_STATE_ALL_EVENTS,
            power_state: usage::POWER_STATE_D0_FULL_POWER,
            sensor_state: usage::SENSOR_STATE_READY,
            report_interval: U32::new(defaults::REPORT_INTERVAL_MS),
        }
    }
}

/// Header shared by every input report
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CommonInput {
    pub report_id: u8,
    pub sensor_state: u8,
    pub event_type: u8,
}

impl CommonInput {
    pub fn new(report_id: u8) -> Self {
        Self {
            report_id,
            sensor_state: usage::SENSOR_STATE_READY,
            event_type: usage::EVENT_DATA_UPDATED,
        }
    }
}

/// Scale a raw firmware word down to report units
#[inline]
pub(crate) fn scaled(sample: &SensorSample, idx: usize) -> i32 {
    sample.word(idx) / FW_MULTIPLIER
}

/// Copy a packed report into the caller's buffer
pub(crate) fn write_report<T: IntoBytes + Immutable>(
    report: &T,
    buf: &mut [u8],
) -> Result<usize, SfhError> {
    let bytes = report.as_bytes();
    let got = buf.len();
    let dst = buf.get_mut(..bytes.len()).ok_or(SfhError::BufferTooSmall {
        needed: bytes.len(),
        got,
    })?;
    dst.copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Size in bytes of a sensor's feature report
pub const fn feature_report_size(kind: SensorKind) -> usize {
    match kind {
        SensorKind::Accelerometer => std::mem::size_of::<AccelFeatureReport>(),
        SensorKind::Gyroscope => std::mem::size_of::<GyroFeatureReport>(),
        SensorKind::Magnetometer => std::mem::size_of::<MagnoFeatureReport>(),
        SensorKind::AmbientLight => std::mem::size_of::<AlsFeatureReport>(),
    }
}

/// Size in bytes of a sensor's input report
pub const fn input_report_size(kind: SensorKind) -> usize {
    match kind {
        SensorKind::Accelerometer => std::mem::size_of::<AccelInputReport>(),
        SensorKind::Gyroscope => std::mem::size_of::<GyroInputReport>(),
        SensorKind::Magnetometer => std::mem::size_of::<MagnoInputReport>(),
        SensorKind::AmbientLight => std::mem::size_of::<AlsInputReport>(),
    }
}

/// Get the encoder for a sensor kind
pub fn encoder_for(kind: SensorKind) -> &'static dyn ReportEncoder {
    match kind {
        SensorKind::Accelerometer => &AccelEncoder,
        SensorKind::Gyroscope => &GyroEncoder,
        SensorKind::Magnetometer => &MagnoEncoder,
        SensorKind::AmbientLight => &AlsEncoder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_layout_sizes() {
        assert_eq!(std::mem::size_of::<CommonFeature>(), 9);
        assert_eq!(std::mem::size_of::<CommonInput>(), 3);
    }

    #[test]
    fn test_report_sizes() {
        assert_eq!(input_report_size(SensorKind::Accelerometer), 16);
        assert_eq!(input_report_size(SensorKind::Gyroscope), 15);
        assert_eq!(input_report_size(SensorKind::Magnetometer), 19);
        assert_eq!(input_report_size(SensorKind::AmbientLight), 7);

        assert_eq!(feature_report_size(SensorKind::Accelerometer), 15);
        assert_eq!(feature_report_size(SensorKind::Gyroscope), 15);
        assert_eq!(feature_report_size(SensorKind::Magnetometer), 21);
        assert_eq!(feature_report_size(SensorKind::AmbientLight), 15);
    }

    #[test]
    fn test_encoder_dispatch() {
        for kind in SensorKind::ALL {
            assert_eq!(encoder_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_feature_common_properties() {
        let mut buf = [0u8; 32];
        let n = encoder_for(SensorKind::Gyroscope)
            .feature_report(5, &mut buf)
            .unwrap();
        assert_eq!(n, 15);
        assert_eq!(buf[0], 5); // report id
        assert_eq!(buf[1], usage::CONNECTION_TYPE_PC_INTEGRATED);
        assert_eq!(buf[2], usage::REPORTING_STATE_ALL_EVENTS);
        assert_eq!(buf[3], usage::POWER_STATE_D0_FULL_POWER);
        assert_eq!(buf[4], usage::SENSOR_STATE_READY);
        assert_eq!(
            u32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]),
            defaults::REPORT_INTERVAL_MS
        );
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut buf = [0u8; 4];
        let err = encoder_for(SensorKind::AmbientLight)
            .input_report(1, &SensorSample::default(), &mut buf)
            .unwrap_err();
        assert_eq!(err, SfhError::BufferTooSmall { needed: 7, got: 4 });
    }

    #[test]
    fn test_longer_buffer_only_partially_written() {
        let mut buf = [0xEEu8; 32];
        let n = encoder_for(SensorKind::AmbientLight)
            .input_report(1, &SensorSample::default(), &mut buf)
            .unwrap();
        assert_eq!(n, 7);
        assert!(buf[n..].iter().all(|&b| b == 0xEE));
    }
}
