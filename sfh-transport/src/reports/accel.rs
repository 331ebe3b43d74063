//! Accelerometer reports

use zerocopy::byteorder::little_endian::{I16, I32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{scaled, write_report, CommonFeature, CommonInput, ReportEncoder};
use crate::error::SfhError;
use crate::protocol::defaults;
use crate::types::{SensorKind, SensorSample};

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AccelFeatureReport {
    pub common: CommonFeature,
    pub change_sensitivity: U16,
    pub sensitivity_max: I16,
    pub sensitivity_min: I16,
}

/// Acceleration in report units per axis, plus the shake flag
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AccelInputReport {
    pub common: CommonInput,
    pub x: I32,
    pub y: I32,
    pub z: I32,
    pub shake_detected: u8,
}

pub struct AccelEncoder;

impl ReportEncoder for AccelEncoder {
    fn kind(&self) -> SensorKind {
        SensorKind::Accelerometer
    }

    fn feature_report(&self, report_id: u8, buf: &mut [u8]) -> Result<usize, SfhError> {
        let report = AccelFeatureReport {
            common: CommonFeature::new(report_id),
            change_sensitivity: U16::new(defaults::SENSITIVITY),
            sensitivity_max: I16::new(defaults::MAX_VALUE),
            sensitivity_min: I16::new(defaults::MIN_VALUE),
        };
        write_report(&report, buf)
    }

    fn input_report(
        &self,
        report_id: u8,
        sample: &SensorSample,
        buf: &mut [u8],
    ) -> Result<usize, SfhError> {
        let report = AccelInputReport {
            common: CommonInput::new(report_id),
            x: I32::new(scaled(sample, 0)),
            y: I32::new(scaled(sample, 1)),
            z: I32::new(scaled(sample, 2)),
            shake_detected: 0,
        };
        write_report(&report, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_values_scaled() {
        let sample = SensorSample([12_000, (-3_000i32) as u32, 9_810_000, 0]);
        let mut buf = [0u8; 16];
        let n = AccelEncoder.input_report(1, &sample, &mut buf).unwrap();
        assert_eq!(n, 16);

        let report = AccelInputReport::read_from_bytes(&buf[..n]).unwrap();
        assert_eq!(report.common.report_id, 1);
        assert_eq!(report.x.get(), 12);
        assert_eq!(report.y.get(), -3);
        assert_eq!(report.z.get(), 9_810);
        assert_eq!(report.shake_detected, 0);
    }

    #[test]
    fn test_feature_sensitivity_defaults() {
        let mut buf = [0u8; 15];
        AccelEncoder.feature_report(1, &mut buf).unwrap();
        let report = AccelFeatureReport::read_from_bytes(&buf).unwrap();
        assert_eq!(report.change_sensitivity.get(), defaults::SENSITIVITY);
        assert_eq!(report.sensitivity_max.get(), defaults::MAX_VALUE);
        assert_eq!(report.sensitivity_min.get(), defaults::MIN_VALUE);
    }
}
