//! Ambient light sensor reports

use zerocopy::byteorder::little_endian::{I16, I32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{scaled, write_report, CommonFeature, CommonInput, ReportEncoder};
use crate::error::SfhError;
use crate::protocol::defaults;
use crate::types::{SensorKind, SensorSample};

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AlsFeatureReport {
    pub common: CommonFeature,
    pub change_sensitivity: U16,
    pub sensitivity_max: I16,
    pub sensitivity_min: I16,
}

/// Illuminance in lux
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AlsInputReport {
    pub common: CommonInput,
    pub illuminance: I32,
}

pub struct AlsEncoder;

impl ReportEncoder for AlsEncoder {
    fn kind(&self) -> SensorKind {
        SensorKind::AmbientLight
    }

    fn feature_report(&self, report_id: u8, buf: &mut [u8]) -> Result<usize, SfhError> {
        let report = AlsFeatureReport {
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
        let report = AlsInputReport {
            common: CommonInput::new(report_id),
            illuminance: I32::new(scaled(sample, 0)),
        };
        write_report(&report, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illuminance() {
        let sample = SensorSample([350_000, 0, 0, 0]);
        let mut buf = [0u8; 7];
        let n = AlsEncoder.input_report(1, &sample, &mut buf).unwrap();
        assert_eq!(n, 7);
        assert_eq!(&buf[3..7], &350i32.to_le_bytes());
    }
}
