//! Magnetometer reports

use zerocopy::byteorder::little_endian::{I16, I32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{scaled, write_report, CommonFeature, CommonInput, ReportEncoder};
use crate::error::SfhError;
use crate::protocol::defaults;
use crate::types::{SensorKind, SensorSample};

/// Heading and flux properties
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct MagnoFeatureReport {
    pub common: CommonFeature,
    pub heading_change_sensitivity: U16,
    pub heading_min: I16,
    pub heading_max: I16,
    pub flux_change_sensitivity: U16,
    pub flux_min: I16,
    pub flux_max: I16,
}

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct MagnoInputReport {
    pub common: CommonInput,
    pub x: I32,
    pub y: I32,
    pub z: I32,
    pub accuracy: I32,
}

pub struct MagnoEncoder;

impl ReportEncoder for MagnoEncoder {
    fn kind(&self) -> SensorKind {
        SensorKind::Magnetometer
    }

    fn feature_report(&self, report_id: u8, buf: &mut [u8]) -> Result<usize, SfhError> {
        let report = MagnoFeatureReport {
            common: CommonFeature::new(report_id),
            heading_change_sensitivity: U16::new(defaults::SENSITIVITY),
            heading_min: I16::new(defaults::MIN_VALUE),
            heading_max: I16::new(defaults::MAX_VALUE),
            flux_change_sensitivity: U16::new(defaults::SENSITIVITY),
            flux_min: I16::new(defaults::MIN_VALUE),
            flux_max: I16::new(defaults::MAX_VALUE),
        };
        write_report(&report, buf)
    }

    fn input_report(
        &self,
        report_id: u8,
        sample: &SensorSample,
        buf: &mut [u8],
    ) -> Result<usize, SfhError> {
        let report = MagnoInputReport {
            common: CommonInput::new(report_id),
            x: I32::new(scaled(sample, 0)),
            y: I32::new(scaled(sample, 1)),
            z: I32::new(scaled(sample, 2)),
            accuracy: I32::new(defaults::MAGNO_ACCURACY),
        };
        write_report(&report, buf)
    }
}
