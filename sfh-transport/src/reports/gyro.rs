//! Gyroscope reports

use zerocopy::byteorder::little_endian::{I16, I32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{scaled, write_report, CommonFeature, CommonInput, ReportEncoder};
use crate::error::SfhError;
use crate::protocol::defaults;
use crate::types::{SensorKind, SensorSample};

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct GyroFeatureReport {
    pub common: CommonFeature,
    pub change_sensitivity: U16,
    pub sensitivity_max: I16,
    pub sensitivity_min: I16,
}

/// Angular velocity per axis
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct GyroInputReport {
    pub common: CommonInput,
    pub x: I32,
    pub y: I32,
    pub z: I32,
}

pub struct GyroEncoder;

impl ReportEncoder for GyroEncoder {
    fn kind(&self) -> SensorKind {
        SensorKind::Gyroscope
    }

    fn feature_report(&self, report_id: u8, buf: &mut [u8]) -> Result<usize, SfhError> {
        let report = GyroFeatureReport {
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
        let report = GyroInputReport {
            common: CommonInput::new(report_id),
            x: I32::new(scaled(sample, 0)),
            y: I32::new(scaled(sample, 1)),
            z: I32::new(scaled(sample, 2)),
        };
        write_report(&report, buf)
    }
}
