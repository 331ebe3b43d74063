//! Descriptor size resolution
//!
//! Sizes come straight from the packed report layouts in `reports`, so
//! resolution is a pure table lookup. Callers size per-device buffers from
//! it once and keep that size for the device's lifetime.

use crate::error::SfhError;
use crate::reports::{feature_report_size, input_report_size};
use crate::types::{ReportCategory, SensorKind};

/// Resolves the byte length of a sensor's report
pub trait DescriptorSizeResolver: Send + Sync {
    fn resolve_size(&self, kind: SensorKind, category: ReportCategory) -> Result<usize, SfhError>;
}

/// Built-in resolver backed by the report layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSizeTable;

impl DescriptorSizeResolver for ReportSizeTable {
    fn resolve_size(&self, kind: SensorKind, category: ReportCategory) -> Result<usize, SfhError> {
        Ok(resolve_size(kind, category))
    }
}

/// Report size for a sensor kind and category
pub const fn resolve_size(kind: SensorKind, category: ReportCategory) -> usize {
    match category {
        ReportCategory::Input => input_report_size(kind),
        ReportCategory::Feature => feature_report_size(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MAX_REPORT_SIZE;

    #[test]
    fn test_gyro_input_size_is_stable() {
        let table = ReportSizeTable;
        let first = table
            .resolve_size(SensorKind::Gyroscope, ReportCategory::Input)
            .unwrap();
        assert_eq!(first, 15);
        for _ in 0..16 {
            assert_eq!(
                table.resolve_size(SensorKind::Gyroscope, ReportCategory::Input),
                Ok(first)
            );
        }
    }

    #[test]
    fn test_all_sizes_within_hardware_limit() {
        for kind in SensorKind::ALL {
            for category in [ReportCategory::Input, ReportCategory::Feature] {
                let size = resolve_size(kind, category);
                assert!(size > 0 && size <= MAX_REPORT_SIZE, "{kind} {category}: {size}");
            }
        }
    }

    #[test]
    fn test_table_matches_layouts() {
        let table = ReportSizeTable;
        assert_eq!(
            table.resolve_size(SensorKind::AmbientLight, ReportCategory::Input),
            Ok(7)
        );
        assert_eq!(
            table.resolve_size(SensorKind::Magnetometer, ReportCategory::Feature),
            Ok(21)
        );
    }
}
