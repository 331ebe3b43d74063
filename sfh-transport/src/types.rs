//! Common types shared by the hub and the logical devices

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::mask;

/// Physical sensor kinds exposed by the hub
///
/// The discriminant doubles as the slot index in the sensor registry and as
/// the bit position in the presence mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SensorKind {
    Accelerometer = 0,
    Gyroscope = 1,
    Magnetometer = 2,
    AmbientLight = 3,
}

impl SensorKind {
    /// Number of supported sensor kinds
    pub const COUNT: usize = 4;

    /// All sensor kinds in initialization order
    pub const ALL: [SensorKind; Self::COUNT] = [
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Magnetometer,
        SensorKind::AmbientLight,
    ];

    /// Slot index of this kind
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a kind by its raw hardware index
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(SensorKind::Accelerometer),
            1 => Some(SensorKind::Gyroscope),
            2 => Some(SensorKind::Magnetometer),
            3 => Some(SensorKind::AmbientLight),
            _ => None,
        }
    }

    /// Presence mask bit for this kind
    pub const fn mask_bit(self) -> u32 {
        match self {
            SensorKind::Accelerometer => mask::ACCEL,
            SensorKind::Gyroscope => mask::GYRO,
            SensorKind::Magnetometer => mask::MAGNO,
            SensorKind::AmbientLight => mask::ALS,
        }
    }

    /// Human-readable sensor name, used as the logical device name
    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::AmbientLight => "ambient light sensor",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Report category requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportCategory {
    /// Periodic sample data
    Input,
    /// Sensor properties (interval, sensitivity, power state)
    Feature,
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCategory::Input => f.write_str("input"),
            ReportCategory::Feature => f.write_str("feature"),
        }
    }
}

/// Sensor presence bit-set as read from the hub
///
/// Bits outside the supported kinds are preserved in `raw()` but never
/// reported as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresenceMask(u32);

impl PresenceMask {
    /// Mask with no sensors present
    pub const EMPTY: PresenceMask = PresenceMask(0);

    /// Wrap a raw hardware mask
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Build a mask from a set of kinds
    pub fn from_kinds(kinds: &[SensorKind]) -> Self {
        Self(kinds.iter().fold(0, |acc, k| acc | k.mask_bit()))
    }

    /// Raw mask value, including unknown bits
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Bits that do not correspond to any supported sensor kind
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !mask::ALL_KNOWN
    }

    /// Check whether a kind is present
    #[inline]
    pub const fn contains(self, kind: SensorKind) -> bool {
        self.0 & kind.mask_bit() != 0
    }

    /// Present kinds, in initialization order
    pub fn kinds(self) -> impl Iterator<Item = SensorKind> {
        SensorKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Number of supported kinds present
    pub fn count(self) -> usize {
        (self.0 & mask::ALL_KNOWN).count_ones() as usize
    }
}

impl fmt::Display for PresenceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Raw sample words copied out of a sensor's shared-memory region
///
/// Values are fixed-point, scaled by `protocol::FW_MULTIPLIER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorSample(pub [u32; 4]);

impl SensorSample {
    /// Signed word at `idx`, reinterpreting the firmware's two's complement value
    #[inline]
    pub fn word(&self, idx: usize) -> i32 {
        self.0[idx] as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_matches_index() {
        for (i, kind) in SensorKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(SensorKind::from_index(i as u8), Some(*kind));
        }
        assert_eq!(SensorKind::from_index(4), None);
        assert_eq!(SensorKind::from_index(19), None);
    }

    #[test]
    fn test_mask_bits() {
        assert_eq!(SensorKind::Accelerometer.mask_bit(), 1 << 0);
        assert_eq!(SensorKind::Gyroscope.mask_bit(), 1 << 1);
        assert_eq!(SensorKind::Magnetometer.mask_bit(), 1 << 2);
        assert_eq!(SensorKind::AmbientLight.mask_bit(), 1 << 3);
    }

    #[test]
    fn test_presence_mask_kinds() {
        let mask = PresenceMask::from_bits(0b1001);
        let kinds: Vec<_> = mask.kinds().collect();
        assert_eq!(
            kinds,
            vec![SensorKind::Accelerometer, SensorKind::AmbientLight]
        );
        assert_eq!(mask.count(), 2);
        assert!(!mask.contains(SensorKind::Gyroscope));
    }

    #[test]
    fn test_presence_mask_unknown_bits() {
        let mask = PresenceMask::from_bits(0x0008_0002);
        assert_eq!(mask.unknown_bits(), 0x0008_0000);
        assert_eq!(mask.count(), 1);
        assert_eq!(mask.kinds().collect::<Vec<_>>(), vec![SensorKind::Gyroscope]);
    }

    #[test]
    fn test_from_kinds() {
        let mask = PresenceMask::from_kinds(&[SensorKind::Magnetometer, SensorKind::Gyroscope]);
        assert_eq!(mask.raw(), 0b0110);
    }

    #[test]
    fn test_sample_word_sign() {
        let sample = SensorSample([(-9810i32) as u32, 0, 0, 0]);
        assert_eq!(sample.word(0), -9810);
    }

    #[test]
    fn test_kind_display_honours_width() {
        assert_eq!(format!("{:<15}|", SensorKind::Gyroscope), "gyroscope      |");
        assert_eq!(format!("{:>14}", SensorKind::Accelerometer), " accelerometer");
        assert_eq!(SensorKind::AmbientLight.to_string(), "ambient light sensor");
    }
}
