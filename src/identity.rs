// Logical device identity
//
// Every logical device carries the same vendor/product/version and location;
// only the name differs per sensor kind. Strings are bounded by the host's
// fixed-size fields and truncation never fails creation.

use std::fmt;

use sfh_transport::protocol::device;
use sfh_transport::SensorKind;

/// Non-fatal diagnostic raised while filling in a device identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityWarning {
    /// Sensor name did not fit the host's name field
    NameTruncated { field_len: usize, original_len: usize },
    /// Physical location did not fit the host's location field
    LocationTruncated { field_len: usize, original_len: usize },
}

impl fmt::Display for IdentityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTruncated {
                field_len,
                original_len,
            } => write!(
                f,
                "Could not set device name ({original_len} bytes, field holds {field_len})"
            ),
            Self::LocationTruncated {
                field_len,
                original_len,
            } => write!(
                f,
                "Could not set device location ({original_len} bytes, field holds {field_len})"
            ),
        }
    }
}

/// Identity presented to the host for one logical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub sensor: SensorKind,
    pub bus_type: u16,
    pub group: u16,
    pub device_type: u8,
    pub vendor: u32,
    pub product: u32,
    pub version: u32,
    pub name: String,
    pub phys: String,
}

impl DeviceIdentity {
    /// Build the identity for a sensor kind
    ///
    /// Returns the identity together with any truncation warnings.
    pub fn for_sensor(kind: SensorKind) -> (Self, Vec<IdentityWarning>) {
        Self::with_strings(kind, sensor_name(kind as u8), device::PHYS)
    }

    pub(crate) fn with_strings(
        kind: SensorKind,
        name: &str,
        phys: &str,
    ) -> (Self, Vec<IdentityWarning>) {
        let mut warnings = Vec::new();

        let (name_out, truncated) = bounded_copy(name, device::NAME_LEN);
        if truncated {
            warnings.push(IdentityWarning::NameTruncated {
                field_len: device::NAME_LEN,
                original_len: name.len(),
            });
        }

        let (phys_out, truncated) = bounded_copy(phys, device::PHYS_LEN);
        if truncated {
            warnings.push(IdentityWarning::LocationTruncated {
                field_len: device::PHYS_LEN,
                original_len: phys.len(),
            });
        }

        let identity = Self {
            sensor: kind,
            bus_type: device::BUS_I2C,
            group: device::GROUP_SENSOR_HUB,
            device_type: device::TYPE_OTHER,
            vendor: device::VENDOR_ID,
            product: device::PRODUCT_ID,
            version: device::VERSION,
            name: name_out,
            phys: phys_out,
        };
        (identity, warnings)
    }
}

/// Display name for a raw hardware sensor index
///
/// Indices without a known kind get a generic name instead of an error.
pub fn sensor_name(idx: u8) -> &'static str {
    SensorKind::from_index(idx).map_or(device::UNKNOWN_SENSOR_NAME, SensorKind::name)
}

/// Copy `src` into a NUL-terminated field of `field_len` bytes
///
/// Returns the stored string and whether it had to be cut. Cuts land on a
/// UTF-8 character boundary.
pub fn bounded_copy(src: &str, field_len: usize) -> (String, bool) {
    let cap = field_len.saturating_sub(1);
    if src.len() <= cap {
        return (src.to_owned(), false);
    }
    let mut end = cap;
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    (src[..end].to_owned(), true)
}
