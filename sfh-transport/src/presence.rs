//! Sensor presence detection

use tracing::debug;

use crate::context::SharedContext;
use crate::error::SfhError;
use crate::types::PresenceMask;

/// Read the sensor presence mask from the hub
///
/// Reads hardware once and does not retry. Any failure of the underlying
/// read is reported as `HardwareUnavailable`; what to do about it is the
/// caller's decision.
pub fn read_presence_mask(ctx: &SharedContext) -> Result<PresenceMask, SfhError> {
    let bits = ctx.hub().sensor_mask().map_err(|e| match e {
        SfhError::HardwareUnavailable(_) => e,
        other => SfhError::HardwareUnavailable(other.to_string()),
    })?;

    let mask = PresenceMask::from_bits(bits);
    if mask.unknown_bits() != 0 {
        debug!(
            "Ignoring unsupported sensor bits 0x{:08X} in mask {}",
            mask.unknown_bits(),
            mask
        );
    }
    debug!("Sensor presence mask {} ({} supported)", mask, mask.count());
    Ok(mask)
}
