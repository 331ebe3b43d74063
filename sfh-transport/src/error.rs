//! Sensor hub error types

use thiserror::Error;

use crate::types::SensorKind;

/// Errors that can occur while discovering sensors or driving logical devices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SfhError {
    // Device creation
    #[error("Allocation failed: {0}")]
    AllocationFailed(&'static str),

    #[error("Unsupported sensor index {0}")]
    UnsupportedSensor(u8),

    #[error("Failed to register device: {0}")]
    RegistrationFailed(String),

    #[error("Report size {size} exceeds hardware maximum {max}")]
    ReportTooLarge { size: usize, max: usize },

    // Hardware side
    #[error("Sensor hub hardware unavailable: {0}")]
    HardwareUnavailable(String),

    #[error("Invalid shared context: {0}")]
    InvalidContext(String),

    #[error("No sample available for {0}")]
    NoSample(SensorKind),

    // Report requests
    #[error("Buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Unsupported request: {0}")]
    UnsupportedRequest(&'static str),

    // Lifecycle
    #[error("Sensor registry already initialized")]
    AlreadyInitialized,

    #[error("Failed to unregister device: {0}")]
    UnregisterFailed(String),
}
