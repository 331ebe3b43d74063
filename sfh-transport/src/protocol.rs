//! Protocol constants for the AMD Sensor Fusion Hub

/// Sensor presence mask bits, one per sensor kind
pub mod mask {
    pub const ACCEL: u32 = 1 << 0;
    pub const GYRO: u32 = 1 << 1;
    pub const MAGNO: u32 = 1 << 2;
    pub const ALS: u32 = 1 << 3;

    /// All bits with a supported sensor kind behind them
    pub const ALL_KNOWN: u32 = ACCEL | GYRO | MAGNO | ALS;
}

/// PCI identification of the hub
pub mod pci {
    /// AMD vendor ID
    pub const VENDOR_ID: u16 = 0x1022;
    /// Sensor Fusion Hub (MP2) device ID
    pub const DEVICE_ID_SFH: u16 = 0x15E4;
}

/// Identity of the logical devices presented to the host
pub mod device {
    /// HID bus type (I2C)
    pub const BUS_I2C: u16 = 0x18;
    /// HID device group: sensor hub
    pub const GROUP_SENSOR_HUB: u16 = 0x0001;
    /// HID device type: other
    pub const TYPE_OTHER: u8 = 0;

    pub const VENDOR_ID: u32 = 0x03FE;
    pub const PRODUCT_ID: u32 = 0x0001;
    pub const VERSION: u32 = 0x0001;

    /// Physical location string reported for every logical device
    pub const PHYS: &str = "AMD Sensor Fusion Hub (PCIe)";

    /// Name used when a raw sensor index has no known kind
    pub const UNKNOWN_SENSOR_NAME: &str = "unknown sensor type";

    /// Size of the host's name field, including the terminating NUL
    pub const NAME_LEN: usize = 128;
    /// Size of the host's physical-location field, including the terminating NUL
    pub const PHYS_LEN: usize = 64;
}

/// HID sensor usage enumerations written into reports
pub mod usage {
    pub const CONNECTION_TYPE_PC_INTEGRATED: u8 = 0x01;
    pub const REPORTING_STATE_ALL_EVENTS: u8 = 0x02;
    pub const POWER_STATE_D0_FULL_POWER: u8 = 0x02;
    pub const SENSOR_STATE_READY: u8 = 0x02;
    pub const EVENT_DATA_UPDATED: u8 = 0x04;
}

/// Default feature report properties
pub mod defaults {
    /// Report interval in milliseconds
    pub const REPORT_INTERVAL_MS: u32 = 200;
    pub const SENSITIVITY: u16 = 0x7F;
    pub const MAX_VALUE: i16 = 0x80;
    pub const MIN_VALUE: i16 = 0x7F;
    /// Magnetometer accuracy reported with every sample (high)
    pub const MAGNO_ACCURACY: i32 = 3;
}

/// Fixed-point scale of the samples written by the hub firmware
pub const FW_MULTIPLIER: i32 = 1000;

/// Largest report the hub can hand to the host
pub const MAX_REPORT_SIZE: usize = 64;

/// Report ID used when polling input reports
pub const INPUT_REPORT_ID: u8 = 1;
