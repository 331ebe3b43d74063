//! Logical per-sensor devices for the AMD Sensor Fusion Hub
//!
//! The hub sits behind a single PCI function. This crate turns each sensor it
//! reports as present into an independent logical device on the host bus:
//!
//! - `client` - attach/detach entry points
//! - `registry` - one slot per sensor kind
//! - `factory` - creates and registers a single device
//! - `device` - routes report requests to the sensor's encoder
//! - `identity` - names and fixed identity of the devices
//! - `bus` - the host device-bus seam, with `loopback` as in-process bus

pub mod bus;
pub mod client;
pub mod config;
pub mod device;
pub mod factory;
pub mod identity;
pub mod loopback;
pub mod registry;

pub use bus::{BusHandle, DeviceBus};
pub use client::{ClientState, SfhClient};
pub use config::SimConfig;
pub use device::{LogicalDevice, RequestType};
pub use factory::DeviceFactory;
pub use identity::{sensor_name, DeviceIdentity, IdentityWarning};
pub use loopback::{BusFaults, BusStats, LoopbackBus};
pub use registry::{InitReport, SensorRegistry, SensorSlot, TeardownReport};

// Re-export the hardware-side types consumers need alongside the client
pub use sfh_transport::{
    PciDevice, PresenceMask, ReportCategory, SensorKind, SensorSample, SfhError, SharedContext,
    SimulatedHub,
};
