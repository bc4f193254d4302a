//! Data model shared by the cloud and local transports

pub mod ambiguous;
pub mod cloud;
pub mod taxonomy;

pub use ambiguous::{AmbiguousIntCollection, WireValue};
pub use cloud::{
    AirConSettings, Appliance, Button, ButtonPanel, Catalog, Device, DeviceRef, SensorReading,
    SensorValue, Signal, User,
};
pub use taxonomy::{sensor_unit, ApplianceType, DeviceType, SensorType};
