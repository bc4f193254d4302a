//! Nature Remo client library
//!
//! Normalizes the Nature Remo cloud API and the hubs' local HTTP API into
//! typed Rust values.
//!
//! # Features
//!
//! - Tolerant decoding of fields whose wire shape varies between payloads
//! - Hub, sensor and appliance classification
//! - mDNS discovery of hubs on the local network
//! - Air conditioner command merging against the current state
//! - Raw IR send/receive through a hub's local endpoint
//! - Overlap-safe periodic polling

pub mod cloud;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod local;
pub mod logging;
pub mod models;
pub mod polling;

// Re-export main types for convenience
pub use cloud::CloudClient;
pub use command::{normalize, resolve_aircon_command, AirConOverrides, ApplianceSettings};
pub use config::RemoConfig;
pub use discovery::{DeviceDiscovery, DiscoveredDevice};
pub use error::{RemoError, Result};
pub use local::{IrSignal, LocalClient, SendReport, SignalWarning};
pub use polling::{PollOutcome, Poller};
