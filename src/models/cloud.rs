//! Records returned by the Nature Remo cloud API
//!
//! The cloud API is loosely typed: most fields are optional and some change
//! shape between endpoints. These structs accept what the service actually
//! sends and expose classified views on top.

use super::ambiguous::{string_or_number, AmbiguousIntCollection};
use super::taxonomy::{ApplianceType, DeviceType, SensorType};
use crate::command::ApplianceSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub superuser: Option<bool>,
}

/// Latest reading of one hub sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    pub val: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Physical hub as registered in the cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(default)]
    pub temperature_offset: Option<f64>,
    #[serde(default)]
    pub humidity_offset: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub newest_events: BTreeMap<String, SensorValue>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// A classified sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub key: String,
    pub sensor_type: SensorType,
    pub value: f64,
    pub unit: &'static str,
    pub created_at: Option<DateTime<Utc>>,
}

impl SensorReading {
    /// Human label, falling back to the raw key for unknown sensors
    pub fn label(&self) -> &str {
        match self.sensor_type {
            SensorType::Unknown => &self.key,
            known => known.label(),
        }
    }
}

impl Device {
    pub fn device_type(&self) -> DeviceType {
        DeviceType::from_firmware(self.firmware_version.as_deref())
    }

    /// `online` rendered the way listings show it
    pub fn online_status(&self) -> &'static str {
        match self.online {
            Some(true) => "true",
            Some(false) => "false",
            None => "unknown",
        }
    }

    /// Sensor readings in key order
    pub fn sensor_readings(&self) -> Vec<SensorReading> {
        self.newest_events
            .iter()
            .map(|(key, event)| {
                let sensor_type = SensorType::from_key(key);
                SensorReading {
                    key: key.clone(),
                    sensor_type,
                    value: event.val,
                    unit: sensor_type.unit(),
                    created_at: event.created_at,
                }
            })
            .collect()
    }
}

/// Reduced device record embedded in appliances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
}

/// Learned IR signal registered on an appliance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Preset button of a light or TV appliance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Button set and vendor-specific state of a light or TV
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonPanel {
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub state: Option<serde_json::Value>,
}

/// Air conditioner state as reported by the cloud
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirConSettings {
    #[serde(default, deserialize_with = "string_or_number")]
    pub temp: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vol: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub dir: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub dirh: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub button: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AirConSettings {
    /// Fully populated settings, missing fields as empty strings
    pub fn to_settings(&self) -> ApplianceSettings {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        ApplianceSettings {
            temperature: field(&self.temp),
            operation_mode: field(&self.mode),
            air_volume: field(&self.vol),
            air_direction: field(&self.dir),
            air_direction_h: field(&self.dirh),
            button: field(&self.button),
        }
    }
}

/// Controllable appliance registered against a hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    #[serde(rename = "type", default)]
    pub type_code: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub device: Option<DeviceRef>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub settings: Option<AirConSettings>,
    #[serde(default)]
    pub light: Option<ButtonPanel>,
    #[serde(default)]
    pub tv: Option<ButtonPanel>,
    #[serde(default)]
    pub user_index: AmbiguousIntCollection,
}

impl Appliance {
    pub fn appliance_type(&self) -> ApplianceType {
        ApplianceType::from_code(self.type_code.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.id)
    }

    pub fn belongs_to(&self, device_id: &str) -> bool {
        self.device.as_ref().is_some_and(|d| d.id == device_id)
    }

    /// Preset buttons for lights and TVs
    pub fn buttons(&self) -> &[Button] {
        self.light
            .as_ref()
            .or(self.tv.as_ref())
            .map(|panel| panel.buttons.as_slice())
            .unwrap_or(&[])
    }
}

/// Devices and appliances fetched in one request cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub devices: Vec<Device>,
    pub appliances: Vec<Appliance>,
}

impl Catalog {
    pub fn appliances_for<'a>(&'a self, device_id: &'a str) -> impl Iterator<Item = &'a Appliance> {
        self.appliances.iter().filter(move |a| a.belongs_to(device_id))
    }

    pub fn find_appliance(&self, appliance_id: &str) -> Option<&Appliance> {
        self.appliances.iter().find(|a| a.id == appliance_id)
    }
}
