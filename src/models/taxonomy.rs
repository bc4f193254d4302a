//! Classification of vendor identifiers into closed enumerations
//!
//! Each classifier walks an ordered rule table top to bottom and returns the
//! first match. Nothing here fails: unrecognised input maps to `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a rule matches its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Contains(&'static str),
    Exact(&'static str),
}

impl Pattern {
    fn matches(&self, input: &str) -> bool {
        match self {
            Pattern::Contains(needle) => input.contains(needle),
            Pattern::Exact(expected) => input == *expected,
        }
    }
}

/// A single (pattern, result) entry of a rule table
#[derive(Debug, Clone, Copy)]
pub struct Rule<T> {
    pub pattern: Pattern,
    pub result: T,
}

const fn rule<T>(pattern: Pattern, result: T) -> Rule<T> {
    Rule { pattern, result }
}

/// Evaluate `rules` in order, falling back when nothing matches
pub fn classify<T: Copy>(rules: &[Rule<T>], input: Option<&str>, fallback: T) -> T {
    input
        .and_then(|value| rules.iter().find(|r| r.pattern.matches(value)))
        .map_or(fallback, |r| r.result)
}

/// Nature Remo hardware family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[default]
    Unknown,
    Remo,
    RemoMini,
    Remo3,
    RemoE,
}

/// More specific firmware prefixes must precede plain "Remo".
pub const DEVICE_RULES: &[Rule<DeviceType>] = &[
    rule(Pattern::Contains("Remo-E"), DeviceType::RemoE),
    rule(Pattern::Contains("Remo-mini"), DeviceType::RemoMini),
    rule(Pattern::Contains("Remo-3"), DeviceType::Remo3),
    rule(Pattern::Contains("Remo"), DeviceType::Remo),
];

impl DeviceType {
    /// Classify from a firmware version string such as `"Remo-mini/1.2.3"`
    pub fn from_firmware(firmware_version: Option<&str>) -> Self {
        classify(DEVICE_RULES, firmware_version, DeviceType::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Unknown => "Unknown device",
            DeviceType::Remo => "Remo",
            DeviceType::RemoMini => "Remo mini",
            DeviceType::Remo3 => "Remo 3",
            DeviceType::RemoE => "Remo E",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of reading in a device's `newest_events`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    #[default]
    Unknown,
    Temperature,
    Humidity,
    Illumination,
    Motion,
}

pub const SENSOR_RULES: &[Rule<SensorType>] = &[
    rule(Pattern::Exact("te"), SensorType::Temperature),
    rule(Pattern::Exact("hu"), SensorType::Humidity),
    rule(Pattern::Exact("il"), SensorType::Illumination),
    rule(Pattern::Exact("mo"), SensorType::Motion),
];

impl SensorType {
    /// Classify from a two-letter sensor key
    pub fn from_key(sensor_key: &str) -> Self {
        classify(SENSOR_RULES, Some(sensor_key), SensorType::Unknown)
    }

    /// Display unit; empty for readings without one
    pub fn unit(&self) -> &'static str {
        match self {
            SensorType::Temperature => "°C",
            SensorType::Humidity => "%",
            SensorType::Illumination => "lux",
            SensorType::Motion | SensorType::Unknown => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensorType::Unknown => "Unknown",
            SensorType::Temperature => "Temperature",
            SensorType::Humidity => "Humidity",
            SensorType::Illumination => "Illumination",
            SensorType::Motion => "Motion",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit for a raw sensor key
pub fn sensor_unit(sensor_key: &str) -> &'static str {
    SensorType::from_key(sensor_key).unit()
}

/// Logical appliance kind registered against a hub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplianceType {
    #[default]
    Unknown,
    AC,
    TV,
    Light,
    IR,
    SesameBot,
}

pub const APPLIANCE_RULES: &[Rule<ApplianceType>] = &[
    rule(Pattern::Exact("AC"), ApplianceType::AC),
    rule(Pattern::Exact("TV"), ApplianceType::TV),
    rule(Pattern::Exact("LIGHT"), ApplianceType::Light),
    rule(Pattern::Exact("IR"), ApplianceType::IR),
    rule(Pattern::Exact("BLE_SESAME_BOT"), ApplianceType::SesameBot),
];

impl ApplianceType {
    /// Classify from the vendor `type` code
    pub fn from_code(type_code: Option<&str>) -> Self {
        classify(APPLIANCE_RULES, type_code, ApplianceType::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplianceType::Unknown => "Unknown",
            ApplianceType::AC => "Air conditioner",
            ApplianceType::TV => "TV",
            ApplianceType::Light => "Light",
            ApplianceType::IR => "IR remote",
            ApplianceType::SesameBot => "SESAME BOT",
        }
    }
}

impl fmt::Display for ApplianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
