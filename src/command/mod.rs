//! Air conditioner command normalization
//!
//! The cloud `aircon_settings` endpoint expects every field on every call.
//! Callers usually only want to change one of them, so a partial
//! [`AirConOverrides`] is merged field by field onto the appliance's last
//! reported [`ApplianceSettings`].

use crate::error::{RemoError, Result};
use crate::models::Appliance;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Button value that switches an air conditioner off
pub const POWER_OFF_BUTTON: &str = "power-off";

/// Complete air conditioner settings.
///
/// Values are free text because each physical unit defines its own option
/// sets. Field names match the form parameters of the cloud endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceSettings {
    pub temperature: String,
    pub operation_mode: String,
    pub air_volume: String,
    pub air_direction: String,
    pub air_direction_h: String,
    pub button: String,
}

/// Caller-supplied changes. `None` keeps the current value, `Some("")`
/// explicitly clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConOverrides {
    pub temperature: Option<String>,
    pub operation_mode: Option<String>,
    pub air_volume: Option<String>,
    pub air_direction: Option<String>,
    pub air_direction_h: Option<String>,
    pub button: Option<String>,
}

impl AirConOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, value: impl Into<String>) -> Self {
        self.temperature = Some(value.into());
        self
    }

    pub fn operation_mode(mut self, value: impl Into<String>) -> Self {
        self.operation_mode = Some(value.into());
        self
    }

    pub fn air_volume(mut self, value: impl Into<String>) -> Self {
        self.air_volume = Some(value.into());
        self
    }

    pub fn air_direction(mut self, value: impl Into<String>) -> Self {
        self.air_direction = Some(value.into());
        self
    }

    pub fn air_direction_h(mut self, value: impl Into<String>) -> Self {
        self.air_direction_h = Some(value.into());
        self
    }

    pub fn button(mut self, value: impl Into<String>) -> Self {
        self.button = Some(value.into());
        self
    }

    pub fn power_off(self) -> Self {
        self.button(POWER_OFF_BUTTON)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Merge `overrides` onto `current`, one field at a time.
pub fn normalize(current: &ApplianceSettings, overrides: &AirConOverrides) -> ApplianceSettings {
    fn pick(over: &Option<String>, current: &str) -> String {
        over.clone().unwrap_or_else(|| current.to_string())
    }

    ApplianceSettings {
        temperature: pick(&overrides.temperature, &current.temperature),
        operation_mode: pick(&overrides.operation_mode, &current.operation_mode),
        air_volume: pick(&overrides.air_volume, &current.air_volume),
        air_direction: pick(&overrides.air_direction, &current.air_direction),
        air_direction_h: pick(&overrides.air_direction_h, &current.air_direction_h),
        button: pick(&overrides.button, &current.button),
    }
}

/// Look up `appliance_id` in `catalog` and build the complete command.
///
/// Fails with [`RemoError::ApplianceNotFound`] when the id is absent and
/// [`RemoError::SettingsUnavailable`] when the appliance has no settings.
pub fn resolve_aircon_command(
    catalog: &[Appliance],
    appliance_id: &str,
    overrides: &AirConOverrides,
) -> Result<ApplianceSettings> {
    let appliance = catalog
        .iter()
        .find(|a| a.id == appliance_id)
        .ok_or_else(|| RemoError::ApplianceNotFound(appliance_id.to_string()))?;

    let current = appliance
        .settings
        .as_ref()
        .ok_or_else(|| RemoError::SettingsUnavailable(appliance_id.to_string()))?
        .to_settings();

    let resolved = normalize(&current, overrides);
    debug!("Resolved aircon command for {appliance_id}: {resolved:?}");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AirConSettings;
    use pretty_assertions::assert_eq;

    fn current() -> ApplianceSettings {
        ApplianceSettings {
            temperature: "25".into(),
            operation_mode: "cool".into(),
            air_volume: "auto".into(),
            air_direction: "swing".into(),
            air_direction_h: String::new(),
            button: String::new(),
        }
    }

    fn appliance(id: &str, settings: Option<AirConSettings>) -> Appliance {
        serde_json::from_value(serde_json::json!({"id": id, "type": "AC"}))
            .map(|mut a: Appliance| {
                a.settings = settings;
                a
            })
            .unwrap()
    }

    #[test]
    fn test_override_only_changes_named_field() {
        let result = normalize(&current(), &AirConOverrides::new().temperature("27"));
        assert_eq!(
            result,
            ApplianceSettings {
                temperature: "27".into(),
                ..current()
            }
        );
    }

    #[test]
    fn test_empty_override_is_not_absent() {
        let result = normalize(&current(), &AirConOverrides::new().air_direction(""));
        assert_eq!(result.air_direction, "");
        assert_eq!(result.operation_mode, "cool");
    }

    #[test]
    fn test_no_overrides_keeps_current() {
        assert!(AirConOverrides::new().is_empty());
        assert_eq!(normalize(&current(), &AirConOverrides::new()), current());
    }

    #[test]
    fn test_power_off() {
        let result = normalize(&current(), &AirConOverrides::new().power_off());
        assert_eq!(result.button, POWER_OFF_BUTTON);
        assert_eq!(result.temperature, "25");
    }

    #[test]
    fn test_resolve_fills_missing_current_fields_with_empty() {
        let settings = AirConSettings {
            temp: Some("22".into()),
            mode: Some("warm".into()),
            ..Default::default()
        };
        let catalog = vec![appliance("ac-1", Some(settings))];

        let result =
            resolve_aircon_command(&catalog, "ac-1", &AirConOverrides::new().air_volume("2"))
                .unwrap();
        assert_eq!(result.temperature, "22");
        assert_eq!(result.operation_mode, "warm");
        assert_eq!(result.air_volume, "2");
        assert_eq!(result.air_direction, "");
        assert_eq!(result.button, "");
    }

    #[test]
    fn test_resolve_missing_appliance() {
        let catalog = vec![appliance("ac-1", Some(AirConSettings::default()))];
        let err = resolve_aircon_command(&catalog, "ac-2", &AirConOverrides::new()).unwrap_err();
        assert!(matches!(err, RemoError::ApplianceNotFound(id) if id == "ac-2"));
    }

    #[test]
    fn test_resolve_without_settings() {
        let catalog = vec![appliance("tv-1", None)];
        let err = resolve_aircon_command(&catalog, "tv-1", &AirConOverrides::new().temperature("27"))
            .unwrap_err();
        assert!(matches!(err, RemoError::SettingsUnavailable(id) if id == "tv-1"));
    }
}
