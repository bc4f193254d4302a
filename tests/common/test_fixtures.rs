//! Test fixtures for consistent test setup
//!
//! Payloads mirror what the cloud API returns, including the inconsistent
//! shapes some fields arrive in.

use serde_json::{json, Value};

pub const TEST_TOKEN: &str = "test-token";

/// Identifiers used across fixtures
pub struct TestIds;

impl TestIds {
    pub const LIVING_ROOM_HUB: &'static str = "dev-living";
    pub const BEDROOM_HUB: &'static str = "dev-bedroom";
    pub const AIRCON: &'static str = "app-aircon";
    pub const LIGHT: &'static str = "app-light";
    pub const TV: &'static str = "app-tv";
    pub const IR: &'static str = "app-ir";
    pub const SESAME: &'static str = "app-sesame";
    pub const FAN_SIGNAL: &'static str = "sig-fan-on";
}

pub fn user_fixture() -> Value {
    json!({ "id": "user-1", "nickname": "tester", "superuser": true })
}

pub fn devices_fixture() -> Value {
    json!([
        {
            "id": TestIds::LIVING_ROOM_HUB,
            "name": "Living room",
            "firmware_version": "Remo/1.14.6",
            "online": true,
            "newest_events": {
                "te": { "val": 22.5, "created_at": "2026-10-01T08:00:00Z" },
                "hu": { "val": 48, "created_at": "2026-10-01T08:00:00Z" },
                "il": { "val": 120, "created_at": "2026-10-01T08:00:00Z" },
                "mo": { "val": 1, "created_at": "2026-10-01T07:59:00Z" }
            }
        },
        {
            "id": TestIds::BEDROOM_HUB,
            "name": "Bedroom",
            "firmware_version": "Remo-mini/2.0.62-g0d9e3b5",
            "newest_events": {
                "te": { "val": 19.0 },
                "xx": { "val": 3 }
            }
        }
    ])
}

pub fn appliances_fixture() -> Value {
    json!([
        {
            "id": TestIds::AIRCON,
            "type": "AC",
            "nickname": "Air conditioner",
            "device": { "id": TestIds::LIVING_ROOM_HUB, "name": "Living room" },
            "settings": {
                "temp": 25,
                "mode": "cool",
                "vol": "auto",
                "dir": "1",
                "dirh": "swing",
                "button": ""
            },
            "user_index": 0
        },
        {
            "id": TestIds::LIGHT,
            "type": "LIGHT",
            "nickname": "Ceiling",
            "device": { "id": TestIds::LIVING_ROOM_HUB, "name": "Living room" },
            "light": { "buttons": [ { "name": "on" }, { "name": "off" } ] },
            "user_index": "3"
        },
        {
            "id": TestIds::TV,
            "type": "TV",
            "nickname": "TV",
            "device": { "id": TestIds::BEDROOM_HUB, "name": "Bedroom" },
            "tv": { "buttons": [ { "name": "power" } ] },
            "user_index": [1, "2", 3.9]
        },
        {
            "id": TestIds::IR,
            "type": "IR",
            "nickname": "Fan",
            "device": { "id": TestIds::BEDROOM_HUB, "name": "Bedroom" },
            "signals": [ { "id": TestIds::FAN_SIGNAL, "name": "on" } ],
            "user_index": null
        },
        {
            "id": TestIds::SESAME,
            "type": "BLE_SESAME_BOT",
            "user_index": { "unexpected": true }
        }
    ])
}
