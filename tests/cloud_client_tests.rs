//! Cloud client tests against a WireMock server

use pretty_assertions::assert_eq;
use remo_commander::models::{ApplianceType, DeviceType, SensorType};
use remo_commander::{AirConOverrides, ApplianceSettings, CloudClient, RemoError};
use rstest::*;
use serde_json::json;
use wiremock::{
    matchers::{body_string, body_string_contains, header, method, path},
    Mock, ResponseTemplate,
};

mod common;
use common::{test_fixtures::TestIds, MockRemoCloud};

#[fixture]
async fn cloud() -> MockRemoCloud {
    MockRemoCloud::start().await
}

fn client(mock: &MockRemoCloud) -> CloudClient {
    CloudClient::new(&mock.config()).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_appliances_decode_every_user_index_shape(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;
    let appliances = client(&cloud).appliances().await.unwrap();

    let indices: Vec<(&str, Vec<i64>)> = appliances
        .iter()
        .map(|a| (a.id.as_str(), a.user_index.to_vec()))
        .collect();
    assert_eq!(
        indices,
        vec![
            (TestIds::AIRCON, vec![0]),
            (TestIds::LIGHT, vec![3]),
            (TestIds::TV, vec![1, 2, 3]),
            (TestIds::IR, vec![]),
            (TestIds::SESAME, vec![]),
        ]
    );

    let types: Vec<ApplianceType> = appliances.iter().map(|a| a.appliance_type()).collect();
    assert_eq!(
        types,
        vec![
            ApplianceType::AC,
            ApplianceType::Light,
            ApplianceType::TV,
            ApplianceType::IR,
            ApplianceType::SesameBot,
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_user_index_reserializes_as_array(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;
    let appliances = client(&cloud).appliances().await.unwrap();

    let light = serde_json::to_value(&appliances[1]).unwrap();
    assert_eq!(light["user_index"], json!([3]));
    let ir = serde_json::to_value(&appliances[3]).unwrap();
    assert_eq!(ir["user_index"], json!([]));
}

#[rstest]
#[tokio::test]
async fn test_devices_are_classified(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;
    let devices = client(&cloud).devices().await.unwrap();

    assert_eq!(devices[0].device_type(), DeviceType::Remo);
    assert_eq!(devices[0].online_status(), "true");
    assert_eq!(devices[1].device_type(), DeviceType::RemoMini);
    assert_eq!(devices[1].online_status(), "unknown");

    let readings = devices[0].sensor_readings();
    let summary: Vec<(SensorType, &str)> =
        readings.iter().map(|r| (r.sensor_type, r.unit)).collect();
    assert_eq!(
        summary,
        vec![
            (SensorType::Humidity, "%"),
            (SensorType::Illumination, "lux"),
            (SensorType::Motion, ""),
            (SensorType::Temperature, "°C"),
        ]
    );

    let unknown = devices[1]
        .sensor_readings()
        .into_iter()
        .find(|r| r.key == "xx")
        .unwrap();
    assert_eq!(unknown.sensor_type, SensorType::Unknown);
    assert_eq!(unknown.label(), "xx");
}

#[rstest]
#[tokio::test]
async fn test_appliances_for_device(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;
    let client = client(&cloud);

    let bedroom = client
        .appliances_for_device(TestIds::BEDROOM_HUB)
        .await
        .unwrap();
    let ids: Vec<&str> = bedroom.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![TestIds::TV, TestIds::IR]);

    let catalog = client.catalog().await.unwrap();
    assert_eq!(catalog.devices.len(), 2);
    assert_eq!(catalog.appliances_for(TestIds::LIVING_ROOM_HUB).count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_me(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;
    let user = client(&cloud).me().await.unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(user.nickname.as_deref(), Some("tester"));
}

#[rstest]
#[tokio::test]
async fn test_aircon_override_keeps_current_fields(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;

    Mock::given(method("POST"))
        .and(path(format!("/1/appliances/{}/aircon_settings", TestIds::AIRCON)))
        .and(header("authorization", "Bearer test-token"))
        .and(body_string(
            "temperature=27&operation_mode=cool&air_volume=auto&air_direction=1\
             &air_direction_h=swing&button=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&cloud.server)
        .await;

    let sent = client(&cloud)
        .apply_aircon_overrides(TestIds::AIRCON, &AirConOverrides::new().temperature("27"))
        .await
        .unwrap();

    assert_eq!(
        sent,
        ApplianceSettings {
            temperature: "27".into(),
            operation_mode: "cool".into(),
            air_volume: "auto".into(),
            air_direction: "1".into(),
            air_direction_h: "swing".into(),
            button: String::new(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn test_aircon_power_off(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;

    Mock::given(method("POST"))
        .and(path(format!("/1/appliances/{}/aircon_settings", TestIds::AIRCON)))
        .and(body_string_contains("temperature=25"))
        .and(body_string_contains("button=power-off"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud.server)
        .await;

    let sent = client(&cloud)
        .apply_aircon_overrides(TestIds::AIRCON, &AirConOverrides::new().power_off())
        .await
        .unwrap();
    assert_eq!(sent.button, "power-off");
}

#[rstest]
#[case::unknown_appliance("app-missing")]
#[case::no_settings(TestIds::LIGHT)]
#[tokio::test]
async fn test_aircon_failures_send_nothing(#[case] appliance_id: &str) {
    let cloud = MockRemoCloud::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&cloud.server)
        .await;

    let err = client(&cloud)
        .apply_aircon_overrides(appliance_id, &AirConOverrides::new().temperature("20"))
        .await
        .unwrap_err();

    match appliance_id {
        TestIds::LIGHT => assert!(matches!(err, RemoError::SettingsUnavailable(id) if id == appliance_id)),
        _ => assert!(matches!(err, RemoError::ApplianceNotFound(id) if id == appliance_id)),
    }
}

#[rstest]
#[tokio::test]
async fn test_button_endpoints(#[future] cloud: MockRemoCloud) {
    let cloud = cloud.await;

    Mock::given(method("POST"))
        .and(path(format!("/1/appliances/{}/light", TestIds::LIGHT)))
        .and(body_string("button=on"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud.server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/1/appliances/{}/tv", TestIds::TV)))
        .and(body_string("button=power"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud.server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/1/signals/{}/send", TestIds::FAN_SIGNAL)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud.server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/1/appliances/{}/bleSesameBot/click", TestIds::SESAME)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud.server)
        .await;

    let client = client(&cloud);
    client.send_light_button(TestIds::LIGHT, "on").await.unwrap();
    client.send_tv_button(TestIds::TV, "power").await.unwrap();
    client.send_signal(TestIds::FAN_SIGNAL).await.unwrap();
    client.click_sesame_bot(TestIds::SESAME).await.unwrap();
}

#[rstest]
#[case(401)]
#[case(403)]
#[tokio::test]
async fn test_rejected_token_is_auth_error(#[case] status: u16) {
    let cloud = MockRemoCloud::start_empty().await;
    cloud.mock_error(status).await;

    let err = client(&cloud).appliances().await.unwrap_err();
    assert!(err.is_auth_error(), "unexpected error: {err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let cloud = MockRemoCloud::start_empty().await;
    cloud.mock_error(500).await;

    let err = client(&cloud).devices().await.unwrap_err();
    assert!(matches!(err, RemoError::Network(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let cloud = MockRemoCloud::start_empty().await;

    Mock::given(method("GET"))
        .and(path("/proxy/1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-2" })))
        .expect(1)
        .mount(&cloud.server)
        .await;

    let mut config = cloud.config();
    config.base_url = format!("{}/proxy", cloud.url()).parse().unwrap();

    let user = CloudClient::new(&config).unwrap().me().await.unwrap();
    assert_eq!(user.id, "user-2");
}
