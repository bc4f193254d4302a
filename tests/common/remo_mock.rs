//! WireMock-based Nature Remo mocks
//!
//! [`MockRemoCloud`] serves the read endpoints of the cloud API with fixture
//! data; tests mount their own expectations for write endpoints.
//! [`MockHub`] stands in for a hub's local `/messages` endpoint.

use super::test_fixtures::{appliances_fixture, devices_fixture, user_fixture, TEST_TOKEN};
use remo_commander::config::{CloudConfig, LocalConfig};
use serde_json::Value;
use std::time::Duration;
use url::Url;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock cloud API
pub struct MockRemoCloud {
    pub server: MockServer,
}

impl MockRemoCloud {
    /// Start with the default fixture endpoints mounted
    pub async fn start() -> Self {
        let mock = Self::start_empty().await;
        mock.mock_reads(appliances_fixture()).await;
        mock
    }

    /// Start without any endpoints mounted
    pub async fn start_empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Serve `appliances` plus the fixture devices and user, requiring the
    /// test bearer token
    pub async fn mock_reads(&self, appliances: Value) {
        let bearer = format!("Bearer {TEST_TOKEN}");

        Mock::given(method("GET"))
            .and(path("/1/appliances"))
            .and(header("authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(appliances))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/devices"))
            .and(header("authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(devices_fixture()))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/users/me"))
            .and(header("authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_fixture()))
            .mount(&self.server)
            .await;
    }

    /// Reject every request with `status`
    pub async fn mock_error(&self, status: u16) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status).set_body_string("denied"))
            .mount(&self.server)
            .await;
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> CloudConfig {
        CloudConfig {
            base_url: Url::parse(&self.url()).expect("mock server URL"),
            token: Some(TEST_TOKEN.to_string()),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Mock hub local API
pub struct MockHub {
    pub server: MockServer,
}

impl MockHub {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// `host:port` as passed to the local client
    pub fn host(&self) -> String {
        self.server.address().to_string()
    }

    /// Answer `GET /messages` with `response`
    pub async fn mock_last_signal(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(header("x-requested-with", "local"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub fn config(&self) -> LocalConfig {
        LocalConfig {
            timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }
}
