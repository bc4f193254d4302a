//! Nature Remo cloud API client
//!
//! Thin typed wrapper over the REST endpoints used for listing and
//! controlling appliances. Failures are surfaced as-is; nothing is retried.

use crate::command::{resolve_aircon_command, AirConOverrides, ApplianceSettings};
use crate::config::CloudConfig;
use crate::error::{RemoError, Result};
use crate::local::transport_error;
use crate::models::{Appliance, Catalog, Device, User};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

/// Authenticated client for `api.nature.global`
#[derive(Debug, Clone)]
pub struct CloudClient {
    client: Client,
    base_url: Url,
}

impl CloudClient {
    /// Build a client with the bearer token from `config`
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let token = config.require_token()?;

        let mut headers = reqwest::header::HeaderMap::new();
        let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| RemoError::config(format!("Invalid API token: {e}")))?;
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("remo-commander/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| RemoError::network(format!("Failed to build HTTP client: {e}")))?;

        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoError::config(format!("Invalid URL path {path}: {e}")))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("HTTP error {status}: {body}");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RemoError::authentication(message)
            }
            _ => RemoError::network(message),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path)?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let body = Self::check(response).await?.text().await.map_err(transport_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_form<B: Serialize + ?Sized>(&self, path: &str, form: &B) -> Result<()> {
        let url = self.build_url(path)?;
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<User> {
        self.get_json("1/users/me").await
    }

    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.get_json("1/devices").await
    }

    pub async fn appliances(&self) -> Result<Vec<Appliance>> {
        self.get_json("1/appliances").await
    }

    /// Appliances attached to one hub
    pub async fn appliances_for_device(&self, device_id: &str) -> Result<Vec<Appliance>> {
        let appliances = self.appliances().await?;
        Ok(appliances
            .into_iter()
            .filter(|a| a.belongs_to(device_id))
            .collect())
    }

    /// Devices and appliances fetched concurrently
    pub async fn catalog(&self) -> Result<Catalog> {
        let (devices, appliances) = futures::try_join!(self.devices(), self.appliances())?;
        Ok(Catalog {
            devices,
            appliances,
        })
    }

    /// Send a complete settings payload to an air conditioner
    pub async fn update_aircon_settings(
        &self,
        appliance_id: &str,
        settings: &ApplianceSettings,
    ) -> Result<()> {
        self.post_form(&format!("1/appliances/{appliance_id}/aircon_settings"), settings)
            .await?;
        info!("Air conditioner settings updated: {appliance_id}");
        Ok(())
    }

    /// Fetch current state, merge `overrides` and send the result
    pub async fn apply_aircon_overrides(
        &self,
        appliance_id: &str,
        overrides: &AirConOverrides,
    ) -> Result<ApplianceSettings> {
        let appliances = self.appliances().await?;
        let settings = resolve_aircon_command(&appliances, appliance_id, overrides)?;
        self.update_aircon_settings(appliance_id, &settings).await?;
        Ok(settings)
    }

    pub async fn send_light_button(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.post_form(
            &format!("1/appliances/{appliance_id}/light"),
            &[("button", button)],
        )
        .await
    }

    pub async fn send_tv_button(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.post_form(
            &format!("1/appliances/{appliance_id}/tv"),
            &[("button", button)],
        )
        .await
    }

    /// Replay a learned signal
    pub async fn send_signal(&self, signal_id: &str) -> Result<()> {
        self.post_form::<[(&str, &str)]>(&format!("1/signals/{signal_id}/send"), &[])
            .await
    }

    pub async fn click_sesame_bot(&self, appliance_id: &str) -> Result<()> {
        self.post_form::<[(&str, &str)]>(
            &format!("1/appliances/{appliance_id}/bleSesameBot/click"),
            &[],
        )
        .await
    }
}
