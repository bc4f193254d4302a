//! Local HTTP API of a Remo hub
//!
//! Hubs found through discovery accept raw IR timing data on
//! `POST /messages` and return the last captured signal on `GET /messages`.
//! Requests must carry `X-Requested-With: local`.

use crate::config::LocalConfig;
use crate::error::{RemoError, Result};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};
use url::Url;

/// Nominal carrier frequency range in kHz
pub const FREQUENCY_RANGE_KHZ: RangeInclusive<i32> = 20..=60;

/// Timing unit of the `data` array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalFormat {
    #[default]
    #[serde(rename = "us")]
    Microseconds,
}

/// Raw IR waveform: alternating mark/space durations plus carrier frequency.
///
/// `format` may be omitted by a hub since `us` is its only value; `freq` is
/// required. Out-of-range frequencies, negative ones included, are carried
/// as-is and only warned about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrSignal {
    #[serde(default)]
    pub format: SignalFormat,
    /// Carrier frequency in kHz
    pub freq: i32,
    #[serde(default)]
    pub data: Vec<u32>,
}

impl IrSignal {
    pub fn new(freq: i32, data: Vec<u32>) -> Self {
        Self {
            format: SignalFormat::Microseconds,
            freq,
            data,
        }
    }
}

/// Soft validation findings that never block a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalWarning {
    FrequencyOutOfRange { freq: i32 },
}

impl fmt::Display for SignalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalWarning::FrequencyOutOfRange { freq } => write!(
                f,
                "Frequency {freq} kHz is outside normal range ({}-{} kHz)",
                FREQUENCY_RANGE_KHZ.start(),
                FREQUENCY_RANGE_KHZ.end()
            ),
        }
    }
}

/// Outcome of a successful send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReport {
    pub warnings: Vec<SignalWarning>,
}

/// Check a signal before sending. Hard failures are errors, soft ones are
/// returned as warnings.
pub fn validate_signal(signal: &IrSignal) -> Result<Vec<SignalWarning>> {
    if signal.data.is_empty() {
        return Err(RemoError::EmptySignal);
    }

    let mut warnings = Vec::new();
    if !FREQUENCY_RANGE_KHZ.contains(&signal.freq) {
        warnings.push(SignalWarning::FrequencyOutOfRange { freq: signal.freq });
    }
    Ok(warnings)
}

/// HTTP client for hub-local endpoints
#[derive(Debug, Clone)]
pub struct LocalClient {
    client: Client,
}

impl LocalClient {
    pub fn new(config: &LocalConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "X-Requested-With",
            reqwest::header::HeaderValue::from_static("local"),
        );

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("remo-commander/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| RemoError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// `http://{host}/messages`; `host` may carry a port
    fn messages_url(host: &str) -> Result<Url> {
        let host = host.trim();
        if host.is_empty() {
            return Err(RemoError::InvalidHost(host.to_string()));
        }
        Url::parse(&format!("http://{host}/messages"))
            .map_err(|_| RemoError::InvalidHost(host.to_string()))
    }

    /// Transmit `signal` through the hub at `host`
    pub async fn send(&self, host: &str, signal: &IrSignal) -> Result<SendReport> {
        let url = Self::messages_url(host)?;
        let warnings = validate_signal(signal)?;
        for warning in &warnings {
            warn!("{warning}");
        }

        debug!("Sending IR signal ({} entries) to {url}", signal.data.len());
        let response = self
            .client
            .post(url)
            .json(signal)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoError::network(format!(
                "Hub {host} rejected IR signal: HTTP {status}: {body}"
            )));
        }

        info!("IR signal sent to {host}");
        Ok(SendReport { warnings })
    }

    /// Fetch the last IR signal the hub at `host` captured
    pub async fn receive(&self, host: &str) -> Result<IrSignal> {
        let url = Self::messages_url(host)?;
        debug!("Fetching last IR signal from {url}");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Err(RemoError::NoSignalAvailable(host.to_string()));
        }
        if !status.is_success() {
            return Err(RemoError::network(format!(
                "Hub {host} returned HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(transport_error)?;
        if body.trim().is_empty() {
            return Err(RemoError::NoSignalAvailable(host.to_string()));
        }

        match serde_json::from_str::<Option<IrSignal>>(&body)? {
            Some(signal) if !signal.data.is_empty() => Ok(signal),
            _ => Err(RemoError::NoSignalAvailable(host.to_string())),
        }
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> RemoError {
    if e.is_timeout() {
        RemoError::timeout(format!("HTTP request timed out: {e}"))
    } else {
        RemoError::Http(e)
    }
}
