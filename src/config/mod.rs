//! Configuration for the Nature Remo client
//!
//! Values come from an optional TOML file and are then overridden by
//! environment variables. Every section has usable defaults except the
//! cloud token, which is only required once a cloud client is built.

use crate::error::{RemoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default cloud API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.nature.global/";

/// mDNS service type advertised by Remo hubs
pub const REMO_SERVICE_TYPE: &str = "_remo._tcp.local.";

/// Carrier frequency used when none is given, in kHz
pub const DEFAULT_FREQUENCY_KHZ: i32 = 38;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoConfig {
    pub cloud: CloudConfig,
    pub local: LocalConfig,
    pub discovery: DiscoveryConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

/// Cloud API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// API base URL
    pub base_url: Url,

    /// Bearer token issued at home.nature.global
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid")
}

impl CloudConfig {
    /// Token, rejecting a missing or blank one
    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(RemoError::config(
                "Nature Remo API token is not configured (set REMO_TOKEN or cloud.token)",
            )),
        }
    }
}

/// Local hub HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    pub default_frequency_khz: i32,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            default_frequency_khz: DEFAULT_FREQUENCY_KHZ,
        }
    }
}

/// mDNS discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub service_type: String,

    #[serde(with = "humantime_serde")]
    pub scan_duration: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: REMO_SERVICE_TYPE.to_string(),
            scan_duration: Duration::from_secs(5),
        }
    }
}

/// Appliance state polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    pub stderr: bool,
    /// Emit stderr logs as JSON lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            stderr: true,
            json: false,
        }
    }
}

impl RemoConfig {
    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("remo-commander").join("config.toml"))
    }

    /// Load from `path` (which must exist) or from the default location if
    /// present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::from_file(&default)?,
                None => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            RemoError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| RemoError::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply `REMO_*` environment variables on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(token) = std::env::var("REMO_TOKEN") {
            self.cloud.token = Some(token);
        }

        if let Ok(url) = std::env::var("REMO_API_BASE_URL") {
            self.cloud.base_url = Url::parse(&url)
                .map_err(|e| RemoError::config(format!("Invalid REMO_API_BASE_URL: {e}")))?;
        }

        if let Ok(secs) = std::env::var("REMO_SCAN_SECONDS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| RemoError::config(format!("Invalid REMO_SCAN_SECONDS: {e}")))?;
            self.discovery.scan_duration = Duration::from_secs(secs);
        }

        if let Ok(interval) = std::env::var("REMO_POLL_INTERVAL") {
            self.polling.interval = humantime_serde::re::humantime::parse_duration(&interval)
                .map_err(|e| RemoError::config(format!("Invalid REMO_POLL_INTERVAL: {e}")))?;
        }

        Ok(())
    }
}
