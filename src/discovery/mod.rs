//! Local network discovery of Remo hubs
//!
//! A scan browses a single mDNS service type for a bounded window and
//! returns every hub that resolved in that time. Scans share nothing: each
//! call starts a fresh browse and owns its own result buffer.

pub mod mdns;

use crate::config::DiscoveryConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use mdns::MdnsBrowser;

/// A hub found on the local network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// Service instance name, e.g. `Remo-1A2B3C`
    pub name: String,
    /// mDNS host name without the trailing dot
    pub host: String,
    pub ip_address: String,
    pub port: u16,
}

impl PartialEq for DiscoveredDevice {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for DiscoveredDevice {}

impl Hash for DiscoveredDevice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}

/// A resolved mDNS service announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    /// Full instance name, e.g. `Remo-1A2B3C._remo._tcp.local.`
    pub fullname: String,
    pub service_type: String,
    pub hostname: String,
    pub addresses: Vec<IpAddr>,
    pub port: u16,
}

impl ResolvedService {
    /// Instance label without the service type suffix
    pub fn instance_name(&self) -> &str {
        self.fullname
            .strip_suffix(&self.service_type)
            .map(|name| name.trim_end_matches('.'))
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.fullname)
    }

    /// IPv4 preferred, matching what hubs answer on
    pub fn preferred_address(&self) -> Option<IpAddr> {
        self.addresses
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| self.addresses.first())
            .copied()
    }

    fn to_device(&self) -> DiscoveredDevice {
        DiscoveredDevice {
            name: self.instance_name().to_string(),
            host: self.hostname.trim_end_matches('.').to_string(),
            ip_address: self
                .preferred_address()
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            port: self.port,
        }
    }
}

/// Source of resolved service announcements
#[async_trait]
pub trait ServiceBrowser: Send + Sync {
    /// Start browsing `service_type`. Browsing stops once the returned
    /// receiver is dropped.
    async fn browse(&self, service_type: &str) -> Result<mpsc::Receiver<ResolvedService>>;
}

/// Time-bounded hub discovery
pub struct DeviceDiscovery<B = MdnsBrowser> {
    browser: B,
    service_type: String,
}

impl DeviceDiscovery<MdnsBrowser> {
    /// Discovery over real mDNS
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self::with_browser(MdnsBrowser, config)
    }
}

impl<B: ServiceBrowser> DeviceDiscovery<B> {
    pub fn with_browser(browser: B, config: &DiscoveryConfig) -> Self {
        Self {
            browser,
            service_type: config.service_type.clone(),
        }
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// Scan for `scan_duration` or until `cancel` fires.
    ///
    /// An elapsed window is not an error: whatever resolved so far is
    /// returned, possibly nothing.
    pub async fn discover(
        &self,
        scan_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<DiscoveredDevice>> {
        info!(
            "Scanning for {} for {:?}",
            self.service_type, scan_duration
        );
        let events = self.browser.browse(&self.service_type).await?;
        let devices = collect_services(events, &self.service_type, scan_duration, cancel).await;
        info!("Found {} device(s)", devices.len());
        Ok(devices)
    }
}

/// Listen on `events` until the window elapses, the token is cancelled or
/// the browser goes away, keeping exact service-type matches only.
pub async fn collect_services(
    mut events: mpsc::Receiver<ResolvedService>,
    service_type: &str,
    scan_duration: Duration,
    cancel: &CancellationToken,
) -> Vec<DiscoveredDevice> {
    let mut collector = Collector::new(service_type);

    let deadline = tokio::time::sleep(scan_duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Discovery cancelled");
                break;
            }
            _ = &mut deadline => {
                debug!("Discovery window elapsed");
                break;
            }
            event = events.recv() => match event {
                Some(service) => collector.accept(&service),
                None => {
                    debug!("Service browser closed");
                    break;
                }
            },
        }
    }

    // announcements already queued when the loop stopped still count
    while let Ok(service) = events.try_recv() {
        collector.accept(&service);
    }

    collector.devices
}

struct Collector<'a> {
    service_type: &'a str,
    seen: HashSet<DiscoveredDevice>,
    devices: Vec<DiscoveredDevice>,
}

impl<'a> Collector<'a> {
    fn new(service_type: &'a str) -> Self {
        Self {
            service_type,
            seen: HashSet::new(),
            devices: Vec::new(),
        }
    }

    fn accept(&mut self, service: &ResolvedService) {
        if service.service_type != self.service_type {
            debug!(
                "Ignoring {} advertising {}",
                service.fullname, service.service_type
            );
            return;
        }

        let device = service.to_device();
        if self.seen.insert(device.clone()) {
            debug!("Resolved {} at {}:{}", device.name, device.ip_address, device.port);
            self.devices.push(device);
        }
    }
}
