//! mDNS browsing backed by the `mdns-sd` daemon
//!
//! The daemon delivers events on a blocking channel, so a blocking task
//! drains it and forwards resolved services to the async scan loop. The
//! task stops the browse and shuts the daemon down once the scan drops its
//! receiver.

use super::{ResolvedService, ServiceBrowser};
use crate::error::{RemoError, Result};
use async_trait::async_trait;
use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const FORWARD_BUFFER: usize = 64;

/// Browser using the system's multicast DNS
#[derive(Debug, Clone, Copy, Default)]
pub struct MdnsBrowser;

impl From<&ServiceInfo> for ResolvedService {
    fn from(info: &ServiceInfo) -> Self {
        Self {
            fullname: info.get_fullname().to_string(),
            service_type: info.get_type().to_string(),
            hostname: info.get_hostname().to_string(),
            addresses: info.get_addresses().iter().map(|ip| IpAddr::from(*ip)).collect(),
            port: info.get_port(),
        }
    }
}

#[async_trait]
impl ServiceBrowser for MdnsBrowser {
    async fn browse(&self, service_type: &str) -> Result<mpsc::Receiver<ResolvedService>> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| RemoError::discovery(format!("Failed to create mDNS daemon: {e}")))?;
        let events = daemon
            .browse(service_type)
            .map_err(|e| RemoError::discovery(format!("Failed to browse {service_type}: {e}")))?;

        let (tx, rx) = mpsc::channel(FORWARD_BUFFER);
        let service_type = service_type.to_string();

        tokio::task::spawn_blocking(move || {
            while !tx.is_closed() {
                match events.recv_timeout(EVENT_POLL_INTERVAL) {
                    Ok(ServiceEvent::ServiceResolved(info)) => {
                        if tx.blocking_send(ResolvedService::from(&info)).is_err() {
                            break;
                        }
                    }
                    Ok(other) => trace!("mDNS event: {other:?}"),
                    Err(_) if events.is_disconnected() => break,
                    Err(_) => {}
                }
            }

            if let Err(e) = daemon.stop_browse(&service_type) {
                debug!("Failed to stop mDNS browse: {e}");
            }
            if let Err(e) = daemon.shutdown() {
                debug!("Failed to shut down mDNS daemon: {e}");
            }
        });

        Ok(rx)
    }
}
