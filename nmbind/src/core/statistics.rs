//! Per-device traffic counters.

use serde::Serialize;
use zvariant::OwnedObjectPath;

use super::object::{best_effort, DbusObject};
use crate::Result;

/// Traffic statistics of a device
/// (`org.freedesktop.NetworkManager.Device.Statistics`).
///
/// Lives on the same object path as the device. Counters are only updated
/// while [`refresh_rate_ms`](Self::refresh_rate_ms) is non-zero.
#[derive(Debug, Clone)]
pub struct DeviceStatistics {
    object: DbusObject,
}

impl DeviceStatistics {
    pub(crate) fn new(object: DbusObject) -> Self {
        Self { object }
    }

    /// Object path of the device.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Refresh rate of the counters in milliseconds, `0` when disabled.
    pub async fn refresh_rate_ms(&self) -> Result<u32> {
        self.object.property("RefreshRateMs").await
    }

    /// Sets the refresh rate of the counters in milliseconds.
    pub async fn set_refresh_rate_ms(&self, rate: u32) -> Result<()> {
        self.object.set_property("RefreshRateMs", rate).await
    }

    /// Bytes transmitted.
    pub async fn tx_bytes(&self) -> Result<u64> {
        self.object.property("TxBytes").await
    }

    /// Bytes received.
    pub async fn rx_bytes(&self) -> Result<u64> {
        self.object.property("RxBytes").await
    }

    /// Current counters.
    pub async fn snapshot(&self) -> DeviceStatisticsSnapshot {
        DeviceStatisticsSnapshot {
            refresh_rate_ms: best_effort("RefreshRateMs", self.refresh_rate_ms().await),
            tx_bytes: best_effort("TxBytes", self.tx_bytes().await),
            rx_bytes: best_effort("RxBytes", self.rx_bytes().await),
        }
    }
}

/// Serializable view of [`DeviceStatistics`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceStatisticsSnapshot {
    /// Refresh rate in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate_ms: Option<u32>,
    /// Bytes transmitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bytes: Option<u64>,
    /// Bytes received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_bytes: Option<u64>,
}
