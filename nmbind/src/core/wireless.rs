//! Wi-Fi devices.

use serde::Serialize;
use std::collections::HashMap;
use zvariant::{OwnedObjectPath, OwnedValue};

use super::access_point::{AccessPoint, AccessPointSnapshot};
use super::device::{Device, DeviceSnapshot};
use super::object::{arg, best_effort, present, DbusObject};
use crate::api::models::WifiMode;
use crate::types::constants::interface;
use crate::Result;

/// A Wi-Fi device (`org.freedesktop.NetworkManager.Device.Wireless`).
#[derive(Debug, Clone)]
pub struct WirelessDevice {
    device: Device,
    object: DbusObject,
}

impl WirelessDevice {
    pub(crate) fn from_device(device: Device) -> Self {
        let object = device.object().with_interface(interface::DEVICE_WIRELESS);
        Self { device, object }
    }

    /// The base device interface.
    pub fn device(&self) -> &Device {
        &self.device
    }

    fn access_points_from(&self, paths: Vec<OwnedObjectPath>) -> Vec<AccessPoint> {
        paths
            .into_iter()
            .filter_map(present)
            .map(|path| AccessPoint::new(self.object.session().clone(), path))
            .collect()
    }

    /// Access points visible to this device, hidden networks excluded.
    pub async fn get_access_points(&self) -> Result<Vec<AccessPoint>> {
        let paths = self.object.call_one("GetAccessPoints", Vec::new()).await?;
        Ok(self.access_points_from(paths))
    }

    /// Access points visible to this device, hidden networks included.
    pub async fn get_all_access_points(&self) -> Result<Vec<AccessPoint>> {
        let paths = self
            .object
            .call_one("GetAllAccessPoints", Vec::new())
            .await?;
        Ok(self.access_points_from(paths))
    }

    /// Requests a scan. `options` may carry `ssids` (`aay`) to probe for
    /// specific networks.
    ///
    /// Errors are returned to the caller, including the daemon refusing a
    /// scan because one ran too recently.
    pub async fn request_scan(&self, options: HashMap<String, OwnedValue>) -> Result<()> {
        self.object
            .call_unit("RequestScan", vec![arg(options)?])
            .await
    }

    /// Active hardware address.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property("HwAddress").await
    }

    /// Permanent hardware address.
    pub async fn perm_hw_address(&self) -> Result<String> {
        self.object.property("PermHwAddress").await
    }

    /// Operating mode of the device.
    pub async fn mode(&self) -> Result<WifiMode> {
        let raw: u32 = self.object.property("Mode").await?;
        Ok(raw.into())
    }

    /// Bit rate in kb/s.
    pub async fn bitrate(&self) -> Result<u32> {
        self.object.property("Bitrate").await
    }

    /// Access points visible to this device.
    pub async fn access_points(&self) -> Result<Vec<AccessPoint>> {
        let paths = self.object.object_list_property("AccessPoints").await?;
        Ok(self.access_points_from(paths))
    }

    /// Access point currently in use.
    pub async fn active_access_point(&self) -> Result<Option<AccessPoint>> {
        Ok(self
            .object
            .object_property("ActiveAccessPoint")
            .await?
            .map(|path| AccessPoint::new(self.object.session().clone(), path)))
    }

    /// Raw `NMDeviceWifiCapabilities` flags.
    pub async fn wireless_capabilities(&self) -> Result<u32> {
        self.object.property("WirelessCapabilities").await
    }

    /// `CLOCK_BOOTTIME` milliseconds of the last finished scan, `-1` if
    /// none has finished yet.
    pub async fn last_scan(&self) -> Result<i64> {
        self.object.property("LastScan").await
    }

    /// Base device snapshot plus the Wi-Fi properties and visible access
    /// points.
    pub async fn snapshot(&self) -> WirelessDeviceSnapshot {
        let access_points = match best_effort("AccessPoints", self.access_points().await) {
            Some(aps) => {
                let mut snapshots = Vec::with_capacity(aps.len());
                for ap in &aps {
                    snapshots.push(ap.snapshot().await);
                }
                Some(snapshots)
            }
            None => None,
        };

        WirelessDeviceSnapshot {
            device: self.device.snapshot().await,
            hw_address: best_effort("HwAddress", self.hw_address().await),
            mode: best_effort("Mode", self.mode().await).map(|m| m.to_string()),
            bitrate: best_effort("Bitrate", self.bitrate().await),
            access_points,
        }
    }
}

/// Serializable view of a [`WirelessDevice`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WirelessDeviceSnapshot {
    /// Base device fields.
    #[serde(flatten)]
    pub device: DeviceSnapshot,
    /// Active hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
    /// Operating mode, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Bit rate in kb/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    /// Visible access points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_points: Option<Vec<AccessPointSnapshot>>,
}
