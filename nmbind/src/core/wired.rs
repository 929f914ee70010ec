//! Wired Ethernet devices.

use serde::Serialize;

use super::device::{Device, DeviceSnapshot};
use super::object::{best_effort, DbusObject};
use crate::types::constants::interface;
use crate::Result;

/// A wired Ethernet device (`org.freedesktop.NetworkManager.Device.Wired`).
#[derive(Debug, Clone)]
pub struct WiredDevice {
    device: Device,
    object: DbusObject,
}

impl WiredDevice {
    pub(crate) fn from_device(device: Device) -> Self {
        let object = device.object().with_interface(interface::DEVICE_WIRED);
        Self { device, object }
    }

    /// The base device interface.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Active hardware address.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property("HwAddress").await
    }

    /// Permanent hardware address.
    pub async fn perm_hw_address(&self) -> Result<String> {
        self.object.property("PermHwAddress").await
    }

    /// Design speed in Mb/s.
    pub async fn speed(&self) -> Result<u32> {
        self.object.property("Speed").await
    }

    /// IBM s390 subchannels.
    pub async fn s390_subchannels(&self) -> Result<Vec<String>> {
        self.object.property("S390Subchannels").await
    }

    /// Whether a carrier is detected.
    pub async fn carrier(&self) -> Result<bool> {
        self.object.property("Carrier").await
    }

    /// Base device snapshot plus the wired properties.
    pub async fn snapshot(&self) -> WiredDeviceSnapshot {
        WiredDeviceSnapshot {
            device: self.device.snapshot().await,
            hw_address: best_effort("HwAddress", self.hw_address().await),
            perm_hw_address: best_effort("PermHwAddress", self.perm_hw_address().await),
            speed: best_effort("Speed", self.speed().await),
            carrier: best_effort("Carrier", self.carrier().await),
        }
    }
}

/// Serializable view of a [`WiredDevice`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WiredDeviceSnapshot {
    /// Base device fields.
    #[serde(flatten)]
    pub device: DeviceSnapshot,
    /// Active hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
    /// Permanent hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_hw_address: Option<String>,
    /// Design speed in Mb/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    /// Carrier state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<bool>,
}
