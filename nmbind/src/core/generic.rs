//! Devices NetworkManager has no specific support for.

use serde::Serialize;

use super::device::{Device, DeviceSnapshot};
use super::object::{best_effort, DbusObject};
use crate::types::constants::interface;
use crate::Result;

/// A generic device (`org.freedesktop.NetworkManager.Device.Generic`).
#[derive(Debug, Clone)]
pub struct GenericDevice {
    device: Device,
    object: DbusObject,
}

impl GenericDevice {
    pub(crate) fn from_device(device: Device) -> Self {
        let object = device.object().with_interface(interface::DEVICE_GENERIC);
        Self { device, object }
    }

    /// The base device interface.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Hardware address.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property("HwAddress").await
    }

    /// Description of the interface type.
    pub async fn type_description(&self) -> Result<String> {
        self.object.property("TypeDescription").await
    }

    /// Base device snapshot plus the generic properties.
    pub async fn snapshot(&self) -> GenericDeviceSnapshot {
        GenericDeviceSnapshot {
            device: self.device.snapshot().await,
            hw_address: best_effort("HwAddress", self.hw_address().await),
            type_description: best_effort("TypeDescription", self.type_description().await),
        }
    }
}

/// Serializable view of a [`GenericDevice`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericDeviceSnapshot {
    /// Base device fields.
    #[serde(flatten)]
    pub device: DeviceSnapshot,
    /// Hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
    /// Description of the interface type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_description: Option<String>,
}
