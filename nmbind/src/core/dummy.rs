//! Dummy devices.

use serde::Serialize;

use super::device::{Device, DeviceSnapshot};
use super::object::{best_effort, DbusObject};
use crate::types::constants::interface;
use crate::Result;

/// A dummy device (`org.freedesktop.NetworkManager.Device.Dummy`).
#[derive(Debug, Clone)]
pub struct DummyDevice {
    device: Device,
    object: DbusObject,
}

impl DummyDevice {
    pub(crate) fn from_device(device: Device) -> Self {
        let object = device.object().with_interface(interface::DEVICE_DUMMY);
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

    /// Base device snapshot plus the hardware address.
    pub async fn snapshot(&self) -> DummyDeviceSnapshot {
        DummyDeviceSnapshot {
            device: self.device.snapshot().await,
            hw_address: best_effort("HwAddress", self.hw_address().await),
        }
    }
}

/// Serializable view of a [`DummyDevice`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DummyDeviceSnapshot {
    /// Base device fields.
    #[serde(flatten)]
    pub device: DeviceSnapshot,
    /// Hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Session;
    use crate::dbus::mock::MockTransport;
    use std::sync::Arc;
    use zvariant::OwnedObjectPath;

    const DEV: &str = "/org/freedesktop/NetworkManager/Devices/9";

    #[tokio::test]
    async fn hw_address_reads_dummy_interface() {
        let mock = Arc::new(
            MockTransport::new()
                .with_property(DEV, interface::DEVICE_DUMMY, "HwAddress", "6e:1f:8a:00:00:01")
                .with_property(DEV, interface::DEVICE, "Interface", "dummy0"),
        );
        let dummy = DummyDevice::from_device(Device::new(
            Session::new(mock, 10),
            OwnedObjectPath::try_from(DEV).unwrap(),
        ));

        assert_eq!(dummy.hw_address().await.unwrap(), "6e:1f:8a:00:00:01");

        let json = serde_json::to_value(dummy.snapshot().await).unwrap();
        assert_eq!(json["Interface"], "dummy0");
        assert_eq!(json["HwAddress"], "6e:1f:8a:00:00:01");
    }
}
