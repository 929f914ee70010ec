//! IP tunnel devices.

use serde::Serialize;

use super::device::{AnyDevice, Device, DeviceSnapshot};
use super::object::{best_effort, DbusObject};
use crate::types::constants::interface;
use crate::Result;

/// An IP tunnel device (`org.freedesktop.NetworkManager.Device.IPTunnel`).
#[derive(Debug, Clone)]
pub struct IpTunnelDevice {
    device: Device,
    object: DbusObject,
}

impl IpTunnelDevice {
    pub(crate) fn from_device(device: Device) -> Self {
        let object = device.object().with_interface(interface::DEVICE_IP_TUNNEL);
        Self { device, object }
    }

    /// The base device interface.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Raw tunnel mode (`NMIPTunnelMode`).
    pub async fn mode(&self) -> Result<u32> {
        self.object.property("Mode").await
    }

    /// Device the tunnel is bound to, specialized by its type.
    pub async fn parent(&self) -> Result<Option<AnyDevice>> {
        match self.object.object_property("Parent").await? {
            Some(path) => Ok(Some(
                AnyDevice::from_path(self.object.session().clone(), path).await?,
            )),
            None => Ok(None),
        }
    }

    /// Local endpoint of the tunnel.
    pub async fn local(&self) -> Result<String> {
        self.object.property("Local").await
    }

    /// Remote endpoint of the tunnel.
    pub async fn remote(&self) -> Result<String> {
        self.object.property("Remote").await
    }

    /// TTL assigned to tunneled packets, `0` to inherit.
    pub async fn ttl(&self) -> Result<u8> {
        self.object.property("Ttl").await
    }

    /// Type of service (IPv4) or traffic class (IPv6).
    pub async fn tos(&self) -> Result<u8> {
        self.object.property("Tos").await
    }

    /// Whether path MTU discovery is enabled on the tunnel.
    pub async fn path_mtu_discovery(&self) -> Result<bool> {
        self.object.property("PathMtuDiscovery").await
    }

    /// Key used for incoming packets.
    pub async fn input_key(&self) -> Result<String> {
        self.object.property("InputKey").await
    }

    /// Key used for outgoing packets.
    pub async fn output_key(&self) -> Result<String> {
        self.object.property("OutputKey").await
    }

    /// IPv6 encapsulation limit.
    pub async fn encapsulation_limit(&self) -> Result<u8> {
        self.object.property("EncapsulationLimit").await
    }

    /// IPv6 flow label.
    pub async fn flow_label(&self) -> Result<u32> {
        self.object.property("FlowLabel").await
    }

    /// Raw tunnel flags.
    pub async fn flags(&self) -> Result<u32> {
        self.object.property("Flags").await
    }

    /// Base device snapshot plus the tunnel properties. The parent is
    /// recorded by path only.
    pub async fn snapshot(&self) -> IpTunnelDeviceSnapshot {
        IpTunnelDeviceSnapshot {
            device: self.device.snapshot().await,
            mode: best_effort("Mode", self.mode().await),
            parent: best_effort("Parent", self.object.object_property("Parent").await)
                .flatten()
                .map(|p| p.to_string()),
            local: best_effort("Local", self.local().await),
            remote: best_effort("Remote", self.remote().await),
            ttl: best_effort("Ttl", self.ttl().await),
            tos: best_effort("Tos", self.tos().await),
            path_mtu_discovery: best_effort("PathMtuDiscovery", self.path_mtu_discovery().await),
        }
    }
}

/// Serializable view of an [`IpTunnelDevice`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpTunnelDeviceSnapshot {
    /// Base device fields.
    #[serde(flatten)]
    pub device: DeviceSnapshot,
    /// Raw tunnel mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    /// Object path of the parent device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Local endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    /// Remote endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// TTL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u8>,
    /// Type of service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tos: Option<u8>,
    /// Path MTU discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_mtu_discovery: Option<bool>,
}
