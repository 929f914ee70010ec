//! The base device wrapper and the device-type factory.

use serde::Serialize;
use std::collections::HashMap;
use zvariant::{OwnedObjectPath, OwnedValue};

use super::active_connection::ActiveConnection;
use super::connection::{Connection, ConnectionSnapshot};
use super::dhcp_config::{Dhcp4Config, Dhcp6Config, DhcpConfigSnapshot};
use super::dummy::{DummyDevice, DummyDeviceSnapshot};
use super::generic::{GenericDevice, GenericDeviceSnapshot};
use super::ip4_config::{Ip4Config, Ip4ConfigSnapshot};
use super::ip6_config::Ip6Config;
use super::ip_tunnel::{IpTunnelDevice, IpTunnelDeviceSnapshot};
use super::object::{arg, best_effort, DbusObject};
use super::session::Session;
use super::statistics::DeviceStatistics;
use super::wired::{WiredDevice, WiredDeviceSnapshot};
use super::wireless::{WirelessDevice, WirelessDeviceSnapshot};
use crate::api::models::{
    ConnectionSettings, Connectivity, DeviceState, DeviceStateReason, DeviceType,
};
use crate::types::constants::interface;
use crate::Result;

/// A network device (`org.freedesktop.NetworkManager.Device`).
///
/// Every getter performs one remote read; nothing is cached. Use
/// [`AnyDevice`] to get the type-specific interface as well.
#[derive(Debug, Clone)]
pub struct Device {
    object: DbusObject,
}

impl Device {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::DEVICE),
        }
    }

    /// Object path of this device.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    pub(crate) fn object(&self) -> &DbusObject {
        &self.object
    }

    fn session(&self) -> Session {
        self.object.session().clone()
    }

    /// Attempts to update the configuration of a connected device without
    /// deactivating it.
    pub async fn reapply(
        &self,
        settings: ConnectionSettings,
        version_id: u64,
        flags: u32,
    ) -> Result<()> {
        self.object
            .call_unit(
                "Reapply",
                vec![arg(settings)?, arg(version_id)?, arg(flags)?],
            )
            .await
    }

    /// Returns the currently applied connection settings and their version id.
    pub async fn get_applied_connection(&self, flags: u32) -> Result<(ConnectionSettings, u64)> {
        self.object
            .call_two("GetAppliedConnection", vec![arg(flags)?])
            .await
    }

    /// Disconnects the device and prevents it from automatically activating
    /// further connections without user intervention.
    pub async fn disconnect(&self) -> Result<()> {
        self.object.call_unit("Disconnect", Vec::new()).await
    }

    /// Deletes a software device.
    pub async fn delete(&self) -> Result<()> {
        self.object.call_unit("Delete", Vec::new()).await
    }

    /// Operating-system specific transient device hardware identifier.
    pub async fn udi(&self) -> Result<String> {
        self.object.property("Udi").await
    }

    /// Name of the device's control (and often data) interface.
    pub async fn interface(&self) -> Result<String> {
        self.object.property("Interface").await
    }

    /// Name of the device's data interface when available.
    pub async fn ip_interface(&self) -> Result<String> {
        self.object.property("IpInterface").await
    }

    /// Driver handling the device.
    pub async fn driver(&self) -> Result<String> {
        self.object.property("Driver").await
    }

    /// Version of the driver handling the device.
    pub async fn driver_version(&self) -> Result<String> {
        self.object.property("DriverVersion").await
    }

    /// Firmware version of the device.
    pub async fn firmware_version(&self) -> Result<String> {
        self.object.property("FirmwareVersion").await
    }

    /// Raw `NMDeviceCapabilities` flags.
    pub async fn capabilities(&self) -> Result<u32> {
        self.object.property("Capabilities").await
    }

    /// Current state of the device.
    pub async fn state(&self) -> Result<DeviceState> {
        let raw: u32 = self.object.property("State").await?;
        Ok(raw.into())
    }

    /// Current state and the reason for entering it.
    pub async fn state_reason(&self) -> Result<DeviceStateReason> {
        let (state, reason): (u32, u32) = self.object.property("StateReason").await?;
        Ok(DeviceStateReason {
            state: state.into(),
            reason,
        })
    }

    /// Active connection currently using this device.
    pub async fn active_connection(&self) -> Result<Option<ActiveConnection>> {
        Ok(self
            .object
            .object_property("ActiveConnection")
            .await?
            .map(|path| ActiveConnection::new(self.session(), path)))
    }

    /// IPv4 configuration, only valid while the device is activated.
    pub async fn ip4_config(&self) -> Result<Option<Ip4Config>> {
        Ok(self
            .object
            .object_property("Ip4Config")
            .await?
            .map(|path| Ip4Config::new(self.session(), path)))
    }

    /// DHCPv4 lease information, only valid while the device is activated.
    pub async fn dhcp4_config(&self) -> Result<Option<Dhcp4Config>> {
        Ok(self
            .object
            .object_property("Dhcp4Config")
            .await?
            .map(|path| Dhcp4Config::new(self.session(), path)))
    }

    /// IPv6 configuration, only valid while the device is activated.
    pub async fn ip6_config(&self) -> Result<Option<Ip6Config>> {
        Ok(self
            .object
            .object_property("Ip6Config")
            .await?
            .map(|path| Ip6Config::new(self.session(), path)))
    }

    /// DHCPv6 lease information, only valid while the device is activated.
    pub async fn dhcp6_config(&self) -> Result<Option<Dhcp6Config>> {
        Ok(self
            .object
            .object_property("Dhcp6Config")
            .await?
            .map(|path| Dhcp6Config::new(self.session(), path)))
    }

    /// Whether the device is managed by NetworkManager.
    pub async fn managed(&self) -> Result<bool> {
        self.object.property("Managed").await
    }

    /// Changes whether the device is managed by NetworkManager.
    pub async fn set_managed(&self, managed: bool) -> Result<()> {
        self.object.set_property("Managed", managed).await
    }

    /// Whether the device may autoconnect.
    pub async fn autoconnect(&self) -> Result<bool> {
        self.object.property("Autoconnect").await
    }

    /// Changes whether the device may autoconnect.
    pub async fn set_autoconnect(&self, autoconnect: bool) -> Result<()> {
        self.object.set_property("Autoconnect", autoconnect).await
    }

    /// Whether the device is missing firmware it needs.
    pub async fn firmware_missing(&self) -> Result<bool> {
        self.object.property("FirmwareMissing").await
    }

    /// Whether the device plugin is not installed.
    pub async fn nm_plugin_missing(&self) -> Result<bool> {
        self.object.property("NmPluginMissing").await
    }

    /// The general type of the network device.
    pub async fn device_type(&self) -> Result<DeviceType> {
        let raw: u32 = self.object.property("DeviceType").await?;
        Ok(raw.into())
    }

    /// Connections that could be activated on this device.
    pub async fn available_connections(&self) -> Result<Vec<Connection>> {
        Ok(self
            .object
            .object_list_property("AvailableConnections")
            .await?
            .into_iter()
            .map(|path| Connection::new(self.session(), path))
            .collect())
    }

    /// Identifier of the physical port, if the device has one.
    pub async fn physical_port_id(&self) -> Result<String> {
        self.object.property("PhysicalPortId").await
    }

    /// Device MTU.
    pub async fn mtu(&self) -> Result<u32> {
        self.object.property("Mtu").await
    }

    /// Raw `NMMetered` value.
    pub async fn metered(&self) -> Result<u32> {
        self.object.property("Metered").await
    }

    /// LLDP neighbors, one dictionary per neighbor.
    pub async fn lldp_neighbors(&self) -> Result<Vec<HashMap<String, OwnedValue>>> {
        self.object.property("LldpNeighbors").await
    }

    /// Whether the device exists, as opposed to a placeholder for a
    /// device that could be created.
    pub async fn real(&self) -> Result<bool> {
        self.object.property("Real").await
    }

    /// IPv4 connectivity of this device.
    pub async fn ip4_connectivity(&self) -> Result<Connectivity> {
        let raw: u32 = self.object.property("Ip4Connectivity").await?;
        Ok(raw.into())
    }

    /// Traffic counters of this device.
    pub fn statistics(&self) -> DeviceStatistics {
        DeviceStatistics::new(self.object.with_interface(interface::DEVICE_STATISTICS))
    }

    /// Reads the device's commonly used properties. Properties that fail to
    /// read are left out.
    pub async fn snapshot(&self) -> DeviceSnapshot {
        let ip4_config = match best_effort("Ip4Config", self.ip4_config().await).flatten() {
            Some(config) => Some(config.snapshot().await),
            None => None,
        };
        let dhcp4_config = match best_effort("Dhcp4Config", self.dhcp4_config().await).flatten() {
            Some(config) => Some(config.snapshot().await),
            None => None,
        };
        let available_connections =
            match best_effort("AvailableConnections", self.available_connections().await) {
                Some(connections) => {
                    let mut snapshots = Vec::with_capacity(connections.len());
                    for connection in &connections {
                        snapshots.push(connection.snapshot().await);
                    }
                    Some(snapshots)
                }
                None => None,
            };

        DeviceSnapshot {
            path: self.path().to_string(),
            interface: best_effort("Interface", self.interface().await),
            ip_interface: best_effort("IpInterface", self.ip_interface().await),
            driver: best_effort("Driver", self.driver().await),
            state: best_effort("State", self.state().await).map(|s| s.to_string()),
            device_type: best_effort("DeviceType", self.device_type().await)
                .map(|t| t.to_string()),
            mtu: best_effort("Mtu", self.mtu().await),
            managed: best_effort("Managed", self.managed().await),
            ip4_config,
            dhcp4_config,
            available_connections,
        }
    }
}

/// Serializable view of a [`Device`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceSnapshot {
    /// Object path.
    pub path: String,
    /// Control interface name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Data interface name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_interface: Option<String>,
    /// Driver name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Device state, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Device type, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// MTU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Whether NetworkManager manages the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed: Option<bool>,
    /// IPv4 configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip4_config: Option<Ip4ConfigSnapshot>,
    /// DHCPv4 options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp4_config: Option<DhcpConfigSnapshot>,
    /// Connections that could be activated on the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_connections: Option<Vec<ConnectionSnapshot>>,
}

/// A device bound to its most specific interface.
///
/// Each specialized wrapper embeds the base [`Device`], reachable through
/// [`AnyDevice::device`] or the wrapper's own `device()` accessor.
#[derive(Debug, Clone)]
pub enum AnyDevice {
    /// Wired Ethernet device.
    Wired(WiredDevice),
    /// Wi-Fi device.
    Wireless(WirelessDevice),
    /// Generic device.
    Generic(GenericDevice),
    /// Dummy device.
    Dummy(DummyDevice),
    /// IP tunnel device.
    IpTunnel(IpTunnelDevice),
    /// Any other device type, bound to the base interface only.
    Other(Device),
}

impl AnyDevice {
    /// Reads `DeviceType` of the device at `path` once and binds the
    /// matching wrapper.
    pub(crate) async fn from_path(session: Session, path: OwnedObjectPath) -> Result<Self> {
        let device = Device::new(session, path);
        let kind = device.device_type().await?;
        Ok(Self::specialize(device, kind))
    }

    /// Wraps `device` in the wrapper for `kind`.
    ///
    /// Types without a dedicated wrapper become [`AnyDevice::Other`].
    pub fn specialize(device: Device, kind: DeviceType) -> Self {
        match kind {
            DeviceType::Ethernet => Self::Wired(WiredDevice::from_device(device)),
            DeviceType::Wifi => Self::Wireless(WirelessDevice::from_device(device)),
            DeviceType::Generic => Self::Generic(GenericDevice::from_device(device)),
            DeviceType::Dummy => Self::Dummy(DummyDevice::from_device(device)),
            DeviceType::IpTunnel => Self::IpTunnel(IpTunnelDevice::from_device(device)),
            _ => Self::Other(device),
        }
    }

    /// The base device interface.
    pub fn device(&self) -> &Device {
        match self {
            Self::Wired(d) => d.device(),
            Self::Wireless(d) => d.device(),
            Self::Generic(d) => d.device(),
            Self::Dummy(d) => d.device(),
            Self::IpTunnel(d) => d.device(),
            Self::Other(d) => d,
        }
    }

    /// Object path of this device.
    pub fn path(&self) -> &OwnedObjectPath {
        self.device().path()
    }

    /// Snapshot of the specialized wrapper.
    pub async fn snapshot(&self) -> AnyDeviceSnapshot {
        match self {
            Self::Wired(d) => AnyDeviceSnapshot::Wired(d.snapshot().await),
            Self::Wireless(d) => AnyDeviceSnapshot::Wireless(d.snapshot().await),
            Self::Generic(d) => AnyDeviceSnapshot::Generic(d.snapshot().await),
            Self::Dummy(d) => AnyDeviceSnapshot::Dummy(d.snapshot().await),
            Self::IpTunnel(d) => AnyDeviceSnapshot::IpTunnel(d.snapshot().await),
            Self::Other(d) => AnyDeviceSnapshot::Other(d.snapshot().await),
        }
    }
}

/// Serializable view of an [`AnyDevice`]. Serializes as the inner snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnyDeviceSnapshot {
    /// Wired device.
    Wired(WiredDeviceSnapshot),
    /// Wi-Fi device.
    Wireless(WirelessDeviceSnapshot),
    /// Generic device.
    Generic(GenericDeviceSnapshot),
    /// Dummy device.
    Dummy(DummyDeviceSnapshot),
    /// IP tunnel device.
    IpTunnel(IpTunnelDeviceSnapshot),
    /// Other device.
    Other(DeviceSnapshot),
}
