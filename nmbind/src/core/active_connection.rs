//! Active connections: a profile applied to one or more devices.

use serde::Serialize;
use zvariant::OwnedObjectPath;

use super::connection::Connection;
use super::device::AnyDevice;
use super::dhcp_config::{Dhcp4Config, Dhcp6Config};
use super::ip4_config::{Ip4Config, Ip4ConfigSnapshot};
use super::ip6_config::{Ip6Config, Ip6ConfigSnapshot};
use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::api::models::ActiveConnectionState;
use crate::types::constants::interface;
use crate::Result;

/// An active connection (`org.freedesktop.NetworkManager.Connection.Active`).
#[derive(Debug, Clone)]
pub struct ActiveConnection {
    object: DbusObject,
}

impl ActiveConnection {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::ACTIVE_CONNECTION),
        }
    }

    /// Object path of this active connection.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    fn session(&self) -> Session {
        self.object.session().clone()
    }

    /// Profile this connection was activated from.
    pub async fn connection(&self) -> Result<Option<Connection>> {
        Ok(self
            .object
            .object_property("Connection")
            .await?
            .map(|path| Connection::new(self.session(), path)))
    }

    /// Type-specific object the activation targets (for Wi-Fi, the access
    /// point), or `None`.
    pub async fn specific_object(&self) -> Result<Option<OwnedObjectPath>> {
        self.object.object_property("SpecificObject").await
    }

    /// Profile name.
    pub async fn id(&self) -> Result<String> {
        self.object.property("Id").await
    }

    /// Profile UUID.
    pub async fn uuid(&self) -> Result<String> {
        self.object.property("Uuid").await
    }

    /// Profile type.
    pub async fn connection_type(&self) -> Result<String> {
        self.object.property("Type").await
    }

    /// Devices this connection is active on, each specialized by its type.
    pub async fn devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.object_list_property("Devices").await?;
        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            devices.push(AnyDevice::from_path(self.session(), path).await?);
        }
        Ok(devices)
    }

    /// Activation state.
    pub async fn state(&self) -> Result<ActiveConnectionState> {
        let raw: u32 = self.object.property("State").await?;
        Ok(raw.into())
    }

    /// Raw `NMActivationStateFlags`.
    pub async fn state_flags(&self) -> Result<u32> {
        self.object.property("StateFlags").await
    }

    /// Whether this connection owns the default IPv4 route.
    pub async fn default(&self) -> Result<bool> {
        self.object.property("Default").await
    }

    /// IPv4 configuration, once the connection is activated.
    pub async fn ip4_config(&self) -> Result<Option<Ip4Config>> {
        Ok(self
            .object
            .object_property("Ip4Config")
            .await?
            .map(|path| Ip4Config::new(self.session(), path)))
    }

    /// DHCPv4 lease information.
    pub async fn dhcp4_config(&self) -> Result<Option<Dhcp4Config>> {
        Ok(self
            .object
            .object_property("Dhcp4Config")
            .await?
            .map(|path| Dhcp4Config::new(self.session(), path)))
    }

    /// Whether this connection owns the default IPv6 route.
    pub async fn default6(&self) -> Result<bool> {
        self.object.property("Default6").await
    }

    /// IPv6 configuration, once the connection is activated.
    pub async fn ip6_config(&self) -> Result<Option<Ip6Config>> {
        Ok(self
            .object
            .object_property("Ip6Config")
            .await?
            .map(|path| Ip6Config::new(self.session(), path)))
    }

    /// DHCPv6 lease information.
    pub async fn dhcp6_config(&self) -> Result<Option<Dhcp6Config>> {
        Ok(self
            .object
            .object_property("Dhcp6Config")
            .await?
            .map(|path| Dhcp6Config::new(self.session(), path)))
    }

    /// Whether this is a VPN connection.
    pub async fn vpn(&self) -> Result<bool> {
        self.object.property("Vpn").await
    }

    /// Controller device of this connection, if it is a port.
    pub async fn master(&self) -> Result<Option<AnyDevice>> {
        match self.object.object_property("Master").await? {
            Some(path) => Ok(Some(AnyDevice::from_path(self.session(), path).await?)),
            None => Ok(None),
        }
    }

    /// Reads the connection's identity, state and IP configuration.
    /// Devices are recorded by path.
    pub async fn snapshot(&self) -> ActiveConnectionSnapshot {
        let ip4_config = match best_effort("Ip4Config", self.ip4_config().await).flatten() {
            Some(config) => Some(config.snapshot().await),
            None => None,
        };
        let ip6_config = match best_effort("Ip6Config", self.ip6_config().await).flatten() {
            Some(config) => Some(config.snapshot().await),
            None => None,
        };

        ActiveConnectionSnapshot {
            path: self.path().to_string(),
            id: best_effort("Id", self.id().await),
            uuid: best_effort("Uuid", self.uuid().await),
            connection_type: best_effort("Type", self.connection_type().await),
            state: best_effort("State", self.state().await).map(|s| s.to_string()),
            default: best_effort("Default", self.default().await),
            default6: best_effort("Default6", self.default6().await),
            vpn: best_effort("Vpn", self.vpn().await),
            devices: best_effort("Devices", self.object.object_list_property("Devices").await)
                .map(|paths| paths.iter().map(|p| p.to_string()).collect()),
            ip4_config,
            ip6_config,
        }
    }
}

/// Serializable view of an [`ActiveConnection`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveConnectionSnapshot {
    /// Object path.
    pub path: String,
    /// Profile name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Profile UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Profile type.
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// Activation state, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Owns the default IPv4 route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// Owns the default IPv6 route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default6: Option<bool>,
    /// Is a VPN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn: Option<bool>,
    /// Object paths of the devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
    /// IPv4 configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip4_config: Option<Ip4ConfigSnapshot>,
    /// IPv6 configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip6_config: Option<Ip6ConfigSnapshot>,
}
