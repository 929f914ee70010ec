//! DHCP lease information.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use zvariant::{OwnedObjectPath, OwnedValue};

use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::types::constants::interface;
use crate::util::utils::render_map;
use crate::Result;

/// DHCPv4 lease options (`org.freedesktop.NetworkManager.DHCP4Config`).
#[derive(Debug, Clone)]
pub struct Dhcp4Config {
    object: DbusObject,
}

/// DHCPv6 lease options (`org.freedesktop.NetworkManager.DHCP6Config`).
#[derive(Debug, Clone)]
pub struct Dhcp6Config {
    object: DbusObject,
}

async fn snapshot_of(object: &DbusObject) -> DhcpConfigSnapshot {
    let options: Option<HashMap<String, OwnedValue>> =
        best_effort("Options", object.property("Options").await);
    DhcpConfigSnapshot {
        options: options.as_ref().map(render_map),
    }
}

impl Dhcp4Config {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::DHCP4_CONFIG),
        }
    }

    /// Object path of this lease.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Options and configuration returned by the DHCPv4 server.
    pub async fn options(&self) -> Result<HashMap<String, OwnedValue>> {
        self.object.property("Options").await
    }

    /// Lease options rendered as text.
    pub async fn snapshot(&self) -> DhcpConfigSnapshot {
        snapshot_of(&self.object).await
    }
}

impl Dhcp6Config {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::DHCP6_CONFIG),
        }
    }

    /// Object path of this lease.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Options and configuration returned by the DHCPv6 server.
    pub async fn options(&self) -> Result<HashMap<String, OwnedValue>> {
        self.object.property("Options").await
    }

    /// Lease options rendered as text.
    pub async fn snapshot(&self) -> DhcpConfigSnapshot {
        snapshot_of(&self.object).await
    }
}

/// Serializable view of a DHCP lease.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DhcpConfigSnapshot {
    /// Lease options, sorted by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
}
