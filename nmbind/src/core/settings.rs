//! The settings service: saved profiles and the persistent hostname.

use serde::Serialize;
use zvariant::OwnedObjectPath;

use super::connection::{Connection, ConnectionSnapshot};
use super::object::{arg, best_effort, DbusObject};
use super::session::Session;
use crate::api::models::ConnectionSettings;
use crate::types::constants::interface;
use crate::Result;

/// The settings service (`org.freedesktop.NetworkManager.Settings`).
#[derive(Debug, Clone)]
pub struct Settings {
    object: DbusObject,
}

impl Settings {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::SETTINGS),
        }
    }

    /// Object path of the settings service.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    fn connection(&self, path: OwnedObjectPath) -> Connection {
        Connection::new(self.object.session().clone(), path)
    }

    /// All saved profiles visible to the caller.
    pub async fn list_connections(&self) -> Result<Vec<Connection>> {
        let paths: Vec<OwnedObjectPath> =
            self.object.call_one("ListConnections", Vec::new()).await?;
        Ok(paths.into_iter().map(|p| self.connection(p)).collect())
    }

    /// Looks up a profile by UUID.
    pub async fn get_connection_by_uuid(&self, uuid: &str) -> Result<Connection> {
        let path = self
            .object
            .call_one("GetConnectionByUuid", vec![arg(uuid)?])
            .await?;
        Ok(self.connection(path))
    }

    /// Adds a profile and saves it to disk.
    pub async fn add_connection(&self, settings: ConnectionSettings) -> Result<Connection> {
        let path = self
            .object
            .call_one("AddConnection", vec![arg(settings)?])
            .await?;
        Ok(self.connection(path))
    }

    /// Adds a profile without saving it to disk.
    pub async fn add_connection_unsaved(&self, settings: ConnectionSettings) -> Result<Connection> {
        let path = self
            .object
            .call_one("AddConnectionUnsaved", vec![arg(settings)?])
            .await?;
        Ok(self.connection(path))
    }

    /// Loads or reloads the given profile files. Returns whether every file
    /// loaded, and the files that failed.
    pub async fn load_connections(&self, filenames: Vec<String>) -> Result<(bool, Vec<String>)> {
        self.object
            .call_two("LoadConnections", vec![arg(filenames)?])
            .await
    }

    /// Reloads every profile from disk.
    pub async fn reload_connections(&self) -> Result<bool> {
        self.object.call_one("ReloadConnections", Vec::new()).await
    }

    /// Saves the persistent hostname.
    pub async fn save_hostname(&self, hostname: &str) -> Result<()> {
        self.object
            .call_unit("SaveHostname", vec![arg(hostname)?])
            .await
    }

    /// Saved profiles, as a property.
    pub async fn connections(&self) -> Result<Vec<Connection>> {
        let paths = self.object.object_list_property("Connections").await?;
        Ok(paths.into_iter().map(|p| self.connection(p)).collect())
    }

    /// Persistent hostname.
    pub async fn hostname(&self) -> Result<String> {
        self.object.property("Hostname").await
    }

    /// Whether profiles can be added or modified.
    pub async fn can_modify(&self) -> Result<bool> {
        self.object.property("CanModify").await
    }

    /// Reads the service properties and a snapshot of every profile.
    pub async fn snapshot(&self) -> SettingsSnapshot {
        let connections = match best_effort("ListConnections", self.list_connections().await) {
            Some(list) => {
                let mut snapshots = Vec::with_capacity(list.len());
                for connection in &list {
                    snapshots.push(connection.snapshot().await);
                }
                Some(snapshots)
            }
            None => None,
        };
        SettingsSnapshot {
            hostname: best_effort("Hostname", self.hostname().await),
            can_modify: best_effort("CanModify", self.can_modify().await),
            connections,
        }
    }
}

/// Serializable view of [`Settings`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsSnapshot {
    /// Persistent hostname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Whether profiles can be modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_modify: Option<bool>,
    /// Saved profiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionSnapshot>>,
}
