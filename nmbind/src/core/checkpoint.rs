//! Configuration checkpoints.

use serde::Serialize;
use zvariant::OwnedObjectPath;

use super::device::AnyDevice;
use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::types::constants::interface;
use crate::Result;

/// A configuration checkpoint (`org.freedesktop.NetworkManager.Checkpoint`).
///
/// Created with
/// [`NetworkManager::checkpoint_create`](crate::NetworkManager::checkpoint_create).
#[derive(Debug, Clone)]
pub struct Checkpoint {
    object: DbusObject,
}

impl Checkpoint {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::CHECKPOINT),
        }
    }

    /// Object path of this checkpoint.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Devices covered by the checkpoint, each specialized by its type.
    pub async fn devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.object_list_property("Devices").await?;
        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            devices.push(AnyDevice::from_path(self.object.session().clone(), path).await?);
        }
        Ok(devices)
    }

    /// `CLOCK_BOOTTIME` milliseconds at which the checkpoint was created.
    pub async fn created(&self) -> Result<i64> {
        self.object.property("Created").await
    }

    /// Seconds until automatic rollback, `0` if disabled.
    pub async fn rollback_timeout(&self) -> Result<u32> {
        self.object.property("RollbackTimeout").await
    }

    /// Reads the checkpoint. Devices are recorded by path.
    pub async fn snapshot(&self) -> CheckpointSnapshot {
        CheckpointSnapshot {
            path: self.path().to_string(),
            devices: best_effort("Devices", self.object.object_list_property("Devices").await)
                .map(|paths| paths.iter().map(|p| p.to_string()).collect()),
            created: best_effort("Created", self.created().await),
            rollback_timeout: best_effort("RollbackTimeout", self.rollback_timeout().await),
        }
    }
}

/// Serializable view of a [`Checkpoint`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckpointSnapshot {
    /// Object path.
    pub path: String,
    /// Object paths of the covered devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Rollback timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_timeout: Option<u32>,
}
