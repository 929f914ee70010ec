//! Saved connection profiles.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use zvariant::{OwnedObjectPath, OwnedValue};

use super::object::{arg, best_effort, DbusObject};
use super::session::Session;
use crate::api::models::ConnectionSettings;
use crate::types::constants::interface;
use crate::util::utils::{connection_field, render_settings};
use crate::Result;

/// A saved connection profile
/// (`org.freedesktop.NetworkManager.Settings.Connection`).
#[derive(Debug, Clone)]
pub struct Connection {
    object: DbusObject,
}

impl Connection {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::CONNECTION),
        }
    }

    /// Object path of this profile.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Replaces the profile's settings and saves them to disk.
    pub async fn update(&self, settings: ConnectionSettings) -> Result<()> {
        self.object.call_unit("Update", vec![arg(settings)?]).await
    }

    /// Replaces the profile's settings without saving them to disk.
    pub async fn update_unsaved(&self, settings: ConnectionSettings) -> Result<()> {
        self.object
            .call_unit("UpdateUnsaved", vec![arg(settings)?])
            .await
    }

    /// Deletes the profile.
    pub async fn delete(&self) -> Result<()> {
        self.object.call_unit("Delete", Vec::new()).await
    }

    /// Returns the profile's settings. Secrets are not included.
    pub async fn get_settings(&self) -> Result<ConnectionSettings> {
        self.object.call_one("GetSettings", Vec::new()).await
    }

    /// Returns the secrets of one setting (for example
    /// `"802-11-wireless-security"`). May prompt a secret agent.
    pub async fn get_secrets(&self, setting_name: &str) -> Result<ConnectionSettings> {
        self.object
            .call_one("GetSecrets", vec![arg(setting_name)?])
            .await
    }

    /// Clears the profile's secrets from storage.
    pub async fn clear_secrets(&self) -> Result<()> {
        self.object.call_unit("ClearSecrets", Vec::new()).await
    }

    /// Saves unsaved changes to disk.
    pub async fn save(&self) -> Result<()> {
        self.object.call_unit("Save", Vec::new()).await
    }

    /// Updates the profile with explicit `NMSettingsUpdate2Flags` and
    /// extra arguments. Returns the daemon's result dictionary.
    pub async fn update2(
        &self,
        settings: ConnectionSettings,
        flags: u32,
        args: HashMap<String, OwnedValue>,
    ) -> Result<HashMap<String, OwnedValue>> {
        self.object
            .call_one("Update2", vec![arg(settings)?, arg(flags)?, arg(args)?])
            .await
    }

    /// Whether the profile has changes not yet saved to disk.
    pub async fn unsaved(&self) -> Result<bool> {
        self.object.property("Unsaved").await
    }

    /// Raw `NMSettingsConnectionFlags`.
    pub async fn flags(&self) -> Result<u32> {
        self.object.property("Flags").await
    }

    /// File the profile is stored in, empty if none.
    pub async fn filename(&self) -> Result<String> {
        self.object.property("Filename").await
    }

    /// Reads the profile, with its identity pulled out of the `connection`
    /// setting and every setting rendered as text.
    pub async fn snapshot(&self) -> ConnectionSnapshot {
        let settings = best_effort("GetSettings", self.get_settings().await);
        ConnectionSnapshot {
            path: self.path().to_string(),
            id: settings.as_ref().and_then(|s| connection_field(s, "id")),
            uuid: settings.as_ref().and_then(|s| connection_field(s, "uuid")),
            connection_type: settings.as_ref().and_then(|s| connection_field(s, "type")),
            unsaved: best_effort("Unsaved", self.unsaved().await),
            filename: best_effort("Filename", self.filename().await),
            settings: settings.as_ref().map(render_settings),
        }
    }
}

/// Serializable view of a [`Connection`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionSnapshot {
    /// Object path.
    pub path: String,
    /// Human readable profile name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Profile UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Profile type, for example `802-3-ethernet`.
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// Unsaved changes pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsaved: Option<bool>,
    /// Backing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Every setting, rendered as text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbus::mock::{owned, MockTransport};
    use std::sync::Arc;

    const CONN: &str = "/org/freedesktop/NetworkManager/Settings/4";
    const IFACE: &str = "org.freedesktop.NetworkManager.Settings.Connection";

    fn settings() -> ConnectionSettings {
        let mut connection = HashMap::new();
        connection.insert("id".to_string(), owned("Home Wi-Fi"));
        connection.insert("uuid".to_string(), owned("0b6a4a1e-4d3a-4b8a-9d55-2f0e6c1b7f10"));
        connection.insert("type".to_string(), owned("802-11-wireless"));
        let mut wireless = HashMap::new();
        wireless.insert("ssid".to_string(), owned(b"home".to_vec()));

        let mut settings = ConnectionSettings::new();
        settings.insert("connection".to_string(), connection);
        settings.insert("802-11-wireless".to_string(), wireless);
        settings
    }

    fn connection(mock: MockTransport) -> (Arc<MockTransport>, Connection) {
        let mock = Arc::new(mock);
        let session = Session::new(mock.clone(), 10);
        (
            mock,
            Connection::new(session, OwnedObjectPath::try_from(CONN).unwrap()),
        )
    }

    #[tokio::test]
    async fn get_settings_decodes_nested_dict() {
        let (_, conn) = connection(MockTransport::new().with_reply(
            CONN,
            IFACE,
            "GetSettings",
            vec![owned(settings())],
        ));
        let settings = conn.get_settings().await.unwrap();
        assert_eq!(
            connection_field(&settings, "id").as_deref(),
            Some("Home Wi-Fi")
        );
        assert!(settings.contains_key("802-11-wireless"));
    }

    #[tokio::test]
    async fn update_sends_settings() {
        let (mock, conn) = connection(MockTransport::new().with_reply(CONN, IFACE, "Update", vec![]));
        conn.update(settings()).await.unwrap();
        let args = mock.call_args(CONN, IFACE, "Update");
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].value_signature().to_string(), "a{sa{sv}}");
    }

    #[tokio::test]
    async fn snapshot_renders_settings() {
        let (_, conn) = connection(
            MockTransport::new()
                .with_reply(CONN, IFACE, "GetSettings", vec![owned(settings())])
                .with_property(CONN, IFACE, "Unsaved", false)
                .with_property(CONN, IFACE, "Filename", "/etc/NetworkManager/system-connections/home.nmconnection"),
        );
        let snapshot = conn.snapshot().await;
        assert_eq!(snapshot.id.as_deref(), Some("Home Wi-Fi"));
        assert_eq!(snapshot.connection_type.as_deref(), Some("802-11-wireless"));
        let rendered = snapshot.settings.as_ref().unwrap();
        assert_eq!(rendered["802-11-wireless"]["ssid"], "home");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["Type"], "802-11-wireless");
        assert_eq!(json["Unsaved"], false);
    }

    #[tokio::test]
    async fn snapshot_without_settings_keeps_other_fields() {
        let (_, conn) = connection(
            MockTransport::new()
                .with_fault(
                    CONN,
                    IFACE,
                    "GetSettings",
                    "org.freedesktop.NetworkManager.Settings.PermissionDenied",
                    "denied",
                )
                .with_property(CONN, IFACE, "Unsaved", true),
        );
        let snapshot = conn.snapshot().await;
        assert!(snapshot.id.is_none());
        assert!(snapshot.settings.is_none());
        assert_eq!(snapshot.unsaved, Some(true));
    }
}
