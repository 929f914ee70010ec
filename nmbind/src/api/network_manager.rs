use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

use crate::api::models::{BusConfig, ConnectionSettings, Connectivity, NmError, NmState};
use crate::core::active_connection::ActiveConnection;
use crate::core::checkpoint::Checkpoint;
use crate::core::connection::Connection;
use crate::core::device::{AnyDevice, AnyDeviceSnapshot, Device};
use crate::core::object::{arg, best_effort, path_arg, DbusObject};
use crate::core::session::{NotificationSource, Session};
use crate::core::settings::Settings;
use crate::dbus::{BusTransport, Transport};
use crate::types::constants::{interface, paths};
use crate::Result;

/// Entry point: the root NetworkManager object.
///
/// Every other wrapper is reached from here. Wrappers are created on
/// access and read remote state on demand; nothing is cached.
///
/// # Creating an Instance
///
/// ```no_run
/// use nmbind::NetworkManager;
///
/// # async fn example() -> nmbind::Result<()> {
/// let nm = NetworkManager::new().await?;
/// println!("NetworkManager {}", nm.version().await?);
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ## Walking devices
///
/// ```no_run
/// use nmbind::{AnyDevice, NetworkManager};
///
/// # async fn example() -> nmbind::Result<()> {
/// let nm = NetworkManager::new().await?;
/// for device in nm.get_devices().await? {
///     let name = device.device().interface().await?;
///     match &device {
///         AnyDevice::Wireless(wifi) => {
///             for ap in wifi.get_access_points().await? {
///                 println!("{name}: {} MHz", ap.frequency().await?);
///             }
///         }
///         other => println!("{name}: {}", other.device().state().await?),
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Notifications
///
/// ```no_run
/// use nmbind::NetworkManager;
///
/// # async fn example() -> nmbind::Result<()> {
/// let nm = NetworkManager::new().await?;
/// let source = nm.subscribe().await?;
/// while let Some(notification) = source.recv().await {
///     println!("{} {}", notification.path.as_str(), notification.member());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `NetworkManager` is `Clone` and can be shared across async tasks. Clones
/// share the transport and the subscription.
#[derive(Debug, Clone)]
pub struct NetworkManager {
    object: DbusObject,
}

impl NetworkManager {
    /// Connects to NetworkManager on the system bus.
    pub async fn new() -> Result<Self> {
        Self::with_config(BusConfig::default()).await
    }

    /// Connects using a custom configuration.
    pub async fn with_config(config: BusConfig) -> Result<Self> {
        let transport = BusTransport::connect(&config).await?;
        Self::with_transport(Arc::new(transport), config)
    }

    /// Binds to an existing transport. `config.bus` and `config.service`
    /// are not used; the transport already decides where requests go.
    pub fn with_transport(transport: Arc<dyn Transport>, config: BusConfig) -> Result<Self> {
        let root = OwnedObjectPath::try_from(config.root_path.as_str()).map_err(|e| {
            NmError::InvalidArgument(format!("root path '{}': {e}", config.root_path))
        })?;
        let session = Session::new(transport, config.notification_capacity);
        debug!("Bound NetworkManager root object at {}", root.as_str());
        Ok(Self {
            object: DbusObject::new(session, root, interface::NM),
        })
    }

    /// Object path of the root object.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    fn session(&self) -> Session {
        self.object.session().clone()
    }

    fn object_path(path: &str) -> Result<OwnedObjectPath> {
        OwnedObjectPath::try_from(path)
            .map_err(|e| NmError::InvalidArgument(format!("object path '{path}': {e}")))
    }

    /// The settings service, at `<root>/Settings`.
    pub fn settings(&self) -> Result<Settings> {
        let root = self.path().as_str();
        let path = if root == paths::ROOT {
            Self::object_path(paths::SETTINGS)?
        } else {
            Self::object_path(&format!("{root}/Settings"))?
        };
        Ok(Settings::new(self.session(), path))
    }

    /// Binds the device at `path`, specialized by its type.
    pub async fn device(&self, path: &str) -> Result<AnyDevice> {
        AnyDevice::from_path(self.session(), Self::object_path(path)?).await
    }

    /// Binds the saved profile at `path`.
    pub fn connection(&self, path: &str) -> Result<Connection> {
        Ok(Connection::new(self.session(), Self::object_path(path)?))
    }

    /// Binds the active connection at `path`.
    pub fn active_connection(&self, path: &str) -> Result<ActiveConnection> {
        Ok(ActiveConnection::new(self.session(), Self::object_path(path)?))
    }

    async fn any_devices(&self, paths: Vec<OwnedObjectPath>) -> Result<Vec<AnyDevice>> {
        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            devices.push(AnyDevice::from_path(self.session(), path).await?);
        }
        Ok(devices)
    }

    fn active_connections_from(&self, paths: Vec<OwnedObjectPath>) -> Vec<ActiveConnection> {
        paths
            .into_iter()
            .map(|p| ActiveConnection::new(self.session(), p))
            .collect()
    }

    /// Reloads configuration. `flags` selects what to reload; `0` reloads
    /// everything.
    pub async fn reload(&self, flags: u32) -> Result<()> {
        self.object.call_unit("Reload", vec![arg(flags)?]).await
    }

    /// Realized network devices.
    pub async fn get_devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.call_one("GetDevices", Vec::new()).await?;
        self.any_devices(paths).await
    }

    /// All network devices, including placeholders for devices that do not
    /// exist yet.
    pub async fn get_all_devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.call_one("GetAllDevices", Vec::new()).await?;
        self.any_devices(paths).await
    }

    /// Looks up a device by its IP interface name.
    pub async fn get_device_by_ip_iface(&self, iface: &str) -> Result<AnyDevice> {
        let path = self
            .object
            .call_one("GetDeviceByIpIface", vec![arg(iface)?])
            .await?;
        AnyDevice::from_path(self.session(), path).await
    }

    /// Activates a saved profile.
    ///
    /// `device` may be omitted for VPN connections; `specific_object`
    /// selects e.g. the access point and may be omitted to let the daemon
    /// choose.
    pub async fn activate_connection(
        &self,
        connection: &Connection,
        device: Option<&Device>,
        specific_object: Option<&OwnedObjectPath>,
    ) -> Result<ActiveConnection> {
        let path = self
            .object
            .call_one(
                "ActivateConnection",
                vec![
                    arg(connection.path().clone())?,
                    path_arg(device.map(Device::path))?,
                    path_arg(specific_object)?,
                ],
            )
            .await?;
        Ok(ActiveConnection::new(self.session(), path))
    }

    /// Adds a profile from `settings` and activates it in one step.
    ///
    /// Returns the new profile and the active connection started for it.
    pub async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: Option<&Device>,
        specific_object: Option<&OwnedObjectPath>,
    ) -> Result<(Connection, ActiveConnection)> {
        let (connection, active): (OwnedObjectPath, OwnedObjectPath) = self
            .object
            .call_two(
                "AddAndActivateConnection",
                vec![
                    arg(settings)?,
                    path_arg(device.map(Device::path))?,
                    path_arg(specific_object)?,
                ],
            )
            .await?;
        Ok((
            Connection::new(self.session(), connection),
            ActiveConnection::new(self.session(), active),
        ))
    }

    /// Like [`add_and_activate_connection`](Self::add_and_activate_connection)
    /// with extra options (for example `persist`). Also returns the daemon's
    /// result dictionary.
    pub async fn add_and_activate_connection2(
        &self,
        settings: ConnectionSettings,
        device: Option<&Device>,
        specific_object: Option<&OwnedObjectPath>,
        options: HashMap<String, OwnedValue>,
    ) -> Result<(Connection, ActiveConnection, HashMap<String, OwnedValue>)> {
        let (connection, active, result): (
            OwnedObjectPath,
            OwnedObjectPath,
            HashMap<String, OwnedValue>,
        ) = self
            .object
            .call_three(
                "AddAndActivateConnection2",
                vec![
                    arg(settings)?,
                    path_arg(device.map(Device::path))?,
                    path_arg(specific_object)?,
                    arg(options)?,
                ],
            )
            .await?;
        Ok((
            Connection::new(self.session(), connection),
            ActiveConnection::new(self.session(), active),
            result,
        ))
    }

    /// Deactivates an active connection.
    pub async fn deactivate_connection(&self, active: &ActiveConnection) -> Result<()> {
        self.object
            .call_unit("DeactivateConnection", vec![arg(active.path().clone())?])
            .await
    }

    /// Puts networking to sleep or wakes it up.
    pub async fn sleep(&self, sleep: bool) -> Result<()> {
        self.object.call_unit("Sleep", vec![arg(sleep)?]).await
    }

    /// Enables or disables networking.
    pub async fn enable(&self, enable: bool) -> Result<()> {
        self.object.call_unit("Enable", vec![arg(enable)?]).await
    }

    /// Permissions of the caller, keyed by permission name
    /// (values are `yes`, `no` or `auth`).
    pub async fn get_permissions(&self) -> Result<HashMap<String, String>> {
        self.object.call_one("GetPermissions", Vec::new()).await
    }

    /// Sets the daemon's logging level and domains.
    pub async fn set_logging(&self, level: &str, domains: &str) -> Result<()> {
        self.object
            .call_unit("SetLogging", vec![arg(level)?, arg(domains)?])
            .await
    }

    /// Current logging level and domains.
    pub async fn get_logging(&self) -> Result<(String, String)> {
        self.object.call_two("GetLogging", Vec::new()).await
    }

    /// Re-checks connectivity and returns the result.
    pub async fn check_connectivity(&self) -> Result<Connectivity> {
        let raw: u32 = self.object.call_one("CheckConnectivity", Vec::new()).await?;
        Ok(raw.into())
    }

    /// Overall networking state, from the `state` method.
    pub async fn state(&self) -> Result<NmState> {
        let raw: u32 = self.object.call_one("state", Vec::new()).await?;
        Ok(raw.into())
    }

    /// Creates a checkpoint of the current configuration of `devices` (all
    /// devices if empty). With a non-zero `rollback_timeout` the daemon rolls
    /// back automatically after that many seconds.
    pub async fn checkpoint_create(
        &self,
        devices: &[Device],
        rollback_timeout: u32,
        flags: u32,
    ) -> Result<Checkpoint> {
        let paths: Vec<OwnedObjectPath> = devices.iter().map(|d| d.path().clone()).collect();
        let path = self
            .object
            .call_one(
                "CheckpointCreate",
                vec![arg(paths)?, arg(rollback_timeout)?, arg(flags)?],
            )
            .await?;
        Ok(Checkpoint::new(self.session(), path))
    }

    /// Destroys a checkpoint without rolling back.
    pub async fn checkpoint_destroy(&self, checkpoint: &Checkpoint) -> Result<()> {
        self.object
            .call_unit("CheckpointDestroy", vec![arg(checkpoint.path().clone())?])
            .await
    }

    /// Rolls back to a checkpoint. Returns the rollback result per device
    /// path.
    pub async fn checkpoint_rollback(&self, checkpoint: &Checkpoint) -> Result<HashMap<String, u32>> {
        self.object
            .call_one("CheckpointRollback", vec![arg(checkpoint.path().clone())?])
            .await
    }

    /// Resets the rollback timeout of a checkpoint to `add_timeout` seconds
    /// from now.
    pub async fn checkpoint_adjust_rollback_timeout(
        &self,
        checkpoint: &Checkpoint,
        add_timeout: u32,
    ) -> Result<()> {
        self.object
            .call_unit(
                "CheckpointAdjustRollbackTimeout",
                vec![arg(checkpoint.path().clone())?, arg(add_timeout)?],
            )
            .await
    }

    /// Realized devices, from the `Devices` property.
    pub async fn devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.object_list_property("Devices").await?;
        self.any_devices(paths).await
    }

    /// All devices, from the `AllDevices` property.
    pub async fn all_devices(&self) -> Result<Vec<AnyDevice>> {
        let paths = self.object.object_list_property("AllDevices").await?;
        self.any_devices(paths).await
    }

    /// Existing checkpoints.
    pub async fn checkpoints(&self) -> Result<Vec<Checkpoint>> {
        Ok(self
            .object
            .object_list_property("Checkpoints")
            .await?
            .into_iter()
            .map(|p| Checkpoint::new(self.session(), p))
            .collect())
    }

    /// Whether networking is enabled.
    pub async fn networking_enabled(&self) -> Result<bool> {
        self.object.property("NetworkingEnabled").await
    }

    /// Whether wireless is enabled in software.
    pub async fn wireless_enabled(&self) -> Result<bool> {
        self.object.property("WirelessEnabled").await
    }

    /// Enables or disables wireless in software.
    pub async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        self.object.set_property("WirelessEnabled", enabled).await
    }

    /// Whether the wireless hardware switch is on.
    pub async fn wireless_hardware_enabled(&self) -> Result<bool> {
        self.object.property("WirelessHardwareEnabled").await
    }

    /// Whether mobile broadband is enabled in software.
    pub async fn wwan_enabled(&self) -> Result<bool> {
        self.object.property("WwanEnabled").await
    }

    /// Enables or disables mobile broadband in software.
    pub async fn set_wwan_enabled(&self, enabled: bool) -> Result<()> {
        self.object.set_property("WwanEnabled", enabled).await
    }

    /// Whether the mobile broadband hardware switch is on.
    pub async fn wwan_hardware_enabled(&self) -> Result<bool> {
        self.object.property("WwanHardwareEnabled").await
    }

    /// Whether WiMAX is enabled in software.
    pub async fn wimax_enabled(&self) -> Result<bool> {
        self.object.property("WimaxEnabled").await
    }

    /// Enables or disables WiMAX in software.
    pub async fn set_wimax_enabled(&self, enabled: bool) -> Result<()> {
        self.object.set_property("WimaxEnabled", enabled).await
    }

    /// Whether the WiMAX hardware switch is on.
    pub async fn wimax_hardware_enabled(&self) -> Result<bool> {
        self.object.property("WimaxHardwareEnabled").await
    }

    /// Currently active connections.
    pub async fn active_connections(&self) -> Result<Vec<ActiveConnection>> {
        let paths = self.object.object_list_property("ActiveConnections").await?;
        Ok(self.active_connections_from(paths))
    }

    /// Connection that owns the default route, if any.
    pub async fn primary_connection(&self) -> Result<Option<ActiveConnection>> {
        Ok(self
            .object
            .object_property("PrimaryConnection")
            .await?
            .map(|p| ActiveConnection::new(self.session(), p)))
    }

    /// Type of the primary connection, empty if none.
    pub async fn primary_connection_type(&self) -> Result<String> {
        self.object.property("PrimaryConnectionType").await
    }

    /// Raw `NMMetered` value of the primary connection.
    pub async fn metered(&self) -> Result<u32> {
        self.object.property("Metered").await
    }

    /// Connection that is about to become primary, if any.
    pub async fn activating_connection(&self) -> Result<Option<ActiveConnection>> {
        Ok(self
            .object
            .object_property("ActivatingConnection")
            .await?
            .map(|p| ActiveConnection::new(self.session(), p)))
    }

    /// Whether the daemon is still starting up.
    pub async fn startup(&self) -> Result<bool> {
        self.object.property("Startup").await
    }

    /// Daemon version.
    pub async fn version(&self) -> Result<String> {
        self.object.property("Version").await
    }

    /// Raw `NMCapability` values.
    pub async fn capabilities(&self) -> Result<Vec<u32>> {
        self.object.property("Capabilities").await
    }

    /// Overall networking state, from the `State` property.
    pub async fn state_property(&self) -> Result<NmState> {
        let raw: u32 = self.object.property("State").await?;
        Ok(raw.into())
    }

    /// Result of the last connectivity check.
    pub async fn connectivity(&self) -> Result<Connectivity> {
        let raw: u32 = self.object.property("Connectivity").await?;
        Ok(raw.into())
    }

    /// Whether connectivity checking is configured.
    pub async fn connectivity_check_available(&self) -> Result<bool> {
        self.object.property("ConnectivityCheckAvailable").await
    }

    /// Whether connectivity checking is enabled.
    pub async fn connectivity_check_enabled(&self) -> Result<bool> {
        self.object.property("ConnectivityCheckEnabled").await
    }

    /// Enables or disables connectivity checking.
    pub async fn set_connectivity_check_enabled(&self, enabled: bool) -> Result<()> {
        self.object
            .set_property("ConnectivityCheckEnabled", enabled)
            .await
    }

    /// Global DNS configuration.
    pub async fn global_dns_configuration(&self) -> Result<HashMap<String, OwnedValue>> {
        self.object.property("GlobalDnsConfiguration").await
    }

    /// Replaces the global DNS configuration.
    pub async fn set_global_dns_configuration(
        &self,
        configuration: HashMap<String, OwnedValue>,
    ) -> Result<()> {
        self.object
            .set_property("GlobalDnsConfiguration", configuration)
            .await
    }

    /// Starts receiving notifications from every object under the root
    /// path.
    ///
    /// Calling this again while subscribed returns the same source. The
    /// queue holds [`BusConfig::notification_capacity`] items; when it is
    /// full, delivery waits for the consumer. Must be called from within a
    /// tokio runtime.
    pub async fn subscribe(&self) -> Result<NotificationSource> {
        let root: &ObjectPath<'_> = self.path();
        self.object.session().subscribe(root).await
    }

    /// Stops the subscription. Queued notifications are dropped and the
    /// previously returned source yields `None` from then on. Does nothing
    /// when not subscribed.
    pub async fn unsubscribe(&self) {
        self.object.session().unsubscribe().await
    }

    /// Reads the networking state, the daemon version and a snapshot of
    /// every device.
    pub async fn snapshot(&self) -> NetworkManagerSnapshot {
        let devices = match best_effort("GetDevices", self.get_devices().await) {
            Some(devices) => {
                let mut snapshots = Vec::with_capacity(devices.len());
                for device in &devices {
                    snapshots.push(device.snapshot().await);
                }
                Some(snapshots)
            }
            None => None,
        };

        NetworkManagerSnapshot {
            network_state: best_effort("State", self.state().await).map(|s| s.to_string()),
            version: best_effort("Version", self.version().await),
            devices,
        }
    }
}

/// Serializable view of the root object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkManagerSnapshot {
    /// Overall networking state, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_state: Option<String>,
    /// Daemon version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Every realized device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<AnyDeviceSnapshot>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbus::mock::{owned, MockTransport};
    use crate::types::constants::paths;

    const ROOT: &str = "/org/freedesktop/NetworkManager";
    const DEV1: &str = "/org/freedesktop/NetworkManager/Devices/1";
    const DEV2: &str = "/org/freedesktop/NetworkManager/Devices/2";

    fn path(p: &str) -> OwnedObjectPath {
        OwnedObjectPath::try_from(p).unwrap()
    }

    fn nm(mock: MockTransport) -> (Arc<MockTransport>, NetworkManager) {
        let mock = Arc::new(mock);
        let nm = NetworkManager::with_transport(mock.clone(), BusConfig::default()).unwrap();
        (mock, nm)
    }

    #[test]
    fn invalid_root_path_is_rejected() {
        let config = BusConfig {
            root_path: "not a path".into(),
            ..BusConfig::default()
        };
        let err = NetworkManager::with_transport(Arc::new(MockTransport::new()), config)
            .unwrap_err();
        assert!(matches!(err, NmError::InvalidArgument(_)));
    }

    #[test]
    fn settings_lives_under_root() {
        let (_, nm) = nm(MockTransport::new());
        assert_eq!(nm.settings().unwrap().path().as_str(), paths::SETTINGS);
    }

    #[tokio::test]
    async fn get_devices_runs_factory_per_device() {
        let (mock, nm) = nm(MockTransport::new()
            .with_reply(ROOT, interface::NM, "GetDevices", vec![owned(vec![path(DEV1), path(DEV2)])])
            .with_property(DEV1, interface::DEVICE, "DeviceType", 1u32)
            .with_property(DEV2, interface::DEVICE, "DeviceType", 32u32));

        let devices = nm.get_devices().await.unwrap();
        assert!(matches!(devices[0], AnyDevice::Wired(_)));
        assert!(matches!(devices[1], AnyDevice::Other(_)));
        assert_eq!(mock.round_trips(), 3);
    }

    #[tokio::test]
    async fn add_and_activate_returns_both_objects() {
        let (mock, nm) = nm(MockTransport::new().with_reply(
            ROOT,
            interface::NM,
            "AddAndActivateConnection",
            vec![
                owned(path("/org/freedesktop/NetworkManager/Settings/9")),
                owned(path("/org/freedesktop/NetworkManager/ActiveConnection/4")),
            ],
        ));

        let (connection, active) = nm
            .add_and_activate_connection(ConnectionSettings::new(), None, None)
            .await
            .unwrap();
        assert_eq!(
            connection.path().as_str(),
            "/org/freedesktop/NetworkManager/Settings/9"
        );
        assert_eq!(
            active.path().as_str(),
            "/org/freedesktop/NetworkManager/ActiveConnection/4"
        );

        let args = mock.call_args(ROOT, interface::NM, "AddAndActivateConnection");
        assert_eq!(args.len(), 3);
        let device = OwnedObjectPath::try_from(args[1].try_clone().unwrap()).unwrap();
        assert_eq!(device.as_str(), "/");
    }

    #[tokio::test]
    async fn activate_connection_passes_paths() {
        let (mock, nm) = nm(MockTransport::new()
            .with_reply(
                ROOT,
                interface::NM,
                "ActivateConnection",
                vec![owned(path("/org/freedesktop/NetworkManager/ActiveConnection/5"))],
            )
            .with_property(DEV1, interface::DEVICE, "DeviceType", 2u32));

        let connection = nm.connection("/org/freedesktop/NetworkManager/Settings/3").unwrap();
        let device = nm.device(DEV1).await.unwrap();
        let active = nm
            .activate_connection(&connection, Some(device.device()), None)
            .await
            .unwrap();
        assert_eq!(
            active.path().as_str(),
            "/org/freedesktop/NetworkManager/ActiveConnection/5"
        );

        let args = mock.call_args(ROOT, interface::NM, "ActivateConnection");
        let sent: Vec<String> = args
            .into_iter()
            .map(|a| OwnedObjectPath::try_from(a).unwrap().as_str().to_string())
            .collect();
        assert_eq!(
            sent,
            vec![
                "/org/freedesktop/NetworkManager/Settings/3".to_string(),
                DEV1.to_string(),
                "/".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn logging_pair_and_permissions() {
        let mut permissions = HashMap::new();
        permissions.insert(
            "org.freedesktop.NetworkManager.enable-disable-wifi".to_string(),
            "yes".to_string(),
        );
        let (_, nm) = nm(MockTransport::new()
            .with_reply(
                ROOT,
                interface::NM,
                "GetLogging",
                vec![owned("INFO"), owned("PLATFORM,RFKILL,WIFI")],
            )
            .with_reply(ROOT, interface::NM, "GetPermissions", vec![owned(permissions)]));

        let (level, domains) = nm.get_logging().await.unwrap();
        assert_eq!(level, "INFO");
        assert_eq!(domains, "PLATFORM,RFKILL,WIFI");
        let perms = nm.get_permissions().await.unwrap();
        assert_eq!(
            perms["org.freedesktop.NetworkManager.enable-disable-wifi"],
            "yes"
        );
    }

    #[tokio::test]
    async fn state_method_and_property() {
        let (_, nm) = nm(MockTransport::new()
            .with_reply(ROOT, interface::NM, "state", vec![owned(70u32)])
            .with_property(ROOT, interface::NM, "State", 20u32));
        assert_eq!(nm.state().await.unwrap(), NmState::ConnectedGlobal);
        assert_eq!(nm.state_property().await.unwrap(), NmState::Disconnected);
    }

    #[tokio::test]
    async fn checkpoint_lifecycle() {
        let cp = "/org/freedesktop/NetworkManager/Checkpoint/1";
        let mut rollback = HashMap::new();
        rollback.insert(DEV1.to_string(), 0u32);
        let (mock, nm) = nm(MockTransport::new()
            .with_reply(ROOT, interface::NM, "CheckpointCreate", vec![owned(path(cp))])
            .with_reply(ROOT, interface::NM, "CheckpointRollback", vec![owned(rollback)])
            .with_reply(ROOT, interface::NM, "CheckpointDestroy", vec![]));

        let checkpoint = nm.checkpoint_create(&[], 60, 0).await.unwrap();
        assert_eq!(checkpoint.path().as_str(), cp);
        assert_eq!(
            mock.call_args(ROOT, interface::NM, "CheckpointCreate")[0]
                .value_signature()
                .to_string(),
            "ao"
        );

        let result = nm.checkpoint_rollback(&checkpoint).await.unwrap();
        assert_eq!(result[DEV1], 0);
        nm.checkpoint_destroy(&checkpoint).await.unwrap();
    }

    #[tokio::test]
    async fn absent_primary_connection() {
        let (mock, nm) = nm(MockTransport::new().with_property(
            ROOT,
            interface::NM,
            "PrimaryConnection",
            path("/"),
        ));
        assert!(nm.primary_connection().await.unwrap().is_none());
        assert_eq!(mock.round_trips(), 1);
    }

    #[tokio::test]
    async fn set_wireless_enabled_read_only_is_permission() {
        let (_, nm) = nm(MockTransport::new().read_only(ROOT, interface::NM, "WirelessEnabled"));
        let err = nm.set_wireless_enabled(false).await.unwrap_err();
        assert!(matches!(err, NmError::Permission { .. }));
    }

    #[tokio::test]
    async fn snapshot_serializes_state_version_devices() {
        let (_, nm) = nm(MockTransport::new()
            .with_reply(ROOT, interface::NM, "state", vec![owned(70u32)])
            .with_property(ROOT, interface::NM, "Version", "1.46.0")
            .with_reply(ROOT, interface::NM, "GetDevices", vec![owned(vec![path(DEV1)])])
            .with_property(DEV1, interface::DEVICE, "DeviceType", 22u32)
            .with_property(DEV1, interface::DEVICE, "Interface", "dummy0")
            .with_property(DEV1, interface::DEVICE_DUMMY, "HwAddress", "aa:bb:cc:dd:ee:ff"));

        let json = serde_json::to_value(nm.snapshot().await).unwrap();
        assert_eq!(json["NetworkState"], "Connected (global)");
        assert_eq!(json["Version"], "1.46.0");
        assert_eq!(json["Devices"][0]["Interface"], "dummy0");
        assert_eq!(json["Devices"][0]["HwAddress"], "aa:bb:cc:dd:ee:ff");
        assert_eq!(json["Devices"][0]["Path"], DEV1);
    }

    #[tokio::test]
    async fn subscribe_uses_root_namespace() {
        let (mock, nm) = nm(MockTransport::new());
        let first = nm.subscribe().await.unwrap();
        let second = nm.clone().subscribe().await.unwrap();
        assert!(first.same_source(&second));
        assert_eq!(
            mock.requests(),
            vec![crate::dbus::mock::Request::Subscribe(ROOT.to_string())]
        );
        nm.unsubscribe().await;
        assert!(first.recv().await.is_none());
    }
}
