//! Constants for the NetworkManager D-Bus API.
//!
//! Well-known names, object paths and interface names, plus the numeric
//! codes used by NetworkManager's properties.

/// Bus name owned by the NetworkManager daemon.
pub const SERVICE: &str = "org.freedesktop.NetworkManager";

/// Well-known object paths.
pub mod paths {
    /// Root NetworkManager object.
    pub const ROOT: &str = "/org/freedesktop/NetworkManager";
    /// Connection settings object.
    pub const SETTINGS: &str = "/org/freedesktop/NetworkManager/Settings";
    /// Sentinel path NetworkManager uses for "no object".
    pub const NONE: &str = "/";
}

/// D-Bus interface names.
pub mod interface {
    pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";
    pub const NM: &str = "org.freedesktop.NetworkManager";
    pub const SETTINGS: &str = "org.freedesktop.NetworkManager.Settings";
    pub const CONNECTION: &str = "org.freedesktop.NetworkManager.Settings.Connection";
    pub const ACTIVE_CONNECTION: &str = "org.freedesktop.NetworkManager.Connection.Active";
    pub const ACCESS_POINT: &str = "org.freedesktop.NetworkManager.AccessPoint";
    pub const CHECKPOINT: &str = "org.freedesktop.NetworkManager.Checkpoint";
    pub const IP4_CONFIG: &str = "org.freedesktop.NetworkManager.IP4Config";
    pub const IP6_CONFIG: &str = "org.freedesktop.NetworkManager.IP6Config";
    pub const DHCP4_CONFIG: &str = "org.freedesktop.NetworkManager.DHCP4Config";
    pub const DHCP6_CONFIG: &str = "org.freedesktop.NetworkManager.DHCP6Config";
    pub const DEVICE: &str = "org.freedesktop.NetworkManager.Device";
    pub const DEVICE_WIRED: &str = "org.freedesktop.NetworkManager.Device.Wired";
    pub const DEVICE_WIRELESS: &str = "org.freedesktop.NetworkManager.Device.Wireless";
    pub const DEVICE_GENERIC: &str = "org.freedesktop.NetworkManager.Device.Generic";
    pub const DEVICE_DUMMY: &str = "org.freedesktop.NetworkManager.Device.Dummy";
    pub const DEVICE_IP_TUNNEL: &str = "org.freedesktop.NetworkManager.Device.IPTunnel";
    pub const DEVICE_STATISTICS: &str = "org.freedesktop.NetworkManager.Device.Statistics";
}

/// D-Bus error names that indicate a policy rejection rather than a
/// generic failure.
pub mod error_names {
    pub const ACCESS_DENIED: &str = "org.freedesktop.DBus.Error.AccessDenied";
    pub const PROPERTY_READ_ONLY: &str = "org.freedesktop.DBus.Error.PropertyReadOnly";
    pub const NOT_AUTHORIZED: &str = "org.freedesktop.DBus.Error.InteractiveAuthorizationRequired";
    pub const NM_PERMISSION_DENIED: &str = "org.freedesktop.NetworkManager.PermissionDenied";
    pub const NM_SETTINGS_PERMISSION_DENIED: &str =
        "org.freedesktop.NetworkManager.Settings.PermissionDenied";
}

/// Default capacity of the notification queue handed out by `subscribe`.
pub const NOTIFICATION_CAPACITY: usize = 10;

/// WiFi frequency constants (MHz)
pub mod frequency {
    pub const BAND_2_4_START: u32 = 2412;
    pub const BAND_2_4_END: u32 = 2472;
    pub const BAND_2_4_CH14: u32 = 2484;
    pub const BAND_5_START: u32 = 5150;
    pub const BAND_5_END: u32 = 5925;
    pub const BAND_6_START: u32 = 5955;
    pub const BAND_6_END: u32 = 7115;
    pub const CHANNEL_SPACING: u32 = 5;
}
