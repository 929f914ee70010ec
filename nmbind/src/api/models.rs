//! Public data types: errors, configuration, enumerations and the decoded
//! records returned by collection getters.

use bitflags::bitflags;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use zvariant::OwnedValue;

use crate::types::constants::{error_names, paths, NOTIFICATION_CAPACITY, SERVICE};

/// Settings dictionary as exchanged with NetworkManager (`a{sa{sv}}`).
///
/// The outer key is the setting name (`"connection"`, `"802-11-wireless"`,
/// `"ipv4"`, ...), the inner map holds that setting's properties.
pub type ConnectionSettings = HashMap<String, HashMap<String, OwnedValue>>;

/// Errors that can occur while talking to NetworkManager.
///
/// Every accessor in this crate is fallible. The variants follow the fault
/// taxonomy of the binding layer: the connection itself, the remote object,
/// the shape of a reply, the dynamic type of a property, and policy
/// rejections.
///
/// # Example
///
/// ```rust
/// use nmbind::NmError;
///
/// fn describe(err: &NmError) -> &'static str {
///     match err {
///         NmError::Transport { .. } => "bus unavailable",
///         NmError::Remote { .. } => "daemon returned an error",
///         NmError::Permission { .. } => "not allowed",
///         NmError::Decode { .. } | NmError::TypeMismatch { .. } => "unexpected reply",
///         NmError::InvalidArgument(_) => "bad input",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum NmError {
    /// The bus connection is unusable.
    #[error("transport failure during {context}: {source}")]
    Transport {
        /// What was being attempted.
        context: String,
        /// Underlying zbus error.
        #[source]
        source: zbus::Error,
    },

    /// The remote object or service replied with a D-Bus error.
    #[error("{context} failed: {name}: {message}")]
    Remote {
        /// What was being attempted.
        context: String,
        /// D-Bus error name.
        name: String,
        /// Human-readable message sent by the daemon.
        message: String,
    },

    /// The remote side rejected the operation by policy.
    #[error("{context} denied: {name}: {message}")]
    Permission {
        /// What was being attempted.
        context: String,
        /// D-Bus error name.
        name: String,
        /// Human-readable message sent by the daemon.
        message: String,
    },

    /// A reply did not have the expected arity or structure.
    #[error("malformed reply from {context}: {reason}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A property's dynamic type disagrees with the accessor's declared type.
    #[error("type mismatch for {property}: expected {expected}, found signature '{found}'")]
    TypeMismatch {
        /// Fully qualified property name.
        property: String,
        /// Rust type the accessor asked for.
        expected: &'static str,
        /// Wire signature that was actually received.
        found: String,
    },

    /// Input that cannot be put on the wire (e.g. a malformed object path).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl NmError {
    /// Classifies a zbus error raised while performing `context`.
    pub(crate) fn from_bus(context: impl Into<String>, err: zbus::Error) -> Self {
        let context = context.into();
        match err {
            zbus::Error::MethodError(name, message, _) => {
                Self::from_error_name(context, name.to_string(), message.unwrap_or_default())
            }
            zbus::Error::Variant(e) => Self::Decode {
                context,
                reason: e.to_string(),
            },
            source => Self::Transport { context, source },
        }
    }

    /// Builds a `Remote` or `Permission` fault from a D-Bus error name.
    pub(crate) fn from_error_name(context: String, name: String, message: String) -> Self {
        if is_permission_error(&name) {
            Self::Permission {
                context,
                name,
                message,
            }
        } else {
            Self::Remote {
                context,
                name,
                message,
            }
        }
    }

    /// Returns `true` if this fault came from the remote side (including
    /// policy rejections) rather than from the transport or decoding.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Permission { .. })
    }
}

fn is_permission_error(name: &str) -> bool {
    matches!(
        name,
        error_names::ACCESS_DENIED
            | error_names::PROPERTY_READ_ONLY
            | error_names::NOT_AUTHORIZED
            | error_names::NM_PERMISSION_DENIED
            | error_names::NM_SETTINGS_PERMISSION_DENIED
    )
}

impl From<zbus::Error> for NmError {
    fn from(err: zbus::Error) -> Self {
        Self::from_bus("D-Bus operation", err)
    }
}

impl From<zvariant::Error> for NmError {
    fn from(err: zvariant::Error) -> Self {
        Self::Decode {
            context: "value conversion".into(),
            reason: err.to_string(),
        }
    }
}

/// Which message bus to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusKind {
    /// The system bus (where NetworkManager normally lives).
    System,
    /// The current user's session bus.
    Session,
    /// An explicit bus address such as `unix:path=/run/test-bus`.
    Address(String),
}

/// Where the binding layer connects and which object tree it binds.
///
/// # Examples
///
/// ```rust
/// use nmbind::{BusConfig, BusKind};
///
/// // Defaults: system bus, org.freedesktop.NetworkManager
/// let config = BusConfig::default();
/// assert_eq!(config.notification_capacity, 10);
///
/// // A private test bus with a larger notification queue
/// let config = BusConfig {
///     bus: BusKind::Address("unix:path=/tmp/nm-test-bus".into()),
///     notification_capacity: 64,
///     ..BusConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Bus to connect to.
    pub bus: BusKind,
    /// Well-known name of the NetworkManager service.
    pub service: String,
    /// Object path of the root NetworkManager object.
    pub root_path: String,
    /// Capacity of the notification queue returned by `subscribe`.
    pub notification_capacity: usize,
}

impl Default for BusConfig {
    /// Returns the default configuration.
    ///
    /// Defaults:
    /// - `bus`: [`BusKind::System`]
    /// - `service`: `org.freedesktop.NetworkManager`
    /// - `root_path`: `/org/freedesktop/NetworkManager`
    /// - `notification_capacity`: `10`
    fn default() -> Self {
        Self {
            bus: BusKind::System,
            service: SERVICE.to_string(),
            root_path: paths::ROOT.to_string(),
            notification_capacity: NOTIFICATION_CAPACITY,
        }
    }
}

/// Overall networking state as reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmState {
    /// Networking state is unknown.
    Unknown,
    /// Networking is not enabled, the system is being suspended or resumed.
    Asleep,
    /// There is no active network connection.
    Disconnected,
    /// Network connections are being cleaned up.
    Disconnecting,
    /// A network connection is being started.
    Connecting,
    /// Only local IPv4/IPv6 connectivity.
    ConnectedLocal,
    /// Only site-wide connectivity.
    ConnectedSite,
    /// Global connectivity.
    ConnectedGlobal,
    /// Unrecognized state code.
    Other(u32),
}

/// Result of the daemon's connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Connectivity checks are disabled or have not run yet.
    Unknown,
    /// The host is not connected to any network.
    None,
    /// The Internet connection is hijacked by a captive portal.
    Portal,
    /// Connected to a network, but it does not reach the Internet.
    Limited,
    /// Full network access.
    Full,
    /// Unrecognized connectivity code.
    Other(u32),
}

/// NetworkManager device states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// The device's state is unknown.
    Unknown,
    /// Device is not managed by NetworkManager.
    Unmanaged,
    /// Device is managed but not yet available (e.g., Wi-Fi disabled).
    Unavailable,
    /// Device is available but not connected.
    Disconnected,
    /// Device is preparing to connect.
    Prepare,
    /// Device is being configured.
    Config,
    /// Device requires more information (usually secrets).
    NeedAuth,
    /// Device is requesting IP addresses and routing information.
    IpConfig,
    /// Device is checking whether further action is required.
    IpCheck,
    /// Device is waiting for a secondary connection (like a VPN).
    Secondaries,
    /// Device is fully connected and operational.
    Activated,
    /// Device is disconnecting.
    Deactivating,
    /// Device connection failed.
    Failed,
    /// Unrecognized state code.
    Other(u32),
}

/// Activation state of an active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveConnectionState {
    /// The state of the connection is unknown.
    Unknown,
    /// A network connection is being prepared.
    Activating,
    /// There is a connection to the network.
    Activated,
    /// The network connection is being torn down.
    Deactivating,
    /// The network connection is disconnected and will be removed.
    Deactivated,
    /// Unrecognized state code.
    Other(u32),
}

/// NetworkManager device types.
///
/// This is the discriminant the device factory dispatches on. Codes not
/// known to this crate are preserved in [`DeviceType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Unknown device.
    Unknown,
    /// Wired Ethernet device.
    Ethernet,
    /// Wi-Fi (802.11) wireless device.
    Wifi,
    /// Bluetooth device supporting PAN or DUN.
    Bluetooth,
    /// OLPC XO mesh networking device.
    OlpcMesh,
    /// 802.16e Mobile WiMAX device.
    Wimax,
    /// Modem (analog, CDMA/EVDO, GSM/UMTS, LTE).
    Modem,
    /// IP-over-InfiniBand device.
    Infiniband,
    /// Bond master interface.
    Bond,
    /// 802.1Q VLAN interface.
    Vlan,
    /// ADSL modem.
    Adsl,
    /// Bridge master interface.
    Bridge,
    /// Generic support for unrecognized device types.
    Generic,
    /// Team master interface.
    Team,
    /// TUN or TAP interface.
    Tun,
    /// IP tunnel interface.
    IpTunnel,
    /// MACVLAN interface.
    Macvlan,
    /// VXLAN interface.
    Vxlan,
    /// VETH interface.
    Veth,
    /// MACsec interface.
    Macsec,
    /// Dummy interface.
    Dummy,
    /// PPP interface.
    Ppp,
    /// Open vSwitch interface.
    OvsInterface,
    /// Open vSwitch port.
    OvsPort,
    /// Open vSwitch bridge.
    OvsBridge,
    /// IEEE 802.15.4 (WPAN) MAC layer device.
    Wpan,
    /// 6LoWPAN interface.
    SixLowpan,
    /// WireGuard interface.
    WireGuard,
    /// Wi-Fi P2P device.
    WifiP2P,
    /// VRF interface.
    Vrf,
    /// Loopback device.
    Loopback,
    /// Unrecognized device type with raw code.
    Other(u32),
}

/// Operating mode of a Wi-Fi device or access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    /// Mode is unknown.
    Unknown,
    /// Ad-hoc (IBSS) network.
    Adhoc,
    /// Infrastructure network with an access point.
    Infra,
    /// The device is acting as an access point.
    Ap,
    /// 802.11s mesh network.
    Mesh,
    /// Unrecognized mode code.
    Other(u32),
}

bitflags! {
    /// Access point capability flags (`Flags` property).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApFlags: u32 {
        /// Access point supports privacy measures (WEP/WPA).
        const PRIVACY = 0x0000_0001;
        /// Access point supports Wi-Fi Protected Setup.
        const WPS = 0x0000_0002;
        /// Access point supports push-button WPS.
        const WPS_PBC = 0x0000_0004;
        /// Access point supports PIN-based WPS.
        const WPS_PIN = 0x0000_0008;
    }

    /// Access point security flags (`WpaFlags` and `RsnFlags` properties).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApSecurityFlags: u32 {
        /// Pairwise 40-bit WEP.
        const PAIR_WEP40 = 0x0000_0001;
        /// Pairwise 104-bit WEP.
        const PAIR_WEP104 = 0x0000_0002;
        /// Pairwise TKIP.
        const PAIR_TKIP = 0x0000_0004;
        /// Pairwise CCMP.
        const PAIR_CCMP = 0x0000_0008;
        /// Group 40-bit WEP.
        const GROUP_WEP40 = 0x0000_0010;
        /// Group 104-bit WEP.
        const GROUP_WEP104 = 0x0000_0020;
        /// Group TKIP.
        const GROUP_TKIP = 0x0000_0040;
        /// Group CCMP.
        const GROUP_CCMP = 0x0000_0080;
        /// WPA/RSN pre-shared key.
        const KEY_MGMT_PSK = 0x0000_0100;
        /// 802.1X authentication.
        const KEY_MGMT_802_1X = 0x0000_0200;
        /// WPA3 SAE.
        const KEY_MGMT_SAE = 0x0000_0400;
        /// Opportunistic Wireless Encryption.
        const KEY_MGMT_OWE = 0x0000_0800;
        /// OWE transition mode.
        const KEY_MGMT_OWE_TM = 0x0000_1000;
        /// WPA3 Enterprise Suite-B 192-bit.
        const KEY_MGMT_EAP_SUITE_B_192 = 0x0000_2000;
    }
}

/// Current state of a device together with the reason for the last
/// transition (`StateReason`, wire type `(uu)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStateReason {
    /// Device state.
    pub state: DeviceState,
    /// Raw `NMDeviceStateReason` code.
    pub reason: u32,
}

/// An IPv4 address entry from the legacy `Addresses` property (`aau`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip4Address {
    /// Host address.
    pub address: Ipv4Addr,
    /// Network prefix length.
    pub prefix: u32,
    /// Gateway for this address (`0.0.0.0` if none).
    pub gateway: Ipv4Addr,
}

/// An IPv4 route entry from the legacy `Routes` property (`aau`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip4Route {
    /// Destination network.
    pub destination: Ipv4Addr,
    /// Destination prefix length.
    pub prefix: u32,
    /// Next hop (`0.0.0.0` for a direct route).
    pub next_hop: Ipv4Addr,
    /// Route metric.
    pub metric: u32,
}

/// An IPv6 address entry from the legacy `Addresses` property (`a(ayuay)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip6Address {
    /// Host address.
    pub address: Ipv6Addr,
    /// Network prefix length.
    pub prefix: u32,
    /// Gateway for this address (`::` if none).
    pub gateway: Ipv6Addr,
}

/// An IPv6 route entry from the legacy `Routes` property (`a(ayuayu)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip6Route {
    /// Destination network.
    pub destination: Ipv6Addr,
    /// Destination prefix length.
    pub prefix: u32,
    /// Next hop (`::` for a direct route).
    pub next_hop: Ipv6Addr,
    /// Route metric.
    pub metric: u32,
}

/// One entry of an `AddressData` property (`aa{sv}`), IPv4 or IPv6.
///
/// `address` and `prefix` are the recognized keys; anything else the daemon
/// sends is kept, rendered as text, in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressData {
    /// Address in textual form.
    pub address: String,
    /// Prefix length.
    pub prefix: u32,
    /// Unrecognized keys.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// One entry of a `RouteData` property (`aa{sv}`), IPv4 or IPv6.
///
/// `dest`, `prefix`, `next-hop` and `metric` are the recognized keys;
/// anything else (`table`, `mtu`, ...) is kept, rendered as text, in
/// `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteData {
    /// Destination network in textual form.
    pub destination: String,
    /// Destination prefix length.
    pub prefix: u32,
    /// Next hop, absent for direct routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop: Option<String>,
    /// Route metric, absent when the daemon did not report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
    /// Unrecognized keys.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl From<u32> for NmState {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            10 => Self::Asleep,
            20 => Self::Disconnected,
            30 => Self::Disconnecting,
            40 => Self::Connecting,
            50 => Self::ConnectedLocal,
            60 => Self::ConnectedSite,
            70 => Self::ConnectedGlobal,
            v => Self::Other(v),
        }
    }
}

impl From<u32> for Connectivity {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::None,
            2 => Self::Portal,
            3 => Self::Limited,
            4 => Self::Full,
            v => Self::Other(v),
        }
    }
}

impl From<u32> for DeviceState {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            10 => Self::Unmanaged,
            20 => Self::Unavailable,
            30 => Self::Disconnected,
            40 => Self::Prepare,
            50 => Self::Config,
            60 => Self::NeedAuth,
            70 => Self::IpConfig,
            80 => Self::IpCheck,
            90 => Self::Secondaries,
            100 => Self::Activated,
            110 => Self::Deactivating,
            120 => Self::Failed,
            v => Self::Other(v),
        }
    }
}

impl From<u32> for ActiveConnectionState {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::Activating,
            2 => Self::Activated,
            3 => Self::Deactivating,
            4 => Self::Deactivated,
            v => Self::Other(v),
        }
    }
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::Ethernet,
            2 => Self::Wifi,
            5 => Self::Bluetooth,
            6 => Self::OlpcMesh,
            7 => Self::Wimax,
            8 => Self::Modem,
            9 => Self::Infiniband,
            10 => Self::Bond,
            11 => Self::Vlan,
            12 => Self::Adsl,
            13 => Self::Bridge,
            14 => Self::Generic,
            15 => Self::Team,
            16 => Self::Tun,
            17 => Self::IpTunnel,
            18 => Self::Macvlan,
            19 => Self::Vxlan,
            20 => Self::Veth,
            21 => Self::Macsec,
            22 => Self::Dummy,
            23 => Self::Ppp,
            24 => Self::OvsInterface,
            25 => Self::OvsPort,
            26 => Self::OvsBridge,
            27 => Self::Wpan,
            28 => Self::SixLowpan,
            29 => Self::WireGuard,
            30 => Self::WifiP2P,
            31 => Self::Vrf,
            32 => Self::Loopback,
            v => Self::Other(v),
        }
    }
}

impl From<u32> for WifiMode {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::Adhoc,
            2 => Self::Infra,
            3 => Self::Ap,
            4 => Self::Mesh,
            v => Self::Other(v),
        }
    }
}

impl Display for NmState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Asleep => write!(f, "Asleep"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Disconnecting => write!(f, "Disconnecting"),
            Self::Connecting => write!(f, "Connecting"),
            Self::ConnectedLocal => write!(f, "Connected (local)"),
            Self::ConnectedSite => write!(f, "Connected (site)"),
            Self::ConnectedGlobal => write!(f, "Connected (global)"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

impl Display for Connectivity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::None => write!(f, "None"),
            Self::Portal => write!(f, "Portal"),
            Self::Limited => write!(f, "Limited"),
            Self::Full => write!(f, "Full"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Unmanaged => write!(f, "Unmanaged"),
            Self::Unavailable => write!(f, "Unavailable"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Prepare => write!(f, "Preparing"),
            Self::Config => write!(f, "Configuring"),
            Self::NeedAuth => write!(f, "Needs authentication"),
            Self::IpConfig => write!(f, "Requesting IP configuration"),
            Self::IpCheck => write!(f, "Checking IP connectivity"),
            Self::Secondaries => write!(f, "Waiting for secondaries"),
            Self::Activated => write!(f, "Activated"),
            Self::Deactivating => write!(f, "Deactivating"),
            Self::Failed => write!(f, "Failed"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

impl Display for ActiveConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Activating => write!(f, "Activating"),
            Self::Activated => write!(f, "Activated"),
            Self::Deactivating => write!(f, "Deactivating"),
            Self::Deactivated => write!(f, "Deactivated"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Ethernet => "Ethernet",
            Self::Wifi => "Wi-Fi",
            Self::Bluetooth => "Bluetooth",
            Self::OlpcMesh => "OLPC Mesh",
            Self::Wimax => "WiMAX",
            Self::Modem => "Modem",
            Self::Infiniband => "InfiniBand",
            Self::Bond => "Bond",
            Self::Vlan => "VLAN",
            Self::Adsl => "ADSL",
            Self::Bridge => "Bridge",
            Self::Generic => "Generic",
            Self::Team => "Team",
            Self::Tun => "TUN",
            Self::IpTunnel => "IP Tunnel",
            Self::Macvlan => "MACVLAN",
            Self::Vxlan => "VXLAN",
            Self::Veth => "VETH",
            Self::Macsec => "MACsec",
            Self::Dummy => "Dummy",
            Self::Ppp => "PPP",
            Self::OvsInterface => "OVS Interface",
            Self::OvsPort => "OVS Port",
            Self::OvsBridge => "OVS Bridge",
            Self::Wpan => "WPAN",
            Self::SixLowpan => "6LoWPAN",
            Self::WireGuard => "WireGuard",
            Self::WifiP2P => "Wi-Fi P2P",
            Self::Vrf => "VRF",
            Self::Loopback => "Loopback",
            Self::Other(v) => return write!(f, "Other({v})"),
        };
        f.write_str(name)
    }
}

impl Display for WifiMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Adhoc => write!(f, "Adhoc"),
            Self::Infra => write!(f, "Infra"),
            Self::Ap => write!(f, "AP"),
            Self::Mesh => write!(f, "Mesh"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}
