//! Typed async bindings for the NetworkManager D-Bus API.
//!
//! Every NetworkManager object kind the daemon exposes (devices, access
//! points, saved profiles, active connections, IP and DHCP configurations,
//! checkpoints) gets a wrapper with one typed accessor per property and one
//! async method per remote method.
//!
//! Wrappers hold no state besides their object path. Every accessor is a
//! fresh round-trip and every one of them can fail.
//!
//! # Example
//!
//! ```no_run
//! use nmbind::{AnyDevice, NetworkManager};
//!
//! # async fn example() -> nmbind::Result<()> {
//! let nm = NetworkManager::new().await?;
//! println!("{} ({})", nm.version().await?, nm.state().await?);
//!
//! for device in nm.get_devices().await? {
//!     if let AnyDevice::Wireless(wifi) = device {
//!         for ap in wifi.get_all_access_points().await? {
//!             println!("{:?} {}%", ap.ssid().await?, ap.strength().await?);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, NmError>`. Remote faults keep the D-Bus
//! error name; policy rejections such as writing a read-only property come
//! back as [`NmError::Permission`]. Faults never poison a handle: the next
//! call goes out as if nothing happened.
//!
//! # Snapshots
//!
//! Each wrapper has a `snapshot()` method that reads its properties into a
//! plain `Serialize` struct. Properties that cannot be read are logged and
//! left out rather than failing the whole snapshot.
//!
//! # Notifications
//!
//! [`NetworkManager::subscribe`] opens a bounded queue of property changes
//! and signals from every object under the root path. A handle has at most
//! one subscription; subscribing twice returns the same source.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod api;
pub(crate) mod core;
mod dbus;
mod types;
mod util;

// Re-exported public API
pub use crate::api::models::{
    ActiveConnectionState, AddressData, ApFlags, ApSecurityFlags, BusConfig, BusKind,
    ConnectionSettings, Connectivity, DeviceState, DeviceStateReason, DeviceType, Ip4Address,
    Ip4Route, Ip6Address, Ip6Route, NmError, NmState, RouteData, WifiMode,
};
pub use crate::api::network_manager::{NetworkManager, NetworkManagerSnapshot};
pub use crate::core::access_point::{AccessPoint, AccessPointSnapshot};
pub use crate::core::active_connection::{ActiveConnection, ActiveConnectionSnapshot};
pub use crate::core::checkpoint::{Checkpoint, CheckpointSnapshot};
pub use crate::core::connection::{Connection, ConnectionSnapshot};
pub use crate::core::device::{AnyDevice, AnyDeviceSnapshot, Device, DeviceSnapshot};
pub use crate::core::dhcp_config::{Dhcp4Config, Dhcp6Config, DhcpConfigSnapshot};
pub use crate::core::dummy::{DummyDevice, DummyDeviceSnapshot};
pub use crate::core::generic::{GenericDevice, GenericDeviceSnapshot};
pub use crate::core::ip_tunnel::{IpTunnelDevice, IpTunnelDeviceSnapshot};
pub use crate::core::ip4_config::{Ip4Config, Ip4ConfigSnapshot};
pub use crate::core::ip6_config::{Ip6Config, Ip6ConfigSnapshot};
pub use crate::core::session::NotificationSource;
pub use crate::core::settings::{Settings, SettingsSnapshot};
pub use crate::core::statistics::{DeviceStatistics, DeviceStatisticsSnapshot};
pub use crate::core::wired::{WiredDevice, WiredDeviceSnapshot};
pub use crate::core::wireless::{WirelessDevice, WirelessDeviceSnapshot};
pub use crate::dbus::{BusTransport, Notification, NotificationPayload, NotificationStream, Transport};

/// A specialized `Result` type for NetworkManager operations.
pub type Result<T> = std::result::Result<T, NmError>;
