//! Typed wrappers for NetworkManager's remote objects.
//!
//! One module per D-Bus interface. Every wrapper embeds a
//! [`DbusObject`](object::DbusObject) bound to the shared
//! [`Session`](session::Session) and reads remote state on demand.

pub(crate) mod access_point;
pub(crate) mod active_connection;
pub(crate) mod checkpoint;
pub(crate) mod connection;
pub(crate) mod device;
pub(crate) mod dhcp_config;
pub(crate) mod dummy;
pub(crate) mod generic;
pub(crate) mod ip4_config;
pub(crate) mod ip6_config;
pub(crate) mod ip_tunnel;
pub(crate) mod object;
pub(crate) mod session;
pub(crate) mod settings;
pub(crate) mod statistics;
pub(crate) mod wired;
pub(crate) mod wireless;
