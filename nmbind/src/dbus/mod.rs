//! Bus plumbing.
//!
//! [`Transport`] is the seam every wrapper goes through; [`BusTransport`]
//! implements it over a zbus connection to NetworkManager.

mod bus;
#[cfg(test)]
pub(crate) mod mock;
mod transport;

pub use bus::BusTransport;
pub use transport::{Notification, NotificationPayload, NotificationStream, Transport};
