//! The transport seam between typed wrappers and the bus.
//!
//! Wrappers never talk to zbus directly. They go through [`Transport`],
//! which moves untyped [`OwnedValue`]s in and out of remote objects. The
//! production implementation is [`BusTransport`](super::bus::BusTransport);
//! tests plug in their own.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::fmt::Debug;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

use crate::Result;

/// A stream of notifications for one path namespace.
pub type NotificationStream = BoxStream<'static, Notification>;

/// Moves untyped values between this process and remote objects.
///
/// Implementations must be shareable across tasks; one instance backs every
/// wrapper created from a [`NetworkManager`](crate::NetworkManager) handle.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Invokes `interface.method` on the object at `path` and returns the
    /// reply's values in order. Methods without output return an empty vec.
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        method: &str,
        args: Vec<OwnedValue>,
    ) -> Result<Vec<OwnedValue>>;

    /// Reads property `name` of `interface` on the object at `path`.
    async fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
    ) -> Result<OwnedValue>;

    /// Writes property `name` of `interface` on the object at `path`.
    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
        value: OwnedValue,
    ) -> Result<()>;

    /// Opens a stream of every notification emitted by objects at or below
    /// `namespace`.
    async fn subscribe(&self, namespace: &ObjectPath<'_>) -> Result<NotificationStream>;
}

/// An asynchronous notification emitted by a remote object.
#[derive(Debug)]
pub struct Notification {
    /// Object that emitted the notification.
    pub path: OwnedObjectPath,
    /// Interface the notification belongs to. For property changes this is
    /// the interface whose properties changed.
    pub interface: String,
    /// What happened.
    pub payload: NotificationPayload,
}

/// Content of a [`Notification`].
#[derive(Debug)]
pub enum NotificationPayload {
    /// One or more properties changed value.
    PropertiesChanged {
        /// New values, keyed by property name.
        changed: HashMap<String, OwnedValue>,
        /// Properties whose value changed but was not sent.
        invalidated: Vec<String>,
    },
    /// Any other signal.
    Signal {
        /// Signal name.
        name: String,
        /// Signal arguments in order.
        args: Vec<OwnedValue>,
    },
}

impl Notification {
    /// Returns the signal name, or `"PropertiesChanged"` for property
    /// change notifications.
    pub fn member(&self) -> &str {
        match &self.payload {
            NotificationPayload::PropertiesChanged { .. } => "PropertiesChanged",
            NotificationPayload::Signal { name, .. } => name,
        }
    }
}
