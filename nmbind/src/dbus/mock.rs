//! In-memory [`Transport`] for unit tests.
//!
//! Serves canned property values and method replies, records every request,
//! and lets tests inject notifications.

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::StreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use super::transport::{Notification, NotificationPayload, NotificationStream, Transport};
use crate::api::models::NmError;
use crate::types::constants::error_names;
use crate::Result;

type Key = (String, String, String);

fn key(path: &str, interface: &str, name: &str) -> Key {
    (path.to_string(), interface.to_string(), name.to_string())
}

/// Converts anything `Value` accepts into an `OwnedValue`.
pub(crate) fn owned<'a>(value: impl Into<Value<'a>>) -> OwnedValue {
    value
        .into()
        .try_to_owned()
        .expect("test values never carry file descriptors")
}

/// One request seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    Get(Key),
    Set(Key),
    Call(Key),
    Subscribe(String),
}

#[derive(Debug, Default)]
struct State {
    properties: HashMap<Key, OwnedValue>,
    replies: HashMap<Key, Vec<OwnedValue>>,
    faults: HashMap<Key, (String, String)>,
    read_only: HashSet<Key>,
    requests: Vec<Request>,
    writes: Vec<(Key, OwnedValue)>,
    call_args: Vec<(Key, Vec<OwnedValue>)>,
    listeners: Vec<(String, UnboundedSender<Notification>)>,
}

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Serves `value` for `interface.name` on `path`.
    pub(crate) fn with_property<'a>(
        self,
        path: &str,
        interface: &str,
        name: &str,
        value: impl Into<Value<'a>>,
    ) -> Self {
        self.state()
            .properties
            .insert(key(path, interface, name), owned(value));
        self
    }

    /// Makes writes to `interface.name` fail with `PropertyReadOnly`.
    pub(crate) fn read_only(self, path: &str, interface: &str, name: &str) -> Self {
        self.state().read_only.insert(key(path, interface, name));
        self
    }

    /// Replies to `interface.method` on `path` with `values`.
    pub(crate) fn with_reply(
        self,
        path: &str,
        interface: &str,
        method: &str,
        values: Vec<OwnedValue>,
    ) -> Self {
        self.state()
            .replies
            .insert(key(path, interface, method), values);
        self
    }

    /// Fails reads of a property or calls of a method with a D-Bus error.
    pub(crate) fn with_fault(
        self,
        path: &str,
        interface: &str,
        name: &str,
        error_name: &str,
        message: &str,
    ) -> Self {
        self.state().faults.insert(
            key(path, interface, name),
            (error_name.to_string(), message.to_string()),
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    /// Number of remote reads, writes and calls (subscriptions excluded).
    pub(crate) fn round_trips(&self) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| !matches!(r, Request::Subscribe(_)))
            .count()
    }

    pub(crate) fn subscriptions(&self) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| matches!(r, Request::Subscribe(_)))
            .count()
    }

    /// Value last written to `interface.name` on `path`.
    pub(crate) fn written(&self, path: &str, interface: &str, name: &str) -> Option<OwnedValue> {
        let wanted = key(path, interface, name);
        self.state()
            .writes
            .iter()
            .rev()
            .find(|(k, _)| *k == wanted)
            .map(|(_, v)| v.try_clone().expect("clone written value"))
    }

    /// Arguments of the last call to `interface.method` on `path`.
    pub(crate) fn call_args(&self, path: &str, interface: &str, method: &str) -> Vec<OwnedValue> {
        let wanted = key(path, interface, method);
        self.state()
            .call_args
            .iter()
            .rev()
            .find(|(k, _)| *k == wanted)
            .map(|(_, args)| {
                args.iter()
                    .map(|a| a.try_clone().expect("clone call argument"))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Broadcasts a signal to every live subscription whose namespace
    /// covers `path`. Returns how many subscriptions received it.
    pub(crate) fn emit(&self, path: &str, interface: &str, name: &str, args: Vec<OwnedValue>) -> usize {
        let mut state = self.state();
        state.listeners.retain(|(_, tx)| !tx.is_closed());
        let mut delivered = 0;
        for (namespace, tx) in &state.listeners {
            if !in_namespace(namespace, path) {
                continue;
            }
            let notification = Notification {
                path: OwnedObjectPath::try_from(path).expect("valid object path"),
                interface: interface.to_string(),
                payload: NotificationPayload::Signal {
                    name: name.to_string(),
                    args: args
                        .iter()
                        .map(|a| a.try_clone().expect("clone signal argument"))
                        .collect(),
                },
            };
            if tx.unbounded_send(notification).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of subscription streams still attached.
    pub(crate) fn live_listeners(&self) -> usize {
        let mut state = self.state();
        state.listeners.retain(|(_, tx)| !tx.is_closed());
        state.listeners.len()
    }
}

fn in_namespace(namespace: &str, path: &str) -> bool {
    namespace == "/"
        || path == namespace
        || path
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn remote(context: &Key, fault: &(String, String)) -> NmError {
    NmError::from_error_name(
        format!("{}.{} on {}", context.1, context.2, context.0),
        fault.0.clone(),
        fault.1.clone(),
    )
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        method: &str,
        args: Vec<OwnedValue>,
    ) -> Result<Vec<OwnedValue>> {
        let k = key(path.as_str(), interface, method);
        let mut state = self.state();
        state.requests.push(Request::Call(k.clone()));
        state.call_args.push((k.clone(), args));
        if let Some(fault) = state.faults.get(&k) {
            return Err(remote(&k, fault));
        }
        match state.replies.get(&k) {
            Some(values) => values
                .iter()
                .map(|v| v.try_clone().map_err(|e| NmError::Decode {
                    context: method.to_string(),
                    reason: e.to_string(),
                }))
                .collect(),
            None => Err(remote(
                &k,
                &(
                    "org.freedesktop.DBus.Error.UnknownMethod".to_string(),
                    format!("no such method {method}"),
                ),
            )),
        }
    }

    async fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
    ) -> Result<OwnedValue> {
        let k = key(path.as_str(), interface, name);
        let mut state = self.state();
        state.requests.push(Request::Get(k.clone()));
        if let Some(fault) = state.faults.get(&k) {
            return Err(remote(&k, fault));
        }
        match state.properties.get(&k) {
            Some(value) => value.try_clone().map_err(|e| NmError::Decode {
                context: name.to_string(),
                reason: e.to_string(),
            }),
            None => Err(remote(
                &k,
                &(
                    "org.freedesktop.DBus.Error.UnknownProperty".to_string(),
                    format!("no such property {name}"),
                ),
            )),
        }
    }

    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
        value: OwnedValue,
    ) -> Result<()> {
        let k = key(path.as_str(), interface, name);
        let mut state = self.state();
        state.requests.push(Request::Set(k.clone()));
        if state.read_only.contains(&k) {
            return Err(remote(
                &k,
                &(
                    error_names::PROPERTY_READ_ONLY.to_string(),
                    format!("property {name} is read-only"),
                ),
            ));
        }
        let stored = value.try_clone().map_err(|e| NmError::InvalidArgument(e.to_string()))?;
        state.properties.insert(k.clone(), stored);
        state.writes.push((k, value));
        Ok(())
    }

    async fn subscribe(&self, namespace: &ObjectPath<'_>) -> Result<NotificationStream> {
        let (tx, rx) = unbounded();
        let mut state = self.state();
        state
            .requests
            .push(Request::Subscribe(namespace.as_str().to_string()));
        state.listeners.push((namespace.as_str().to_string(), tx));
        Ok(rx.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_matching() {
        assert!(in_namespace("/org/freedesktop/NetworkManager", "/org/freedesktop/NetworkManager"));
        assert!(in_namespace(
            "/org/freedesktop/NetworkManager",
            "/org/freedesktop/NetworkManager/Devices/1"
        ));
        assert!(!in_namespace(
            "/org/freedesktop/NetworkManager",
            "/org/freedesktop/NetworkManagerX"
        ));
        assert!(in_namespace("/", "/anything"));
    }
}
