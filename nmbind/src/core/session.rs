//! Shared session state: the transport and the notification subscription.

use futures::stream::StreamExt;
use log::debug;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use zvariant::{ObjectPath, OwnedObjectPath};

use crate::dbus::{Notification, Transport};
use crate::Result;

/// A transport plus the single subscription slot, shared by every wrapper
/// created from one [`NetworkManager`](crate::NetworkManager) handle.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    transport: Arc<dyn Transport>,
    capacity: usize,
    subscription: Mutex<Option<ActiveSubscription>>,
}

#[derive(Debug)]
struct ActiveSubscription {
    namespace: OwnedObjectPath,
    source: NotificationSource,
    pump: JoinHandle<()>,
}

impl Session {
    pub(crate) fn new(transport: Arc<dyn Transport>, capacity: usize) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport,
                capacity: capacity.max(1),
                subscription: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// Starts forwarding notifications from `namespace` into a bounded queue.
    ///
    /// While a subscription is active, further calls return the same source
    /// without registering again.
    pub(crate) async fn subscribe(&self, namespace: &ObjectPath<'_>) -> Result<NotificationSource> {
        let mut slot = self.inner.subscription.lock().await;
        if let Some(active) = slot.as_ref() {
            debug!(
                "Already subscribed to {}, reusing the existing queue",
                active.namespace
            );
            return Ok(active.source.clone());
        }

        let mut stream = self.inner.transport.subscribe(namespace).await?;
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        let pump = tokio::spawn(async move {
            while let Some(notification) = stream.next().await {
                if tx.send(notification).await.is_err() {
                    debug!("Notification queue closed, stopping pump");
                    break;
                }
            }
        });

        let source = NotificationSource {
            rx: Arc::new(Mutex::new(rx)),
        };
        *slot = Some(ActiveSubscription {
            namespace: namespace.to_owned().into(),
            source: source.clone(),
            pump,
        });
        debug!("Subscribed to {namespace}");
        Ok(source)
    }

    /// Tears down the active subscription, if any.
    ///
    /// Pending notifications are discarded and every clone of the old
    /// source yields `None` from then on.
    pub(crate) async fn unsubscribe(&self) {
        let Some(active) = self.inner.subscription.lock().await.take() else {
            return;
        };

        active.pump.abort();
        // Joining guarantees the sender and the transport stream are dropped.
        let _ = active.pump.await;

        let mut rx = active.source.rx.lock().await;
        rx.close();
        while rx.try_recv().is_ok() {}
        debug!("Unsubscribed from {}", active.namespace);
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(active) = self.subscription.get_mut().take() {
            active.pump.abort();
        }
    }
}

/// Consumer side of a notification subscription.
///
/// Clones share one queue: each notification is received by exactly one
/// `recv` call across all clones.
#[derive(Debug, Clone)]
pub struct NotificationSource {
    rx: Arc<Mutex<mpsc::Receiver<Notification>>>,
}

impl NotificationSource {
    /// Waits for the next notification.
    ///
    /// Returns `None` once the subscription has been torn down.
    pub async fn recv(&self) -> Option<Notification> {
        self.rx.lock().await.recv().await
    }

    /// Returns a queued notification without waiting, if one is available.
    pub fn try_recv(&self) -> Option<Notification> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Returns `true` if both handles read from the same queue.
    pub fn same_source(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rx, &other.rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbus::mock::{owned, MockTransport};
    use crate::dbus::NotificationPayload;
    use std::time::Duration;

    const ROOT: &str = "/org/freedesktop/NetworkManager";

    fn session(mock: &Arc<MockTransport>) -> Session {
        Session::new(mock.clone(), 10)
    }

    fn root() -> ObjectPath<'static> {
        ObjectPath::try_from(ROOT).unwrap()
    }

    #[tokio::test]
    async fn second_subscribe_returns_same_source() {
        let mock = Arc::new(MockTransport::new());
        let session = session(&mock);

        let first = session.subscribe(&root()).await.unwrap();
        let second = session.subscribe(&root()).await.unwrap();

        assert!(first.same_source(&second));
        assert_eq!(mock.subscriptions(), 1);
        assert_eq!(mock.live_listeners(), 1);
    }

    #[tokio::test]
    async fn broadcast_is_delivered_once() {
        let mock = Arc::new(MockTransport::new());
        let session = session(&mock);
        let first = session.subscribe(&root()).await.unwrap();
        let second = session.subscribe(&root()).await.unwrap();

        let delivered = mock.emit(
            "/org/freedesktop/NetworkManager/Devices/1",
            "org.freedesktop.NetworkManager.Device",
            "StateChanged",
            vec![owned(100u32), owned(30u32), owned(0u32)],
        );
        assert_eq!(delivered, 1);

        let notification = tokio::time::timeout(Duration::from_secs(1), first.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notification.member(), "StateChanged");
        assert_eq!(
            notification.path.as_str(),
            "/org/freedesktop/NetworkManager/Devices/1"
        );
        match notification.payload {
            NotificationPayload::Signal { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("unexpected payload {other:?}"),
        }

        assert!(second.try_recv().is_none());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let mock = Arc::new(MockTransport::new());
        let session = session(&mock);
        let source = session.subscribe(&root()).await.unwrap();

        session.unsubscribe().await;

        assert_eq!(mock.live_listeners(), 0);
        let delivered = mock.emit(ROOT, "org.freedesktop.NetworkManager", "CheckPermissions", vec![]);
        assert_eq!(delivered, 0);
        assert!(source.recv().await.is_none());
    }

    #[tokio::test]
    async fn unsubscribe_without_subscription_is_noop() {
        let mock = Arc::new(MockTransport::new());
        let session = session(&mock);
        session.unsubscribe().await;
        assert_eq!(mock.subscriptions(), 0);
    }

    #[tokio::test]
    async fn resubscribe_after_unsubscribe_gets_fresh_queue() {
        let mock = Arc::new(MockTransport::new());
        let session = session(&mock);
        let old = session.subscribe(&root()).await.unwrap();
        session.unsubscribe().await;
        let new = session.subscribe(&root()).await.unwrap();

        assert!(!old.same_source(&new));
        assert_eq!(mock.subscriptions(), 2);

        mock.emit(ROOT, "org.freedesktop.NetworkManager", "DeviceAdded", vec![]);
        let received = tokio::time::timeout(Duration::from_secs(1), new.recv())
            .await
            .unwrap();
        assert!(received.is_some());
        assert!(old.recv().await.is_none());
    }
}
