//! End-to-end tests of the bindings against an in-process fake daemon.
//!
//! The fake implements the public `Transport` trait, so these tests go
//! through the same path a bus-backed handle does, minus the socket.

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use nmbind::{
    AnyDevice, ApFlags, BusConfig, DeviceState, NetworkManager, NmError, NmState, Notification,
    NotificationPayload, NotificationStream, Transport,
};

const NM: &str = "org.freedesktop.NetworkManager";
const DEVICE: &str = "org.freedesktop.NetworkManager.Device";
const WIRELESS: &str = "org.freedesktop.NetworkManager.Device.Wireless";
const ACCESS_POINT: &str = "org.freedesktop.NetworkManager.AccessPoint";
const IP4: &str = "org.freedesktop.NetworkManager.IP4Config";

const ROOT: &str = "/org/freedesktop/NetworkManager";
const WLAN: &str = "/org/freedesktop/NetworkManager/Devices/3";
const AP: &str = "/org/freedesktop/NetworkManager/AccessPoint/7";
const IP4_PATH: &str = "/org/freedesktop/NetworkManager/IP4Config/2";

type Key = (String, String, String);

fn key(path: &str, interface: &str, name: &str) -> Key {
    (path.into(), interface.into(), name.into())
}

fn owned<'a>(value: impl Into<Value<'a>>) -> OwnedValue {
    value.into().try_to_owned().unwrap()
}

fn path(p: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(p).unwrap()
}

#[derive(Debug, Default)]
struct Daemon {
    properties: HashMap<Key, OwnedValue>,
    replies: HashMap<Key, Vec<OwnedValue>>,
    broken: Vec<Key>,
    listeners: Vec<UnboundedSender<Notification>>,
    round_trips: usize,
}

#[derive(Debug, Default)]
struct FakeDaemon {
    state: Mutex<Daemon>,
}

impl FakeDaemon {
    /// A daemon with one Wi-Fi device that sees one access point and has an
    /// IPv4 configuration.
    fn with_wifi() -> Arc<Self> {
        let daemon = Self::default();
        {
            let mut s = daemon.state.lock().unwrap();
            s.replies
                .insert(key(ROOT, NM, "GetDevices"), vec![owned(vec![path(WLAN)])]);
            s.replies.insert(key(ROOT, NM, "state"), vec![owned(70u32)]);
            s.replies
                .insert(key(WLAN, WIRELESS, "GetAccessPoints"), vec![owned(vec![path(AP)])]);
            let props: Vec<(&str, &str, &str, OwnedValue)> = vec![
                (ROOT, NM, "Version", owned("1.48.10")),
                (WLAN, DEVICE, "DeviceType", owned(2u32)),
                (WLAN, DEVICE, "Interface", owned("wlan0")),
                (WLAN, DEVICE, "State", owned(100u32)),
                (WLAN, DEVICE, "Mtu", owned(1500u32)),
                (WLAN, DEVICE, "Ip4Config", owned(path(IP4_PATH))),
                (WLAN, DEVICE, "Dhcp4Config", owned(path("/"))),
                (WLAN, WIRELESS, "AccessPoints", owned(vec![path(AP)])),
                (WLAN, WIRELESS, "Bitrate", owned(144_000u32)),
                (AP, ACCESS_POINT, "Ssid", owned(b"HomeNet".to_vec())),
                (AP, ACCESS_POINT, "Strength", owned(78u8)),
                (AP, ACCESS_POINT, "Frequency", owned(5180u32)),
                (AP, ACCESS_POINT, "Flags", owned(1u32)),
            ];
            for (p, i, n, v) in props {
                s.properties.insert(key(p, i, n), v);
            }
            let mut address = HashMap::new();
            address.insert("address".to_string(), owned("192.168.1.23"));
            address.insert("prefix".to_string(), owned(24u32));
            s.properties.insert(
                key(IP4_PATH, IP4, "AddressData"),
                owned(vec![address]),
            );
        }
        Arc::new(daemon)
    }

    fn break_property(&self, path: &str, interface: &str, name: &str) {
        self.state.lock().unwrap().broken.push(key(path, interface, name));
    }

    fn repair_property(&self, path: &str, interface: &str, name: &str) {
        let k = key(path, interface, name);
        self.state.lock().unwrap().broken.retain(|b| *b != k);
    }

    fn emit_state_change(&self, device: &str, state: u32) {
        let mut s = self.state.lock().unwrap();
        s.listeners.retain(|tx| !tx.is_closed());
        for tx in &s.listeners {
            let mut changed = HashMap::new();
            changed.insert("State".to_string(), owned(state));
            let _ = tx.unbounded_send(Notification {
                path: path(device),
                interface: DEVICE.to_string(),
                payload: NotificationPayload::PropertiesChanged {
                    changed,
                    invalidated: Vec::new(),
                },
            });
        }
    }

    fn round_trips(&self) -> usize {
        self.state.lock().unwrap().round_trips
    }
}

fn unknown(what: &Key) -> NmError {
    NmError::Remote {
        context: format!("{}.{}", what.1, what.2),
        name: "org.freedesktop.DBus.Error.UnknownMethod".into(),
        message: format!("nothing at {}", what.0),
    }
}

#[async_trait]
impl Transport for FakeDaemon {
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        method: &str,
        _args: Vec<OwnedValue>,
    ) -> nmbind::Result<Vec<OwnedValue>> {
        let k = key(path.as_str(), interface, method);
        let mut s = self.state.lock().unwrap();
        s.round_trips += 1;
        match s.replies.get(&k) {
            Some(values) => Ok(values.iter().map(|v| v.try_clone().unwrap()).collect()),
            None => Err(unknown(&k)),
        }
    }

    async fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
    ) -> nmbind::Result<OwnedValue> {
        let k = key(path.as_str(), interface, name);
        let mut s = self.state.lock().unwrap();
        s.round_trips += 1;
        if s.broken.contains(&k) {
            return Err(NmError::Remote {
                context: name.to_string(),
                name: "org.freedesktop.DBus.Error.Failed".into(),
                message: "temporarily unavailable".into(),
            });
        }
        match s.properties.get(&k) {
            Some(value) => Ok(value.try_clone().unwrap()),
            None => Err(unknown(&k)),
        }
    }

    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
        value: OwnedValue,
    ) -> nmbind::Result<()> {
        let mut s = self.state.lock().unwrap();
        s.round_trips += 1;
        s.properties.insert(key(path.as_str(), interface, name), value);
        Ok(())
    }

    async fn subscribe(&self, _namespace: &ObjectPath<'_>) -> nmbind::Result<NotificationStream> {
        let (tx, rx) = unbounded();
        self.state.lock().unwrap().listeners.push(tx);
        Ok(rx.boxed())
    }
}

fn bind(daemon: &Arc<FakeDaemon>) -> NetworkManager {
    NetworkManager::with_transport(daemon.clone(), BusConfig::default()).unwrap()
}

#[tokio::test]
async fn walk_from_root_to_access_point() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);

    assert_eq!(nm.state().await.unwrap(), NmState::ConnectedGlobal);

    let devices = nm.get_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    let AnyDevice::Wireless(wifi) = &devices[0] else {
        panic!("expected a wireless device, got {:?}", devices[0]);
    };
    assert_eq!(wifi.device().interface().await.unwrap(), "wlan0");
    assert_eq!(wifi.device().state().await.unwrap(), DeviceState::Activated);

    let aps = wifi.get_access_points().await.unwrap();
    assert_eq!(aps.len(), 1);
    assert_eq!(aps[0].ssid().await.unwrap(), b"HomeNet".to_vec());
    assert_eq!(aps[0].strength().await.unwrap(), 78);
    assert!(aps[0].flags().await.unwrap().contains(ApFlags::PRIVACY));
}

#[tokio::test]
async fn device_ip4_configuration() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);

    let device = nm.device(WLAN).await.unwrap();
    let ip4 = device.device().ip4_config().await.unwrap().unwrap();
    let addresses = ip4.address_data().await.unwrap();
    assert_eq!(addresses[0].address, "192.168.1.23");
    assert_eq!(addresses[0].prefix, 24);

    assert!(device.device().dhcp4_config().await.unwrap().is_none());
}

#[tokio::test]
async fn faults_do_not_poison_the_handle() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);
    let device = nm.device(WLAN).await.unwrap();

    daemon.break_property(WLAN, DEVICE, "Mtu");
    let err = device.device().mtu().await.unwrap_err();
    assert!(err.is_remote());

    daemon.repair_property(WLAN, DEVICE, "Mtu");
    assert_eq!(device.device().mtu().await.unwrap(), 1500);
}

#[tokio::test]
async fn wrong_property_type_is_reported() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);
    let device = nm.device(WLAN).await.unwrap();

    daemon
        .state
        .lock()
        .unwrap()
        .properties
        .insert(key(WLAN, DEVICE, "Mtu"), owned("jumbo"));
    let err = device.device().mtu().await.unwrap_err();
    assert!(matches!(err, NmError::TypeMismatch { .. }), "{err:?}");
}

#[tokio::test]
async fn every_accessor_is_a_round_trip() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);
    let device = nm.device(WLAN).await.unwrap();
    let before = daemon.round_trips();

    device.device().mtu().await.unwrap();
    device.device().mtu().await.unwrap();
    assert_eq!(daemon.round_trips(), before + 2);
}

#[tokio::test]
async fn notifications_flow_until_unsubscribe() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);

    let source = nm.subscribe().await.unwrap();
    daemon.emit_state_change(WLAN, 30);

    let notification = source.recv().await.unwrap();
    assert_eq!(notification.path.as_str(), WLAN);
    assert_eq!(notification.member(), "PropertiesChanged");
    let NotificationPayload::PropertiesChanged { changed, .. } = notification.payload else {
        panic!("expected a property change");
    };
    assert_eq!(u32::try_from(&changed["State"]).unwrap(), 30);

    nm.unsubscribe().await;
    daemon.emit_state_change(WLAN, 100);
    assert!(source.recv().await.is_none());
}

#[tokio::test]
async fn snapshot_of_the_whole_tree() {
    let daemon = FakeDaemon::with_wifi();
    let nm = bind(&daemon);

    let json = serde_json::to_value(nm.snapshot().await).unwrap();
    assert_eq!(json["Version"], "1.48.10");
    let wlan = &json["Devices"][0];
    assert_eq!(wlan["Interface"], "wlan0");
    assert_eq!(wlan["Mtu"], 1500);
    assert_eq!(wlan["Bitrate"], 144_000);
    assert_eq!(wlan["Ip4Config"]["AddressData"][0]["Address"], "192.168.1.23");
    assert_eq!(wlan["AccessPoints"][0]["Ssid"], "HomeNet");
    assert_eq!(wlan["AccessPoints"][0]["Channel"], 36);
    // Unreadable fields are left out, not reported as errors.
    assert!(wlan.get("Driver").is_none());
    assert!(wlan.get("Dhcp4Config").is_none());
}
