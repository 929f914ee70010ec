//! zbus-backed [`Transport`].

use async_trait::async_trait;
use futures::stream::StreamExt;
use log::{debug, warn};
use std::collections::HashMap;
use zbus::message::Type as MessageType;
use zbus::{Connection, MatchRule, Message, MessageStream};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Signature, Structure, StructureBuilder, Value};

use super::transport::{Notification, NotificationPayload, NotificationStream, Transport};
use crate::api::models::{BusConfig, BusKind, NmError};
use crate::types::constants::interface;
use crate::Result;

/// A [`Transport`] over a live zbus connection.
///
/// Every request is addressed to one service (normally
/// `org.freedesktop.NetworkManager`). Cloning is cheap: zbus connections are
/// reference counted.
#[derive(Debug, Clone)]
pub struct BusTransport {
    conn: Connection,
    service: String,
}

impl BusTransport {
    /// Connects to the bus named in `config`.
    pub async fn connect(config: &BusConfig) -> Result<Self> {
        let conn = match &config.bus {
            BusKind::System => Connection::system().await,
            BusKind::Session => Connection::session().await,
            BusKind::Address(address) => match zbus::connection::Builder::address(address.as_str())
            {
                Ok(builder) => builder.build().await,
                Err(e) => Err(e),
            },
        }
        .map_err(|e| NmError::from_bus("connecting to the message bus", e))?;

        debug!("Connected to {:?} for service {}", config.bus, config.service);
        Ok(Self::from_connection(conn, config.service.clone()))
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection, service: impl Into<String>) -> Self {
        Self {
            conn,
            service: service.into(),
        }
    }

    /// Returns the underlying zbus connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl Transport for BusTransport {
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        method: &str,
        args: Vec<OwnedValue>,
    ) -> Result<Vec<OwnedValue>> {
        let context = format!("{interface}.{method} on {path}");
        debug!("Calling {context} with {} argument(s)", args.len());

        let reply = if args.is_empty() {
            self.conn
                .call_method(
                    Some(self.service.as_str()),
                    path.clone(),
                    Some(interface),
                    method,
                    &(),
                )
                .await
        } else {
            let body = encode_args(args)?;
            self.conn
                .call_method(
                    Some(self.service.as_str()),
                    path.clone(),
                    Some(interface),
                    method,
                    &body,
                )
                .await
        }
        .map_err(|e| NmError::from_bus(context.clone(), e))?;

        decode_body(&context, &reply)
    }

    async fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
    ) -> Result<OwnedValue> {
        let context = format!("reading {interface}.{name} on {path}");
        let reply = self
            .conn
            .call_method(
                Some(self.service.as_str()),
                path.clone(),
                Some(interface::PROPERTIES),
                "Get",
                &(interface, name),
            )
            .await
            .map_err(|e| NmError::from_bus(context.clone(), e))?;

        reply
            .body()
            .deserialize::<OwnedValue>()
            .map_err(|e| NmError::from_bus(context, e))
    }

    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        name: &str,
        value: OwnedValue,
    ) -> Result<()> {
        let context = format!("writing {interface}.{name} on {path}");
        debug!("{context}");
        self.conn
            .call_method(
                Some(self.service.as_str()),
                path.clone(),
                Some(interface::PROPERTIES),
                "Set",
                &(interface, name, Value::from(value)),
            )
            .await
            .map_err(|e| NmError::from_bus(context, e))?;
        Ok(())
    }

    async fn subscribe(&self, namespace: &ObjectPath<'_>) -> Result<NotificationStream> {
        let context = format!("subscribing to {namespace}");
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .sender(self.service.as_str())
            .and_then(|b| b.path_namespace(namespace.clone()))
            .map_err(|e| NmError::from_bus(context.clone(), e))?
            .build();

        let stream = MessageStream::for_match_rule(rule, &self.conn, None)
            .await
            .map_err(|e| NmError::from_bus(context, e))?;

        debug!("Listening for signals under {namespace}");

        Ok(stream
            .filter_map(|msg| async move {
                match msg {
                    Ok(msg) => notification_from_message(&msg),
                    Err(e) => {
                        warn!("Dropping unreadable signal: {e}");
                        None
                    }
                }
            })
            .boxed())
    }
}

/// Packs dynamic arguments into a message body.
fn encode_args(args: Vec<OwnedValue>) -> Result<Structure<'static>> {
    args.into_iter()
        .fold(StructureBuilder::new(), |builder, arg| {
            builder.append_field(Value::from(arg))
        })
        .build()
        .map_err(|e| NmError::InvalidArgument(format!("cannot encode call arguments: {e}")))
}

/// Splits a message body into its top-level values.
///
/// zbus reports the same signature for a body of several values and for a
/// body holding one struct, so a single struct argument comes back as its
/// fields. No NetworkManager method or signal used here replies with a lone
/// struct; such a call would need a typed body instead.
fn decode_body(context: &str, msg: &Message) -> Result<Vec<OwnedValue>> {
    let body = msg.body();
    if matches!(body.signature(), Signature::Unit) {
        return Ok(Vec::new());
    }

    let fields = body
        .deserialize::<Structure<'_>>()
        .map_err(|e| NmError::from_bus(context.to_string(), e))?
        .into_fields();

    fields
        .into_iter()
        .map(|field| {
            OwnedValue::try_from(field).map_err(|e| NmError::Decode {
                context: context.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn notification_from_message(msg: &Message) -> Option<Notification> {
    let header = msg.header();
    let path = OwnedObjectPath::try_from(header.path()?.as_str()).ok()?;
    let iface = header.interface()?.to_string();
    let member = header.member()?.to_string();

    if iface == interface::PROPERTIES && member == "PropertiesChanged" {
        let (changed_iface, changed, invalidated) = match msg
            .body()
            .deserialize::<(String, HashMap<String, OwnedValue>, Vec<String>)>()
        {
            Ok(body) => body,
            Err(e) => {
                warn!("Malformed PropertiesChanged from {path}: {e}");
                return None;
            }
        };
        return Some(Notification {
            path,
            interface: changed_iface,
            payload: NotificationPayload::PropertiesChanged {
                changed,
                invalidated,
            },
        });
    }

    match decode_body(&member, msg) {
        Ok(args) => Some(Notification {
            path,
            interface: iface,
            payload: NotificationPayload::Signal { name: member, args },
        }),
        Err(e) => {
            warn!("Malformed {iface}.{member} from {path}: {e}");
            None
        }
    }
}
