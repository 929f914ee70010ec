//! IPv4 configuration objects.

use serde::Serialize;
use std::net::Ipv4Addr;
use zvariant::OwnedObjectPath;

use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::api::models::{AddressData, Ip4Address, Ip4Route, NmError, RouteData};
use crate::types::constants::interface;
use crate::util::utils::{
    ipv4_from_network_order, parse_address_data, parse_nameserver_data, parse_route_data,
};
use crate::Result;

/// IPv4 configuration of a device or active connection
/// (`org.freedesktop.NetworkManager.IP4Config`).
///
/// Integer-encoded addresses are in network byte order and are returned as
/// [`Ipv4Addr`].
#[derive(Debug, Clone)]
pub struct Ip4Config {
    object: DbusObject,
}

impl Ip4Config {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::IP4_CONFIG),
        }
    }

    /// Object path of this configuration.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Addresses from the legacy `Addresses` property.
    pub async fn addresses(&self) -> Result<Vec<Ip4Address>> {
        let raw: Vec<Vec<u32>> = self.object.property("Addresses").await?;
        raw.into_iter()
            .map(|entry| match entry.as_slice() {
                [address, prefix, gateway] => Ok(Ip4Address {
                    address: ipv4_from_network_order(*address),
                    prefix: *prefix,
                    gateway: ipv4_from_network_order(*gateway),
                }),
                other => Err(short_entry("Addresses", 3, other.len())),
            })
            .collect()
    }

    /// Addresses with their attributes.
    pub async fn address_data(&self) -> Result<Vec<AddressData>> {
        let raw = self.object.property("AddressData").await?;
        parse_address_data("IP4Config.AddressData", raw)
    }

    /// Default gateway, empty if none.
    pub async fn gateway(&self) -> Result<String> {
        self.object.property("Gateway").await
    }

    /// Routes from the legacy `Routes` property.
    pub async fn routes(&self) -> Result<Vec<Ip4Route>> {
        let raw: Vec<Vec<u32>> = self.object.property("Routes").await?;
        raw.into_iter()
            .map(|entry| match entry.as_slice() {
                [destination, prefix, next_hop, metric] => Ok(Ip4Route {
                    destination: ipv4_from_network_order(*destination),
                    prefix: *prefix,
                    next_hop: ipv4_from_network_order(*next_hop),
                    metric: *metric,
                }),
                other => Err(short_entry("Routes", 4, other.len())),
            })
            .collect()
    }

    /// Routes with their attributes.
    pub async fn route_data(&self) -> Result<Vec<RouteData>> {
        let raw = self.object.property("RouteData").await?;
        parse_route_data("IP4Config.RouteData", raw)
    }

    /// DNS servers.
    pub async fn nameservers(&self) -> Result<Vec<Ipv4Addr>> {
        let raw: Vec<u32> = self.object.property("Nameservers").await?;
        Ok(raw.into_iter().map(ipv4_from_network_order).collect())
    }

    /// DNS server addresses from `NameserverData`.
    pub async fn nameserver_data(&self) -> Result<Vec<String>> {
        let raw = self.object.property("NameserverData").await?;
        parse_nameserver_data("IP4Config.NameserverData", raw)
    }

    /// DNS domains.
    pub async fn domains(&self) -> Result<Vec<String>> {
        self.object.property("Domains").await
    }

    /// DNS search domains.
    pub async fn searches(&self) -> Result<Vec<String>> {
        self.object.property("Searches").await
    }

    /// Resolver options.
    pub async fn dns_options(&self) -> Result<Vec<String>> {
        self.object.property("DnsOptions").await
    }

    /// Relative priority of the DNS servers.
    pub async fn dns_priority(&self) -> Result<i32> {
        self.object.property("DnsPriority").await
    }

    /// WINS servers.
    pub async fn wins_servers(&self) -> Result<Vec<Ipv4Addr>> {
        let raw: Vec<u32> = self.object.property("WinsServers").await?;
        Ok(raw.into_iter().map(ipv4_from_network_order).collect())
    }

    /// WINS server addresses as text.
    pub async fn wins_server_data(&self) -> Result<Vec<String>> {
        self.object.property("WinsServerData").await
    }

    /// Reads the configuration. Fields that fail to read are left out.
    pub async fn snapshot(&self) -> Ip4ConfigSnapshot {
        Ip4ConfigSnapshot {
            addresses: best_effort("AddressData", self.address_data().await),
            gateway: best_effort("Gateway", self.gateway().await),
            routes: best_effort("RouteData", self.route_data().await),
            nameservers: best_effort("NameserverData", self.nameserver_data().await),
            domains: best_effort("Domains", self.domains().await),
            searches: best_effort("Searches", self.searches().await),
            dns_options: best_effort("DnsOptions", self.dns_options().await),
            dns_priority: best_effort("DnsPriority", self.dns_priority().await),
            wins_servers: best_effort("WinsServerData", self.wins_server_data().await),
        }
    }
}

fn short_entry(property: &str, expected: usize, got: usize) -> NmError {
    NmError::Decode {
        context: format!("IP4Config.{property}"),
        reason: format!("entry has {got} element(s), expected {expected}"),
    }
}

/// Serializable view of an [`Ip4Config`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip4ConfigSnapshot {
    /// Addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AddressData>>,
    /// Default gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteData>>,
    /// DNS servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,
    /// DNS domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    /// DNS search domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searches: Option<Vec<String>>,
    /// Resolver options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_options: Option<Vec<String>>,
    /// DNS priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_priority: Option<i32>,
    /// WINS servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins_servers: Option<Vec<String>>,
}
