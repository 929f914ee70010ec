//! IPv6 configuration objects.

use serde::Serialize;
use std::net::Ipv6Addr;
use zvariant::OwnedObjectPath;

use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::api::models::{AddressData, Ip6Address, Ip6Route, RouteData};
use crate::types::constants::interface;
use crate::util::utils::{ipv6_from_bytes, parse_address_data, parse_route_data};
use crate::Result;

/// IPv6 configuration of a device or active connection
/// (`org.freedesktop.NetworkManager.IP6Config`).
#[derive(Debug, Clone)]
pub struct Ip6Config {
    object: DbusObject,
}

impl Ip6Config {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::IP6_CONFIG),
        }
    }

    /// Object path of this configuration.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Addresses from the legacy `Addresses` property.
    pub async fn addresses(&self) -> Result<Vec<Ip6Address>> {
        let raw: Vec<(Vec<u8>, u32, Vec<u8>)> = self.object.property("Addresses").await?;
        raw.into_iter()
            .map(|(address, prefix, gateway)| {
                Ok(Ip6Address {
                    address: ipv6_from_bytes("IP6Config.Addresses", &address)?,
                    prefix,
                    gateway: ipv6_from_bytes("IP6Config.Addresses", &gateway)?,
                })
            })
            .collect()
    }

    /// Addresses with their attributes.
    pub async fn address_data(&self) -> Result<Vec<AddressData>> {
        let raw = self.object.property("AddressData").await?;
        parse_address_data("IP6Config.AddressData", raw)
    }

    /// Default gateway, empty if none.
    pub async fn gateway(&self) -> Result<String> {
        self.object.property("Gateway").await
    }

    /// Routes from the legacy `Routes` property.
    pub async fn routes(&self) -> Result<Vec<Ip6Route>> {
        let raw: Vec<(Vec<u8>, u32, Vec<u8>, u32)> = self.object.property("Routes").await?;
        raw.into_iter()
            .map(|(destination, prefix, next_hop, metric)| {
                Ok(Ip6Route {
                    destination: ipv6_from_bytes("IP6Config.Routes", &destination)?,
                    prefix,
                    next_hop: ipv6_from_bytes("IP6Config.Routes", &next_hop)?,
                    metric,
                })
            })
            .collect()
    }

    /// Routes with their attributes.
    pub async fn route_data(&self) -> Result<Vec<RouteData>> {
        let raw = self.object.property("RouteData").await?;
        parse_route_data("IP6Config.RouteData", raw)
    }

    /// DNS servers.
    pub async fn nameservers(&self) -> Result<Vec<Ipv6Addr>> {
        let raw: Vec<Vec<u8>> = self.object.property("Nameservers").await?;
        raw.iter()
            .map(|bytes| ipv6_from_bytes("IP6Config.Nameservers", bytes))
            .collect()
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

    /// Reads the configuration. Fields that fail to read are left out.
    pub async fn snapshot(&self) -> Ip6ConfigSnapshot {
        Ip6ConfigSnapshot {
            addresses: best_effort("AddressData", self.address_data().await),
            gateway: best_effort("Gateway", self.gateway().await),
            routes: best_effort("RouteData", self.route_data().await),
            nameservers: best_effort("Nameservers", self.nameservers().await)
                .map(|servers| servers.iter().map(Ipv6Addr::to_string).collect()),
            domains: best_effort("Domains", self.domains().await),
            searches: best_effort("Searches", self.searches().await),
            dns_options: best_effort("DnsOptions", self.dns_options().await),
            dns_priority: best_effort("DnsPriority", self.dns_priority().await),
        }
    }
}

/// Serializable view of an [`Ip6Config`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ip6ConfigSnapshot {
    /// Addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AddressData>>,
    /// Default gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteData>>,
    /// DNS servers as text.
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
}
