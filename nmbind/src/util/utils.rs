//! Conversions from NetworkManager wire encodings to native values.
//!
//! Covers Wi-Fi helpers (frequency to channel, SSID bytes to text), IP
//! address encodings (network-order `u32`, 16-byte arrays), the `aa{sv}`
//! address and route records, and text rendering of variants for snapshots.

use log::warn;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str;
use zvariant::{OwnedValue, Value};

use crate::api::models::{AddressData, ConnectionSettings, NmError, RouteData};
use crate::types::constants::frequency;
use crate::Result;

/// Converts a Wi-Fi frequency in MHz to a channel number.
///
/// Supports 2.4GHz (channels 1-14), 5GHz, and 6GHz bands.
/// Returns `None` for frequencies outside known Wi-Fi bands.
pub(crate) fn channel_from_freq(mhz: u32) -> Option<u16> {
    match mhz {
        frequency::BAND_2_4_START..=frequency::BAND_2_4_END => {
            Some(((mhz - frequency::BAND_2_4_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        frequency::BAND_2_4_CH14 => Some(14),
        frequency::BAND_5_START..=frequency::BAND_5_END => {
            Some(((mhz - 5000) / frequency::CHANNEL_SPACING) as u16)
        }
        frequency::BAND_6_START..=frequency::BAND_6_END => {
            Some(((mhz - frequency::BAND_6_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        _ => None,
    }
}

/// Decode SSID bytes, defaulting to an empty string if invalid UTF-8.
pub(crate) fn decode_ssid_or_empty(bytes: &[u8]) -> Cow<'static, str> {
    if bytes.is_empty() {
        return Cow::Borrowed("");
    }

    match str::from_utf8(bytes) {
        Ok(s) => Cow::Owned(s.to_owned()),
        Err(e) => {
            warn!("Invalid UTF-8 in SSID: {e}");
            Cow::Borrowed("")
        }
    }
}

/// Converts an IPv4 address stored as a `u32` in network byte order.
///
/// NetworkManager puts the raw `in_addr_t` on the wire, so the address
/// octets are the integer's in-memory bytes.
pub(crate) fn ipv4_from_network_order(addr: u32) -> Ipv4Addr {
    Ipv4Addr::from(addr.to_ne_bytes())
}

/// Converts a 16-byte array to an IPv6 address.
pub(crate) fn ipv6_from_bytes(context: &str, bytes: &[u8]) -> Result<Ipv6Addr> {
    let octets: [u8; 16] = bytes.try_into().map_err(|_| NmError::Decode {
        context: context.to_string(),
        reason: format!("expected 16 address bytes, got {}", bytes.len()),
    })?;
    Ok(Ipv6Addr::from(octets))
}

fn unwrap_variant<'a, 'b>(value: &'b Value<'a>) -> &'b Value<'a> {
    match value {
        Value::Value(inner) => unwrap_variant(inner),
        other => other,
    }
}

fn str_field<'a>(entry: &'a HashMap<String, OwnedValue>, key: &str) -> Option<&'a str> {
    match unwrap_variant(entry.get(key)?) {
        Value::Str(s) => Some(s.as_str()),
        _ => None,
    }
}

fn u32_field(entry: &HashMap<String, OwnedValue>, key: &str) -> Option<u32> {
    match unwrap_variant(entry.get(key)?) {
        Value::U32(v) => Some(*v),
        _ => None,
    }
}

fn missing(context: &str, key: &str) -> NmError {
    NmError::Decode {
        context: context.to_string(),
        reason: format!("entry without a valid '{key}' field"),
    }
}

fn remainder(entry: &HashMap<String, OwnedValue>, known: &[&str]) -> BTreeMap<String, String> {
    entry
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), render_value(v)))
        .collect()
}

/// Decodes an `AddressData` property.
pub(crate) fn parse_address_data(
    context: &str,
    entries: Vec<HashMap<String, OwnedValue>>,
) -> Result<Vec<AddressData>> {
    entries
        .iter()
        .map(|entry| {
            Ok(AddressData {
                address: str_field(entry, "address")
                    .ok_or_else(|| missing(context, "address"))?
                    .to_string(),
                prefix: u32_field(entry, "prefix").ok_or_else(|| missing(context, "prefix"))?,
                attributes: remainder(entry, &["address", "prefix"]),
            })
        })
        .collect()
}

/// Decodes a `RouteData` property. Keys other than `dest`, `prefix`,
/// `next-hop` and `metric` are kept as text in `attributes`.
pub(crate) fn parse_route_data(
    context: &str,
    entries: Vec<HashMap<String, OwnedValue>>,
) -> Result<Vec<RouteData>> {
    entries
        .iter()
        .map(|entry| {
            Ok(RouteData {
                destination: str_field(entry, "dest")
                    .ok_or_else(|| missing(context, "dest"))?
                    .to_string(),
                prefix: u32_field(entry, "prefix").ok_or_else(|| missing(context, "prefix"))?,
                next_hop: str_field(entry, "next-hop").map(str::to_string),
                metric: u32_field(entry, "metric"),
                attributes: remainder(entry, &["dest", "prefix", "next-hop", "metric"]),
            })
        })
        .collect()
}

/// Extracts the `address` field of every `NameserverData` entry.
pub(crate) fn parse_nameserver_data(
    context: &str,
    entries: Vec<HashMap<String, OwnedValue>>,
) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            str_field(entry, "address")
                .map(str::to_string)
                .ok_or_else(|| missing(context, "address"))
        })
        .collect()
}

/// Renders a variant as text for snapshots.
///
/// Strings and numbers are rendered bare, byte arrays as text when they
/// are valid UTF-8, everything else in zvariant's textual notation.
pub(crate) fn render_value(value: &Value<'_>) -> String {
    match unwrap_variant(value) {
        Value::Str(s) => s.as_str().to_string(),
        Value::ObjectPath(p) => p.as_str().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::U8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        other => render_bytes(other).unwrap_or_else(|| other.to_string()),
    }
}

fn render_bytes(value: &Value<'_>) -> Option<String> {
    if !matches!(value, Value::Array(_)) {
        return None;
    }
    let bytes = Vec::<u8>::try_from(Value::from(value.try_to_owned().ok()?)).ok()?;
    String::from_utf8(bytes).ok()
}

/// Renders an `a{sv}` dictionary with sorted keys.
pub(crate) fn render_map(map: &HashMap<String, OwnedValue>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), render_value(v)))
        .collect()
}

/// Renders a settings dictionary with sorted setting and property names.
pub(crate) fn render_settings(
    settings: &ConnectionSettings,
) -> BTreeMap<String, BTreeMap<String, String>> {
    settings
        .iter()
        .map(|(name, props)| (name.clone(), render_map(props)))
        .collect()
}

/// Looks up `connection.<key>` in a settings dictionary as a string.
pub(crate) fn connection_field(settings: &ConnectionSettings, key: &str) -> Option<String> {
    str_field(settings.get("connection")?, key).map(str::to_string)
}
