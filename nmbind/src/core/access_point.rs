//! Wi-Fi access points.

use serde::Serialize;
use zvariant::OwnedObjectPath;

use super::object::{best_effort, DbusObject};
use super::session::Session;
use crate::api::models::{ApFlags, ApSecurityFlags, WifiMode};
use crate::types::constants::interface;
use crate::util::utils::{channel_from_freq, decode_ssid_or_empty};
use crate::Result;

/// A Wi-Fi access point (`org.freedesktop.NetworkManager.AccessPoint`).
#[derive(Debug, Clone)]
pub struct AccessPoint {
    object: DbusObject,
}

impl AccessPoint {
    pub(crate) fn new(session: Session, path: OwnedObjectPath) -> Self {
        Self {
            object: DbusObject::new(session, path, interface::ACCESS_POINT),
        }
    }

    /// Object path of this access point.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Capability flags. Unknown bits are dropped.
    pub async fn flags(&self) -> Result<ApFlags> {
        let raw: u32 = self.object.property("Flags").await?;
        Ok(ApFlags::from_bits_truncate(raw))
    }

    /// WPA security capabilities. Unknown bits are dropped.
    pub async fn wpa_flags(&self) -> Result<ApSecurityFlags> {
        let raw: u32 = self.object.property("WpaFlags").await?;
        Ok(ApSecurityFlags::from_bits_truncate(raw))
    }

    /// RSN (WPA2/WPA3) security capabilities. Unknown bits are dropped.
    pub async fn rsn_flags(&self) -> Result<ApSecurityFlags> {
        let raw: u32 = self.object.property("RsnFlags").await?;
        Ok(ApSecurityFlags::from_bits_truncate(raw))
    }

    /// Raw SSID bytes.
    pub async fn ssid(&self) -> Result<Vec<u8>> {
        self.object.property("Ssid").await
    }

    /// Radio channel frequency in MHz.
    pub async fn frequency(&self) -> Result<u32> {
        self.object.property("Frequency").await
    }

    /// BSSID of the access point.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property("HwAddress").await
    }

    /// Mode the access point operates in.
    pub async fn mode(&self) -> Result<WifiMode> {
        let raw: u32 = self.object.property("Mode").await?;
        Ok(raw.into())
    }

    /// Maximum bit rate in kb/s.
    pub async fn max_bitrate(&self) -> Result<u32> {
        self.object.property("MaxBitrate").await
    }

    /// Signal quality in percent.
    pub async fn strength(&self) -> Result<u8> {
        self.object.property("Strength").await
    }

    /// `CLOCK_BOOTTIME` seconds when the access point was last seen in a
    /// scan, `-1` if never.
    pub async fn last_seen(&self) -> Result<i32> {
        self.object.property("LastSeen").await
    }

    /// Reads the access point's properties, plus the channel derived from
    /// the frequency and the SSID as text.
    pub async fn snapshot(&self) -> AccessPointSnapshot {
        let frequency = best_effort("Frequency", self.frequency().await);
        AccessPointSnapshot {
            path: self.path().to_string(),
            ssid: best_effort("Ssid", self.ssid().await)
                .map(|bytes| decode_ssid_or_empty(&bytes).into_owned()),
            flags: best_effort("Flags", self.flags().await).map(flag_names),
            wpa_flags: best_effort("WpaFlags", self.wpa_flags().await).map(flag_names),
            rsn_flags: best_effort("RsnFlags", self.rsn_flags().await).map(flag_names),
            frequency,
            channel: frequency.and_then(channel_from_freq),
            hw_address: best_effort("HwAddress", self.hw_address().await),
            mode: best_effort("Mode", self.mode().await).map(|m| m.to_string()),
            max_bitrate: best_effort("MaxBitrate", self.max_bitrate().await),
            strength: best_effort("Strength", self.strength().await),
            last_seen: best_effort("LastSeen", self.last_seen().await),
        }
    }
}

fn flag_names<F: bitflags::Flags>(flags: F) -> Vec<String> {
    flags.iter_names().map(|(name, _)| name.to_string()).collect()
}

/// Serializable view of an [`AccessPoint`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessPointSnapshot {
    /// Object path.
    pub path: String,
    /// SSID as text; empty for hidden networks or non-UTF-8 SSIDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    /// Capability flag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
    /// WPA flag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_flags: Option<Vec<String>>,
    /// RSN flag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsn_flags: Option<Vec<String>>,
    /// Frequency in MHz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Channel derived from the frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u16>,
    /// BSSID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
    /// Mode, human readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Maximum bit rate in kb/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u32>,
    /// Signal quality in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<u8>,
    /// Last time seen in a scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i32>,
}
