use chrono::{DateTime, Utc};
use serde::Serialize;

const EXCELLENT_MAX_MS: u64 = 100;
const GOOD_MAX_MS: u64 = 250;
const FAIR_MAX_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Wifi,
    Cellular,
    Ethernet,
    Bluetooth,
    Vpn,
    Wimax,
    Other,
    None,
    Unknown,
}

impl ConnectionType {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Cellular => "cellular",
            Self::Ethernet => "ethernet",
            Self::Bluetooth => "bluetooth",
            Self::Vpn => "vpn",
            Self::Wimax => "wimax",
            Self::Other => "other",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Offline,
}

impl LinkQuality {
    /// Quality tier for a measured round trip on a live link.
    pub fn from_latency_ms(latency_ms: u64) -> Self {
        if latency_ms <= EXCELLENT_MAX_MS {
            Self::Excellent
        } else if latency_ms <= GOOD_MAX_MS {
            Self::Good
        } else if latency_ms <= FAIR_MAX_MS {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Offline => "offline",
        }
    }
}

/// Connectivity state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivitySnapshot {
    pub is_connected: bool,
    pub connection_type: ConnectionType,
    pub quality: LinkQuality,
    pub latency_ms: Option<u64>,
    pub downlink_mbps: Option<f64>,
    pub is_internet_reachable: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl ConnectivitySnapshot {
    /// State assumed before the platform has reported anything.
    pub fn initial(timestamp: DateTime<Utc>) -> Self {
        Self {
            is_connected: true,
            connection_type: ConnectionType::Unknown,
            quality: LinkQuality::Good,
            latency_ms: None,
            downlink_mbps: None,
            is_internet_reachable: None,
            timestamp,
        }
    }
}
