use crate::{
    domain::connectivity::{ConnectivitySnapshot, LinkQuality},
    ui::format::format_duration_ms,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    Offline,
    Degraded,
}

impl BannerTone {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Offline => "OFFLINE",
            Self::Degraded => "DEGRADED",
        }
    }
}

/// Connectivity notice shown above data-entry screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: BannerTone,
    pub headline: String,
    pub detail: String,
}

impl Banner {
    /// `None` means the link is healthy and no banner should be shown.
    pub fn from_status(snapshot: &ConnectivitySnapshot, total_offline_ms: u64) -> Option<Self> {
        match snapshot.quality {
            LinkQuality::Offline => Some(Self {
                tone: BannerTone::Offline,
                headline: "You are offline".to_owned(),
                detail: format!(
                    "Records stay on this device until the connection returns. Offline for {} in total.",
                    format_duration_ms(total_offline_ms)
                ),
            }),
            LinkQuality::Poor | LinkQuality::Fair => Some(Self {
                tone: BannerTone::Degraded,
                headline: format!("Connection is {}", snapshot.quality.as_label()),
                detail: match snapshot.latency_ms {
                    Some(latency_ms) => {
                        format!("Round trip {latency_ms} ms. Uploads may be slow.")
                    }
                    None => "Uploads may be slow.".to_owned(),
                },
            }),
            LinkQuality::Excellent | LinkQuality::Good => None,
        }
    }
}
