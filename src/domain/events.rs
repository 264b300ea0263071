use chrono::{DateTime, Utc};

use crate::domain::connectivity::ConnectivitySnapshot;

/// Emitted only when the link crosses the online/offline boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectivityEvent {
    Connected {
        snapshot: ConnectivitySnapshot,
        offline_for_ms: u64,
    },
    Disconnected {
        snapshot: ConnectivitySnapshot,
        at: DateTime<Utc>,
    },
}

impl ConnectivityEvent {
    pub fn snapshot(&self) -> &ConnectivitySnapshot {
        match self {
            Self::Connected { snapshot, .. } | Self::Disconnected { snapshot, .. } => snapshot,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "CONNECTIVITY_CONNECTED",
            Self::Disconnected { .. } => "CONNECTIVITY_DISCONNECTED",
        }
    }
}
