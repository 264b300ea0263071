use crate::domain::connectivity::ConnectionType;

/// One reading from the host platform's network-state feed.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    /// `None` when the platform cannot tell; treated as disconnected.
    pub is_connected: Option<bool>,
    pub connection_type: ConnectionType,
    pub is_internet_reachable: Option<bool>,
    pub details: NetworkDetails,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkDetails {
    pub downlink_mbps: Option<f64>,
    pub interface: Option<String>,
}

impl NetworkState {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn connected(connection_type: ConnectionType) -> Self {
        Self {
            is_connected: Some(true),
            connection_type,
            is_internet_reachable: None,
            details: NetworkDetails::default(),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            is_connected: Some(false),
            connection_type: ConnectionType::None,
            is_internet_reachable: Some(false),
            details: NetworkDetails::default(),
        }
    }

    pub fn link_up(&self) -> bool {
        self.is_connected.unwrap_or(false)
    }

    /// Downlink estimate, dropping values a platform uses as "not reported".
    pub fn downlink_mbps(&self) -> Option<f64> {
        self.details
            .downlink_mbps
            .filter(|mbps| mbps.is_finite() && *mbps >= 0.0)
    }
}
