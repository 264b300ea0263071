use serde::Serialize;

use crate::{domain::connectivity::ConnectivitySnapshot, monitor::ConnectivityMonitor};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub snapshot: ConnectivitySnapshot,
    pub total_offline_ms: u64,
}

/// One-shot "test now": re-reads platform state and measures latency.
pub async fn check_status(monitor: &ConnectivityMonitor) -> StatusReport {
    let snapshot = monitor.refresh_status().await;

    StatusReport {
        snapshot,
        total_offline_ms: monitor.total_offline_ms(),
    }
}
