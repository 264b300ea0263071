use chrono::{DateTime, Utc};

/// Cumulative offline time plus the currently open offline interval, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfflineAccounting {
    total_offline_ms: u64,
    last_disconnected_at: Option<DateTime<Utc>>,
}

impl OfflineAccounting {
    pub fn mark_disconnected(&mut self, at: DateTime<Utc>) {
        self.last_disconnected_at = Some(at);
    }

    /// Folds the open interval into the total and returns its length.
    pub fn mark_connected(&mut self, at: DateTime<Utc>) -> u64 {
        let interval = self
            .last_disconnected_at
            .take()
            .map(|since| elapsed_ms(since, at))
            .unwrap_or(0);
        self.total_offline_ms = self.total_offline_ms.saturating_add(interval);
        interval
    }

    pub fn total_ms(&self, now: DateTime<Utc>) -> u64 {
        let open = self
            .last_disconnected_at
            .map(|since| elapsed_ms(since, now))
            .unwrap_or(0);
        self.total_offline_ms.saturating_add(open)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn last_disconnected_at(&self) -> Option<DateTime<Utc>> {
        self.last_disconnected_at
    }
}

fn elapsed_ms(since: DateTime<Utc>, until: DateTime<Utc>) -> u64 {
    u64::try_from((until - since).num_milliseconds()).unwrap_or(0)
}
