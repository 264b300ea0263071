use std::collections::VecDeque;

use crate::domain::connectivity::ConnectivitySnapshot;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded chronological record of snapshots; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct ConnectivityHistory {
    entries: VecDeque<ConnectivitySnapshot>,
    capacity: usize,
}

impl ConnectivityHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: ConnectivitySnapshot) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn last(&self) -> Option<&ConnectivitySnapshot> {
        self.entries.back()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_vec(&self) -> Vec<ConnectivitySnapshot> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for ConnectivityHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
