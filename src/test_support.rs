use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    domain::network_state::NetworkState,
    monitor::{
        clock::Clock,
        contracts::{FeedSubscription, NetworkStateSource, StateCallback},
        probe::{ProbeError, ProbeOutcome, ProbeStrategy},
        ConnectivityMonitor, MonitorSettings,
    },
};

type SharedCallback = Arc<dyn Fn(NetworkState) + Send + Sync>;

#[derive(Default)]
struct ManualSourceState {
    current: Option<NetworkState>,
    callback: Option<SharedCallback>,
    fetches: usize,
}

/// Network-state source driven by the test body.
#[derive(Clone, Default)]
pub struct ManualNetworkSource {
    state: Arc<Mutex<ManualSourceState>>,
}

impl ManualNetworkSource {
    pub fn with_current(state: NetworkState) -> Self {
        let source = Self::default();
        source.set_current(state);
        source
    }

    pub fn set_current(&self, state: NetworkState) {
        self.state.lock().expect("source lock").current = Some(state);
    }

    /// Records `state` as current and delivers it to the subscriber, if any.
    pub fn push(&self, state: NetworkState) {
        let callback = {
            let mut guard = self.state.lock().expect("source lock");
            guard.current = Some(state.clone());
            guard.callback.clone()
        };

        if let Some(callback) = callback {
            callback(state);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.lock().expect("source lock").callback.is_some()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().expect("source lock").fetches
    }
}

impl NetworkStateSource for ManualNetworkSource {
    fn fetch_current(&self) -> NetworkState {
        let mut guard = self.state.lock().expect("source lock");
        guard.fetches += 1;
        guard
            .current
            .clone()
            .unwrap_or_else(NetworkState::disconnected)
    }

    fn subscribe(&self, on_change: StateCallback) -> FeedSubscription {
        self.state.lock().expect("source lock").callback = Some(Arc::from(on_change));

        let state = Arc::downgrade(&self.state);
        FeedSubscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.lock().expect("source lock").callback = None;
            }
        })
    }
}

/// Probe that replays queued outcomes and reports `Skipped` once drained.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    outcomes: Arc<Mutex<VecDeque<ProbeOutcome>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn then_measured(self, latency_ms: u64) -> Self {
        self.outcomes
            .lock()
            .expect("probe lock")
            .push_back(ProbeOutcome::Measured(Duration::from_millis(latency_ms)));
        self
    }

    pub fn then_timeout(self) -> Self {
        self.outcomes
            .lock()
            .expect("probe lock")
            .push_back(ProbeOutcome::Failed(ProbeError::Timeout { after_ms: 8_000 }));
        self
    }

    pub fn then_skipped(self) -> Self {
        self.outcomes
            .lock()
            .expect("probe lock")
            .push_back(ProbeOutcome::Skipped);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeStrategy for ScriptedProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .expect("probe lock")
            .pop_front()
            .unwrap_or(ProbeOutcome::Skipped)
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid start instant");
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += chrono::Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub struct Harness {
    pub monitor: ConnectivityMonitor,
    pub source: ManualNetworkSource,
    pub probe: ScriptedProbe,
    pub clock: ManualClock,
}

pub fn harness(initial: NetworkState, probe: ScriptedProbe) -> Harness {
    let source = ManualNetworkSource::with_current(initial);
    let clock = ManualClock::new();
    let monitor = ConnectivityMonitor::new(
        MonitorSettings::default(),
        Arc::new(source.clone()),
        Arc::new(probe.clone()),
        Arc::new(clock.clone()),
    );

    Harness {
        monitor,
        source,
        probe,
        clock,
    }
}
