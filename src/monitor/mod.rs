//! Connectivity monitor: the single owner of link state, latency quality,
//! snapshot history and offline accounting.

pub mod clock;
pub mod contracts;
pub mod listeners;
pub mod probe;

use std::{
    collections::VecDeque,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
    time::Duration,
};

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::{
    connectivity::{ConnectivitySnapshot, LinkQuality},
    events::ConnectivityEvent,
    history::{ConnectivityHistory, DEFAULT_HISTORY_CAPACITY},
    network_state::NetworkState,
    offline::OfflineAccounting,
};

use self::{
    clock::Clock,
    contracts::{FeedSubscription, NetworkStateSource},
    listeners::{ListenerSet, Subscription},
    probe::{ProbeOutcome, ProbeStrategy},
};

const MONITOR_STARTED: &str = "CONNECTIVITY_MONITOR_STARTED";
const MONITOR_STOPPED: &str = "CONNECTIVITY_MONITOR_STOPPED";
const MONITOR_ALREADY_STARTED: &str = "CONNECTIVITY_MONITOR_ALREADY_STARTED";
const MONITOR_NO_RUNTIME: &str = "CONNECTIVITY_MONITOR_NO_RUNTIME";
const PROBE_FAILED: &str = "CONNECTIVITY_PROBE_FAILED";
const PROBE_DISCARDED: &str = "CONNECTIVITY_PROBE_DISCARDED";

/// Returns the monitor module name for smoke checks.
pub fn module_name() -> &'static str {
    "monitor"
}

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);
const MIN_PROBE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub probe_interval: Duration,
    pub history_capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            probe_interval: DEFAULT_PROBE_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Shared handle to the process-wide connectivity monitor.
///
/// Cloning is cheap; every clone observes and drives the same state. Reads
/// return copies, so callers never hold the live snapshot or history.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    settings: MonitorSettings,
    source: Arc<dyn NetworkStateSource>,
    probe: Arc<dyn ProbeStrategy>,
    clock: Arc<dyn Clock>,
    state: Mutex<MonitorState>,
    listeners: ListenerSet,
    dispatch: Mutex<DispatchQueue>,
    lifecycle: Mutex<Lifecycle>,
    active: AtomicBool,
}

/// Transition events waiting for delivery, in the order the state changed.
///
/// Events are queued while the state lock is held. Whichever caller finds
/// the queue idle delivers until it is empty; concurrent or reentrant
/// callers only enqueue.
#[derive(Default)]
struct DispatchQueue {
    pending: VecDeque<ConnectivityEvent>,
    draining: bool,
}

struct MonitorState {
    current: ConnectivitySnapshot,
    history: ConnectivityHistory,
    offline: OfflineAccounting,
}

#[derive(Default)]
struct Lifecycle {
    feed: Option<FeedSubscription>,
    ticker: Option<JoinHandle<()>>,
    runtime: Option<Handle>,
}

impl ConnectivityMonitor {
    pub fn new(
        settings: MonitorSettings,
        source: Arc<dyn NetworkStateSource>,
        probe: Arc<dyn ProbeStrategy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = MonitorState {
            current: ConnectivitySnapshot::initial(clock.now()),
            history: ConnectivityHistory::with_capacity(settings.history_capacity),
            offline: OfflineAccounting::default(),
        };

        Self {
            inner: Arc::new(MonitorInner {
                settings,
                source,
                probe,
                clock,
                state: Mutex::new(state),
                listeners: ListenerSet::default(),
                dispatch: Mutex::new(DispatchQueue::default()),
                lifecycle: Mutex::new(Lifecycle::default()),
                active: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribes to the platform feed, applies the current platform state and
    /// starts the periodic latency probe.
    ///
    /// The probe timer needs a Tokio runtime; without one the monitor still
    /// tracks link state but latency is only measured on demand.
    pub fn start(&self) {
        let runtime = {
            let mut lifecycle = self.lifecycle();
            if lifecycle.feed.is_some() {
                tracing::warn!(
                    code = MONITOR_ALREADY_STARTED,
                    "connectivity monitor start ignored; already running"
                );
                return;
            }
            lifecycle.runtime = Handle::try_current().ok();
            lifecycle.runtime.clone()
        };

        self.inner.active.store(true, Ordering::SeqCst);

        let weak = self.downgrade();
        let feed = self.inner.source.subscribe(Box::new(move |state| {
            if let Some(monitor) = weak.upgrade() {
                if monitor.inner.active.load(Ordering::SeqCst) {
                    monitor.apply_network_state(state);
                }
            }
        }));

        let initial = self.inner.source.fetch_current();
        self.apply_network_state(initial);

        let period = self.inner.settings.probe_interval.max(MIN_PROBE_INTERVAL);
        let ticker = match &runtime {
            Some(handle) => Some(handle.spawn(run_probe_ticker(self.downgrade(), period))),
            None => {
                tracing::warn!(
                    code = MONITOR_NO_RUNTIME,
                    "no async runtime available; periodic latency probe disabled"
                );
                None
            }
        };

        {
            let mut lifecycle = self.lifecycle();
            lifecycle.feed = Some(feed);
            lifecycle.ticker = ticker;
        }

        tracing::info!(
            code = MONITOR_STARTED,
            probe_interval_secs = period.as_secs(),
            history_capacity = self.inner.settings.history_capacity,
            "connectivity monitor started"
        );
    }

    /// Drops the feed subscription and cancels the probe timer. Safe to call
    /// when the monitor was never started.
    pub fn stop(&self) {
        self.inner.active.store(false, Ordering::SeqCst);

        let (feed, ticker) = {
            let mut lifecycle = self.lifecycle();
            lifecycle.runtime = None;
            (lifecycle.feed.take(), lifecycle.ticker.take())
        };

        if let Some(ticker) = ticker {
            ticker.abort();
        }

        if let Some(feed) = feed {
            drop(feed);
            tracing::info!(code = MONITOR_STOPPED, "connectivity monitor stopped");
        }
    }

    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.state().current.clone()
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<ConnectivitySnapshot> {
        self.state().history.to_vec()
    }

    pub fn total_offline_ms(&self) -> u64 {
        let now = self.inner.clock.now();
        self.state().offline.total_ms(now)
    }

    pub fn downgrade(&self) -> WeakMonitor {
        WeakMonitor {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ConnectivityEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(listener)
    }

    /// Runs one latency probe and folds the result into the current snapshot.
    ///
    /// Returns `None` while offline (without touching the network) and when
    /// the probe fails. A skipped probe returns the last known latency.
    pub async fn measure_latency(&self) -> Option<u64> {
        {
            let mut state = self.state();
            if !state.current.is_connected {
                state.current.latency_ms = None;
                state.current.quality = LinkQuality::Offline;
                return None;
            }
        }

        let outcome = self.inner.probe.probe().await;
        let now = self.inner.clock.now();

        match outcome {
            ProbeOutcome::Skipped => self.state().current.latency_ms,
            ProbeOutcome::Measured(elapsed) => {
                let latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                let applied = {
                    let mut state = self.state();
                    if state.current.is_connected {
                        let current = &mut state.current;
                        current.latency_ms = Some(latency_ms);
                        current.quality = LinkQuality::from_latency_ms(latency_ms);
                        current.timestamp = now.max(current.timestamp);
                        true
                    } else {
                        false
                    }
                };

                if applied {
                    tracing::debug!(
                        latency_ms,
                        quality = LinkQuality::from_latency_ms(latency_ms).as_label(),
                        "latency probe completed"
                    );
                    Some(latency_ms)
                } else {
                    tracing::debug!(
                        code = PROBE_DISCARDED,
                        latency_ms,
                        "latency probe finished after link went down; result discarded"
                    );
                    None
                }
            }
            ProbeOutcome::Failed(error) => {
                self.state().current.latency_ms = None;
                tracing::warn!(
                    code = PROBE_FAILED,
                    error = %error,
                    "latency probe failed; latency is now unknown"
                );
                None
            }
        }
    }

    /// Re-reads platform state, applies it, measures latency and returns the
    /// resulting snapshot.
    pub async fn refresh_status(&self) -> ConnectivitySnapshot {
        let state = self.inner.source.fetch_current();
        self.apply_network_state(state);
        self.measure_latency().await;
        self.snapshot()
    }

    fn apply_network_state(&self, network: NetworkState) -> ConnectivitySnapshot {
        let now = self.inner.clock.now();
        let is_connected = network.link_up();

        let (snapshot, event) = {
            let mut state = self.state();
            let previous = &state.current;
            let was_connected = previous.is_connected;

            let quality = match (is_connected, previous.quality) {
                (false, _) => LinkQuality::Offline,
                (true, LinkQuality::Offline) => LinkQuality::Good,
                (true, carried) => carried,
            };

            let snapshot = ConnectivitySnapshot {
                is_connected,
                connection_type: network.connection_type,
                quality,
                latency_ms: if is_connected { previous.latency_ms } else { None },
                downlink_mbps: network.downlink_mbps(),
                is_internet_reachable: network.is_internet_reachable,
                timestamp: now.max(previous.timestamp),
            };

            state.current = snapshot.clone();
            state.history.push(snapshot.clone());

            let event = match (was_connected, is_connected) {
                (true, false) => {
                    state.offline.mark_disconnected(snapshot.timestamp);
                    Some(ConnectivityEvent::Disconnected {
                        snapshot: snapshot.clone(),
                        at: snapshot.timestamp,
                    })
                }
                (false, true) => {
                    let offline_for_ms = state.offline.mark_connected(snapshot.timestamp);
                    Some(ConnectivityEvent::Connected {
                        snapshot: snapshot.clone(),
                        offline_for_ms,
                    })
                }
                _ => None,
            };

            if let Some(event) = &event {
                self.dispatch().pending.push_back(event.clone());
            }

            (snapshot, event)
        };

        tracing::debug!(
            connected = snapshot.is_connected,
            connection_type = snapshot.connection_type.as_label(),
            quality = snapshot.quality.as_label(),
            interface = network.details.interface.as_deref().unwrap_or("-"),
            "network state applied"
        );

        if let Some(event) = event {
            tracing::info!(
                code = event.as_label(),
                connection_type = snapshot.connection_type.as_label(),
                "connectivity transition"
            );

            self.deliver_pending();

            if matches!(event, ConnectivityEvent::Connected { .. }) {
                self.spawn_latency_refresh();
            }
        }

        snapshot
    }

    /// Delivers queued transitions unless another caller is already doing so.
    fn deliver_pending(&self) {
        {
            let mut queue = self.dispatch();
            if queue.draining {
                return;
            }
            queue.draining = true;
        }

        loop {
            let next = {
                let mut queue = self.dispatch();
                let next = queue.pending.pop_front();
                if next.is_none() {
                    queue.draining = false;
                }
                next
            };

            let Some(event) = next else {
                return;
            };
            self.inner.listeners.emit(&event);
        }
    }

    fn spawn_latency_refresh(&self) {
        let runtime = self
            .lifecycle()
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok());

        match runtime {
            Some(handle) => {
                let monitor = self.clone();
                handle.spawn(async move {
                    monitor.measure_latency().await;
                });
            }
            None => tracing::debug!(
                code = MONITOR_NO_RUNTIME,
                "no async runtime available; skipping reconnect latency probe"
            ),
        }
    }

    fn state(&self) -> MutexGuard<'_, MonitorState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self) -> MutexGuard<'_, DispatchQueue> {
        self.inner
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("settings", &self.inner.settings)
            .field("active", &self.inner.active.load(Ordering::SeqCst))
            .field("listeners", &self.inner.listeners)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle for callbacks stored inside the monitor itself.
#[derive(Debug, Clone)]
pub struct WeakMonitor {
    inner: Weak<MonitorInner>,
}

impl WeakMonitor {
    pub fn upgrade(&self) -> Option<ConnectivityMonitor> {
        self.inner
            .upgrade()
            .map(|inner| ConnectivityMonitor { inner })
    }
}

async fn run_probe_ticker(handle: WeakMonitor, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(monitor) = handle.upgrade() else {
            return;
        };
        monitor.measure_latency().await;
    }
}
