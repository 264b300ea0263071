use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    monitor::{listeners::Subscription, ConnectivityMonitor},
    ui::format,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    pub transitions: usize,
    pub history_len: usize,
    pub total_offline_ms: u64,
}

/// Runs the monitor until `shutdown` resolves, writing one line per
/// transition to `sink`.
pub async fn watch<S, F>(monitor: &ConnectivityMonitor, sink: S, shutdown: F) -> WatchSummary
where
    S: Fn(String) + Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let sink = Arc::new(sink);
    let transitions = Arc::new(AtomicUsize::new(0));

    let subscription = print_transitions(monitor, Arc::clone(&sink), Arc::clone(&transitions));

    monitor.start();
    sink(format::snapshot_line(&monitor.snapshot()));

    shutdown.await;

    subscription.unsubscribe();
    monitor.stop();

    let summary = WatchSummary {
        transitions: transitions.load(Ordering::SeqCst),
        history_len: monitor.history().len(),
        total_offline_ms: monitor.total_offline_ms(),
    };

    tracing::info!(
        transitions = summary.transitions,
        history_len = summary.history_len,
        total_offline_ms = summary.total_offline_ms,
        "connectivity watch finished"
    );

    summary
}

fn print_transitions<S>(
    monitor: &ConnectivityMonitor,
    sink: Arc<S>,
    transitions: Arc<AtomicUsize>,
) -> Subscription
where
    S: Fn(String) + Send + Sync + 'static,
{
    let observer = monitor.downgrade();
    monitor.subscribe(move |event| {
        transitions.fetch_add(1, Ordering::SeqCst);
        let total_offline_ms = observer
            .upgrade()
            .map(|monitor| monitor.total_offline_ms())
            .unwrap_or_default();
        sink(format::event_line(event, total_offline_ms));
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        domain::{connectivity::ConnectionType, network_state::NetworkState},
        test_support::{harness, ScriptedProbe},
    };

    #[tokio::test]
    async fn reports_transitions_until_shutdown() {
        let h = harness(
            NetworkState::connected(ConnectionType::Wifi),
            ScriptedProbe::default(),
        );
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let source = h.source.clone();
        let clock = h.clock.clone();

        let summary = watch(
            &h.monitor,
            move |line| sink_lines.lock().expect("lines lock").push(line),
            async move {
                source.push(NetworkState::disconnected());
                clock.advance_ms(2_000);
                source.push(NetworkState::connected(ConnectionType::Wifi));
            },
        )
        .await;

        assert_eq!(
            summary,
            WatchSummary {
                transitions: 2,
                history_len: 3,
                total_offline_ms: 2_000,
            }
        );

        let lines = lines.lock().expect("lines lock");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("good via wifi"));
        assert!(lines[1].starts_with("[OFFLINE] connection lost"));
        assert_eq!(lines[2], "[ONLINE] back online after 2s");
        assert!(!h.source.is_subscribed());
    }

    #[test]
    fn transition_printer_does_not_keep_monitor_alive() {
        let h = harness(
            NetworkState::connected(ConnectionType::Wifi),
            ScriptedProbe::default(),
        );
        let handle = h.monitor.downgrade();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let transitions = Arc::new(AtomicUsize::new(0));

        let _subscription = print_transitions(
            &h.monitor,
            Arc::new(move |line: String| sink_lines.lock().expect("lines lock").push(line)),
            Arc::clone(&transitions),
        );
        h.monitor.start();
        h.source.push(NetworkState::disconnected());
        assert_eq!(transitions.load(Ordering::SeqCst), 1);
        assert_eq!(lines.lock().expect("lines lock").len(), 1);

        h.monitor.stop();
        drop(h);

        assert!(handle.upgrade().is_none());
    }
}
