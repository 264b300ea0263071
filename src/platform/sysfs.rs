use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    domain::{
        connectivity::ConnectionType,
        network_state::{NetworkDetails, NetworkState},
    },
    monitor::contracts::{FeedSubscription, NetworkStateSource, StateCallback},
};

const SYSFS_FEED_SPAWN_FAILED: &str = "PLATFORM_SYSFS_FEED_SPAWN_FAILED";
const SYSFS_FEED_SHUTDOWN_FAILED: &str = "PLATFORM_SYSFS_FEED_SHUTDOWN_FAILED";
const SYSFS_READ_FAILED: &str = "PLATFORM_SYSFS_READ_FAILED";

pub const DEFAULT_SYSFS_NET_ROOT: &str = "/sys/class/net";

const VPN_PREFIXES: &[&str] = &["tun", "tap", "wg", "ppp"];
const CELLULAR_PREFIXES: &[&str] = &["wwan", "rmnet", "ccmni"];
const BLUETOOTH_PREFIXES: &[&str] = &["bnep"];
const WIMAX_PREFIXES: &[&str] = &["wmx"];

/// Network-state source backed by Linux `/sys/class/net`.
///
/// Subscribing starts a polling worker that reports a new state only when
/// the reading differs from the previous one.
#[derive(Debug, Clone)]
pub struct SysfsNetworkSource {
    root: PathBuf,
    poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
struct InterfaceReading {
    name: String,
    up: bool,
    kind: ConnectionType,
    speed_mbps: Option<f64>,
}

impl SysfsNetworkSource {
    pub fn new(root: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            root: root.into(),
            poll_interval,
        }
    }

    pub fn read_state(&self) -> NetworkState {
        let readings = match read_interfaces(&self.root) {
            Ok(readings) => readings,
            Err(error) => {
                tracing::debug!(
                    code = SYSFS_READ_FAILED,
                    path = %self.root.display(),
                    error = %error,
                    "network interfaces could not be read"
                );
                return NetworkState {
                    is_connected: None,
                    connection_type: ConnectionType::Unknown,
                    is_internet_reachable: None,
                    details: NetworkDetails::default(),
                };
            }
        };

        let preferred = readings
            .into_iter()
            .filter(|reading| reading.up)
            .min_by_key(|reading| preference(reading.kind));

        match preferred {
            Some(reading) => NetworkState {
                is_connected: Some(true),
                connection_type: reading.kind,
                is_internet_reachable: None,
                details: NetworkDetails {
                    downlink_mbps: reading.speed_mbps,
                    interface: Some(reading.name),
                },
            },
            None => NetworkState::disconnected(),
        }
    }
}

impl NetworkStateSource for SysfsNetworkSource {
    fn fetch_current(&self) -> NetworkState {
        self.read_state()
    }

    fn subscribe(&self, on_change: StateCallback) -> FeedSubscription {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let source = self.clone();
        let baseline = self.read_state();

        let spawned = thread::Builder::new()
            .name("netpulse-sysfs-feed".to_owned())
            .spawn(move || run_feed(source, baseline, stop_rx, on_change));

        match spawned {
            Ok(worker) => FeedSubscription::new(move || shutdown(stop_tx, worker)),
            Err(error) => {
                tracing::warn!(
                    code = SYSFS_FEED_SPAWN_FAILED,
                    error = %error,
                    "sysfs network feed worker could not be spawned; link changes will not be observed"
                );
                FeedSubscription::inert()
            }
        }
    }
}

fn run_feed(
    source: SysfsNetworkSource,
    mut last: NetworkState,
    stop_rx: Receiver<()>,
    on_change: StateCallback,
) {
    loop {
        match stop_rx.recv_timeout(source.poll_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let next = source.read_state();
        if next != last {
            on_change(next.clone());
            last = next;
        }
    }
}

fn shutdown(stop_tx: Sender<()>, worker: JoinHandle<()>) {
    let _ = stop_tx.send(());

    // Stopping from inside a feed callback runs on the worker itself.
    if worker.thread().id() == thread::current().id() {
        return;
    }

    if let Err(error) = worker.join() {
        tracing::warn!(
            code = SYSFS_FEED_SHUTDOWN_FAILED,
            error = ?error,
            "sysfs network feed worker panicked on shutdown"
        );
    }
}

fn read_interfaces(root: &Path) -> std::io::Result<Vec<InterfaceReading>> {
    let mut readings = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "lo" {
            continue;
        }
        readings.push(read_interface(&entry.path(), name));
    }

    readings.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(readings)
}

fn read_interface(path: &Path, name: String) -> InterfaceReading {
    let operstate = read_trimmed(&path.join("operstate")).unwrap_or_default();
    let carrier = read_trimmed(&path.join("carrier"));
    let up = operstate == "up" || (operstate == "unknown" && carrier.as_deref() == Some("1"));

    let speed_mbps = read_trimmed(&path.join("speed"))
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|speed| *speed > 0.0);

    InterfaceReading {
        kind: classify(path, &name),
        name,
        up,
        speed_mbps,
    }
}

fn classify(path: &Path, name: &str) -> ConnectionType {
    let has_prefix = |prefixes: &[&str]| prefixes.iter().any(|prefix| name.starts_with(prefix));

    if path.join("wireless").exists() || path.join("phy80211").exists() {
        ConnectionType::Wifi
    } else if has_prefix(VPN_PREFIXES) {
        ConnectionType::Vpn
    } else if has_prefix(CELLULAR_PREFIXES) {
        ConnectionType::Cellular
    } else if has_prefix(BLUETOOTH_PREFIXES) {
        ConnectionType::Bluetooth
    } else if has_prefix(WIMAX_PREFIXES) {
        ConnectionType::Wimax
    } else if path.join("device").exists() {
        ConnectionType::Ethernet
    } else {
        ConnectionType::Other
    }
}

fn preference(kind: ConnectionType) -> u8 {
    match kind {
        ConnectionType::Ethernet => 0,
        ConnectionType::Wifi => 1,
        ConnectionType::Cellular => 2,
        ConnectionType::Wimax => 3,
        ConnectionType::Bluetooth => 4,
        ConnectionType::Vpn => 5,
        ConnectionType::Other | ConnectionType::Unknown | ConnectionType::None => 6,
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|raw| raw.trim().to_owned())
}
