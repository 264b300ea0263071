use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    domain::history::DEFAULT_HISTORY_CAPACITY,
    monitor::DEFAULT_PROBE_INTERVAL,
    platform::{
        http_probe::{DEFAULT_PROBE_TIMEOUT, DEFAULT_PROBE_URL},
        sysfs::DEFAULT_SYSFS_NET_ROOT,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub monitor: MonitorConfig,
    pub probe: ProbeConfig,
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    pub probe_interval_secs: u64,
    pub history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_interval_secs: DEFAULT_PROBE_INTERVAL.as_secs(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    #[default]
    Http,
    Passive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeConfig {
    pub mode: ProbeMode,
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Http,
            url: DEFAULT_PROBE_URL.to_owned(),
            timeout_ms: u64::try_from(DEFAULT_PROBE_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformConfig {
    pub sysfs_net_root: PathBuf,
    pub poll_interval_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            sysfs_net_root: PathBuf::from(DEFAULT_SYSFS_NET_ROOT),
            poll_interval_ms: 2_000,
        }
    }
}
