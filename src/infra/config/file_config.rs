use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{
    AppConfig, LogConfig, MonitorConfig, PlatformConfig, ProbeConfig, ProbeMode,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub monitor: Option<FileMonitorConfig>,
    pub probe: Option<FileProbeConfig>,
    pub platform: Option<FilePlatformConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(monitor) = self.monitor {
            monitor.merge_into(&mut config.monitor);
        }

        if let Some(probe) = self.probe {
            probe.merge_into(&mut config.probe);
        }

        if let Some(platform) = self.platform {
            platform.merge_into(&mut config.platform);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileMonitorConfig {
    pub probe_interval_secs: Option<u64>,
    pub history_capacity: Option<usize>,
}

impl FileMonitorConfig {
    fn merge_into(self, config: &mut MonitorConfig) {
        if let Some(interval) = self.probe_interval_secs {
            config.probe_interval_secs = interval;
        }

        if let Some(capacity) = self.history_capacity {
            config.history_capacity = capacity;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileProbeConfig {
    pub mode: Option<ProbeMode>,
    pub url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl FileProbeConfig {
    fn merge_into(self, config: &mut ProbeConfig) {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        if let Some(url) = self.url {
            config.url = url;
        }

        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FilePlatformConfig {
    pub sysfs_net_root: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
}

impl FilePlatformConfig {
    fn merge_into(self, config: &mut PlatformConfig) {
        if let Some(root) = self.sysfs_net_root {
            config.sysfs_net_root = root;
        }

        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.poll_interval_ms = poll_interval_ms;
        }
    }
}
