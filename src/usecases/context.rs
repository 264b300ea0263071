use std::fmt;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{infra::config::AppConfig, monitor::ConnectivityMonitor};

pub struct AppContext {
    pub config: AppConfig,
    pub monitor: ConnectivityMonitor,
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, monitor: ConnectivityMonitor) -> Self {
        Self {
            config,
            monitor,
            log_guard: None,
        }
    }

    pub fn keep_log_guard(&mut self, guard: Option<WorkerGuard>) {
        self.log_guard = guard;
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("monitor", &self.monitor)
            .field("file_logging", &self.log_guard.is_some())
            .finish()
    }
}
