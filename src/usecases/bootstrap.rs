use std::{path::Path, sync::Arc, time::Duration};

use crate::{
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter, ProbeMode},
        contracts::ConfigAdapter,
        error::AppError,
    },
    monitor::{
        clock::SystemClock,
        probe::{PassiveProbe, ProbeStrategy},
        ConnectivityMonitor, MonitorSettings,
    },
    platform::{http_probe::HttpProbe, sysfs::SysfsNetworkSource},
    usecases::context::AppContext,
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = load_config(&FileConfigAdapter::new(config_path))?;
    let guard = infra::logging::init(&config.logging)?;

    let mut context = build_context(config)?;
    context.keep_log_guard(guard);

    Ok(context)
}

fn load_config(adapter: &dyn ConfigAdapter) -> Result<AppConfig, AppError> {
    adapter.load().map_err(AppError::Other)
}

fn build_context(config: AppConfig) -> Result<AppContext, AppError> {
    let monitor = compose_monitor(&config)?;
    Ok(AppContext::new(config, monitor))
}

pub fn compose_monitor(config: &AppConfig) -> Result<ConnectivityMonitor, AppError> {
    let settings = MonitorSettings {
        probe_interval: Duration::from_secs(config.monitor.probe_interval_secs),
        history_capacity: config.monitor.history_capacity,
    };

    let source = SysfsNetworkSource::new(
        config.platform.sysfs_net_root.clone(),
        Duration::from_millis(config.platform.poll_interval_ms),
    );

    let probe: Arc<dyn ProbeStrategy> = match config.probe.mode {
        ProbeMode::Http => Arc::new(HttpProbe::new(
            config.probe.url.clone(),
            Duration::from_millis(config.probe.timeout_ms),
        )?),
        ProbeMode::Passive => Arc::new(PassiveProbe),
    };

    tracing::debug!(
        probe_mode = ?config.probe.mode,
        probe_url = %config.probe.url,
        sysfs_net_root = %config.platform.sysfs_net_root.display(),
        "connectivity monitor composed"
    );

    Ok(ConnectivityMonitor::new(
        settings,
        Arc::new(source),
        probe,
        Arc::new(SystemClock),
    ))
}
