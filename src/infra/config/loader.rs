use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    contracts::ConfigAdapter,
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "NETPULSE_CONFIG";

/// Loads from an explicit path, then `NETPULSE_CONFIG`, then `./config.toml`.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    fn resolve_path(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(load(&self.resolve_path())?)
    }
}

/// A missing file yields defaults; a present file is merged over them and
/// validated.
pub fn load(config_path: &Path) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::default();

    if !config_path.exists() {
        tracing::debug!(
            path = %config_path.display(),
            "config file not found; using defaults"
        );
        return Ok(config);
    }

    let raw = fs::read_to_string(config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.to_path_buf(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path.to_path_buf(),
        source,
    })?;

    file_config.merge_into(&mut config);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), AppError> {
    let checks = [
        ("monitor.probe_interval_secs", config.monitor.probe_interval_secs > 0),
        ("monitor.history_capacity", config.monitor.history_capacity > 0),
        ("probe.timeout_ms", config.probe.timeout_ms > 0),
        ("probe.url", !config.probe.url.trim().is_empty()),
        ("platform.poll_interval_ms", config.platform.poll_interval_ms > 0),
    ];

    match checks.into_iter().find(|(_, ok)| !ok) {
        Some((field, _)) => Err(AppError::ConfigInvalid { field }),
        None => Ok(()),
    }
}
