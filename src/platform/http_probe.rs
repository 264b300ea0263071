use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::{
    infra::error::AppError,
    monitor::probe::{ProbeError, ProbeOutcome, ProbeStrategy},
};

pub const DEFAULT_PROBE_URL: &str = "https://www.google.com/generate_204";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// Measures round-trip time with a single `HEAD` request. Only the elapsed
/// time matters; status and body are ignored.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::ProbeClientBuild)?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

#[async_trait]
impl ProbeStrategy for HttpProbe {
    async fn probe(&self) -> ProbeOutcome {
        let started = Instant::now();

        match self.client.head(&self.url).send().await {
            Ok(_) => ProbeOutcome::Measured(started.elapsed()),
            Err(error) if error.is_timeout() => ProbeOutcome::Failed(ProbeError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(error) => ProbeOutcome::Failed(ProbeError::Transport(error)),
        }
    }
}
