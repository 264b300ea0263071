use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug)]
pub enum ProbeOutcome {
    Measured(Duration),
    /// The strategy chose not to touch the network; callers keep their last value.
    Skipped,
    Failed(ProbeError),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("probe request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    async fn probe(&self) -> ProbeOutcome;
}

/// Never issues a request. Used where outbound probes are unreliable, such as
/// hosts that block cross-origin HEAD requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveProbe;

#[async_trait]
impl ProbeStrategy for PassiveProbe {
    async fn probe(&self) -> ProbeOutcome {
        ProbeOutcome::Skipped
    }
}
