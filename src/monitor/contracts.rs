use std::fmt;

use crate::domain::network_state::NetworkState;

pub type StateCallback = Box<dyn Fn(NetworkState) + Send + Sync>;

/// Host platform's connectivity API.
pub trait NetworkStateSource: Send + Sync {
    fn fetch_current(&self) -> NetworkState;
    fn subscribe(&self, on_change: StateCallback) -> FeedSubscription;
}

/// Active registration with a network-state feed. Dropping it ends delivery.
pub struct FeedSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedSubscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn inert() -> Self {
        Self { cancel: None }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
