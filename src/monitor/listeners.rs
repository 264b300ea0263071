use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use crate::domain::events::ConnectivityEvent;

const LISTENER_PANICKED: &str = "CONNECTIVITY_LISTENER_PANICKED";

pub type Listener = Arc<dyn Fn(&ConnectivityEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Observer list for transition events.
///
/// Emission iterates a copy of the registered listeners taken before the
/// first callback runs, so listeners may subscribe or unsubscribe (including
/// themselves) while an event is being delivered.
#[derive(Clone, Default)]
pub struct ListenerSet {
    registry: Arc<Mutex<Registry>>,
}

impl ListenerSet {
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ConnectivityEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every listener; returns how many returned normally.
    pub fn emit(&self, event: &ConnectivityEvent) -> usize {
        let listeners: Vec<Listener> = lock(&self.registry)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut delivered = 0;
        for listener in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| (*listener)(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::warn!(
                        code = LISTENER_PANICKED,
                        event = event.as_label(),
                        panic = %panic_message(payload.as_ref()),
                        "connectivity listener panicked; continuing delivery"
                    );
                }
            }
        }

        delivered
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by `subscribe`. Unsubscribing is explicit; dropping the
/// handle leaves the listener registered.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic payload omitted".to_owned())
}
