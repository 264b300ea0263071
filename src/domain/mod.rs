//! Domain layer: connectivity entities and the rules that derive them.

pub mod connectivity;
pub mod events;
pub mod history;
pub mod network_state;
pub mod offline;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
