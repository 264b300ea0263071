//! UI layer: presentation of connectivity state for banners and the CLI.

pub mod banner;
pub mod format;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
