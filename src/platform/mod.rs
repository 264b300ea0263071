//! Platform integration layer: host network-state feed and outbound probe.

pub mod http_probe;
pub mod sysfs;

/// Returns the platform module name for smoke checks.
pub fn module_name() -> &'static str {
    "platform"
}
