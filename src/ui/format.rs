use crate::{
    domain::{connectivity::ConnectivitySnapshot, events::ConnectivityEvent},
    ui::banner::Banner,
};

pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1_000;
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// One-line human summary of a snapshot.
pub fn snapshot_line(snapshot: &ConnectivitySnapshot) -> String {
    let latency = snapshot
        .latency_ms
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| "n/a".to_owned());
    let downlink = snapshot
        .downlink_mbps
        .map(|mbps| format!("{mbps:.0} Mbps"))
        .unwrap_or_else(|| "n/a".to_owned());
    let internet = match snapshot.is_internet_reachable {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };

    format!(
        "{} {} via {} | latency {} | downlink {} | internet {}",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
        snapshot.quality.as_label(),
        snapshot.connection_type.as_label(),
        latency,
        downlink,
        internet
    )
}

pub fn event_line(event: &ConnectivityEvent, total_offline_ms: u64) -> String {
    let headline = match event {
        ConnectivityEvent::Connected { offline_for_ms, .. } => {
            format!("back online after {}", format_duration_ms(*offline_for_ms))
        }
        ConnectivityEvent::Disconnected { at, .. } => {
            format!("connection lost at {}", at.format("%H:%M:%S"))
        }
    };

    match Banner::from_status(event.snapshot(), total_offline_ms) {
        Some(banner) => format!(
            "[{}] {}: {} {}",
            banner.tone.as_label(),
            headline,
            banner.headline,
            banner.detail
        ),
        None => format!("[ONLINE] {headline}"),
    }
}
