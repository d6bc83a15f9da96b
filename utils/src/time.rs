//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format the signed distance from `now` to `at`: "in 3h 0m" or "2d 1h ago".
pub fn format_relative(at: u64, now: u64) -> String {
    if at >= now {
        format!("in {}", format_duration(at - now))
    } else {
        format!("{} ago", format_duration(now - at))
    }
}
