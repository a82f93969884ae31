use std::time::Duration;

/// Returns a simple ISO 8601 timestamp (Unix epoch seconds with Z suffix).
pub fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}Z", dur.as_secs())
}

/// Milliseconds between two race-relative instants, zero if `later` is earlier.
pub fn millis_between(earlier: Duration, later: Duration) -> u128 {
    later.saturating_sub(earlier).as_millis()
}
