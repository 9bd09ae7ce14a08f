use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

const FILE_STEM: &str = "spotify_raw_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// Microseconds since the epoch of the last timestamp handed out by this process.
static LAST_ISSUED: AtomicI64 = AtomicI64::new(i64::MIN);

/// `now` at microsecond precision, strictly later than any timestamp previously
/// returned by this function in the same process.
pub fn unique_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    let micros = now.timestamp_micros();

    let prev = LAST_ISSUED
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(micros.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    let issued = micros.max(prev.saturating_add(1));

    DateTime::from_timestamp_micros(issued).unwrap_or(now)
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn object_key(prefix: &str, ts: DateTime<Utc>) -> String {
    format!("{prefix}{FILE_STEM}{}.json", format_timestamp(ts))
}
