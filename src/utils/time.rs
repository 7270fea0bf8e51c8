//! Time utilities

use chrono::{DateTime, TimeDelta, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Render a run duration with millisecond precision, e.g. `2m 03.250s`.
pub fn format_duration(duration: TimeDelta) -> String {
    let millis = duration.num_milliseconds().max(0);
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let secs = (millis % 60_000) as f64 / 1000.0;

    match (hours, minutes) {
        (0, 0) => format!("{:.3}s", secs),
        (0, m) => format!("{}m {:06.3}s", m, secs),
        (h, m) => format!("{}h {:02}m {:06.3}s", h, m, secs),
    }
}
