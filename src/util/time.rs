use chrono::{DateTime, SecondsFormat, Utc};

/// Get the current time in seconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Get the current time in seconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    epoch_millis() / 1000.0
}

#[cfg(target_arch = "wasm32")]
fn epoch_millis() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.time_origin() + perf.now())
        .unwrap_or(0.0)
}

/// Wall-clock timestamp for saved sessions
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// ISO-8601 with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_format_matches_browser_output() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(iso_timestamp(time), "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn clock_moves_forward() {
        let a = current_time_secs();
        let b = current_time_secs();
        assert!(b >= a);
    }
}
