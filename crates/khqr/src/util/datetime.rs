//! Epoch-millisecond timestamps.
//!
//! The timestamp field (`99`) stores creation and expiration times as
//! milliseconds since the Unix epoch. This module reads the clock and
//! renders those values as RFC 3339 strings for display.

use std::time::{SystemTime, UNIX_EPOCH};

const MILLISECONDS_PER_SECOND: i64 = 1000;
const MILLISECONDS_PER_MINUTE: i64 = 60 * MILLISECONDS_PER_SECOND;
const MILLISECONDS_PER_HOUR: i64 = 60 * MILLISECONDS_PER_MINUTE;
const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;

/// Returns the current time in milliseconds since the Unix epoch.
///
/// A clock set before 1970 reads as zero.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    // Howard Hinnant's algorithm in reverse
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1; // day
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // month

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Formats milliseconds since Unix epoch as an RFC 3339 UTC datetime.
///
/// Milliseconds are included only when non-zero.
pub fn format_millis_rfc3339(epoch_millis: i64) -> String {
    let days = epoch_millis.div_euclid(MILLISECONDS_PER_DAY);
    let time_millis = epoch_millis.rem_euclid(MILLISECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);

    let hours = time_millis / MILLISECONDS_PER_HOUR;
    let minutes = time_millis % MILLISECONDS_PER_HOUR / MILLISECONDS_PER_MINUTE;
    let seconds = time_millis % MILLISECONDS_PER_MINUTE / MILLISECONDS_PER_SECOND;
    let millis = time_millis % MILLISECONDS_PER_SECOND;

    let frac = if millis == 0 {
        String::new()
    } else {
        format!(".{:03}", millis)
    };

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}Z",
        year, month, day, hours, minutes, seconds, frac
    )
}
