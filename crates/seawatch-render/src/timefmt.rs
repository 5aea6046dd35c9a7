//! Relative-time formatting for popup text.
//!
//! Ages are bucketed into years, months, weeks, days, hours, minutes, and
//! seconds; the largest unit with a non-zero count wins. Labels match the
//! Indonesian deployment language of the backend.

use chrono::{DateTime, Utc};

/// Unit buckets ordered largest first. A month is 30 days, a year 365.
const BUCKETS: [(i64, &str); 7] = [
    (365 * 86_400, "tahun"),
    (30 * 86_400, "bulan"),
    (7 * 86_400, "minggu"),
    (86_400, "hari"),
    (3_600, "jam"),
    (60, "menit"),
    (1, "detik"),
];

/// Formats the age of `then` relative to `now`.
///
/// Under one second (including timestamps in the future, which clock skew can
/// produce) the result is "Baru saja".
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use seawatch_render::timefmt::relative_since;
///
/// let now = Utc::now();
/// assert_eq!(relative_since(now - Duration::seconds(90), now), "1 menit yang lalu");
/// ```
pub fn relative_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age_secs = (now - then).num_seconds();
    if age_secs < 1 {
        return "Baru saja".to_string();
    }

    for (unit_secs, label) in BUCKETS {
        let count = age_secs / unit_secs;
        if count > 0 {
            return format!("{count} {label} yang lalu");
        }
    }

    // age_secs >= 1 always matches the seconds bucket
    "Baru saja".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-08-06T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(relative_since(now(), now()), "Baru saja");
        assert_eq!(
            relative_since(now() - Duration::milliseconds(400), now()),
            "Baru saja"
        );
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(relative_since(now() + Duration::seconds(30), now()), "Baru saja");
    }

    #[test]
    fn test_seconds_bucket() {
        assert_eq!(
            relative_since(now() - Duration::seconds(45), now()),
            "45 detik yang lalu"
        );
    }

    #[test]
    fn test_ninety_seconds_is_minutes_bucket() {
        assert_eq!(
            relative_since(now() - Duration::seconds(90), now()),
            "1 menit yang lalu"
        );
    }

    #[test]
    fn test_three_days_is_days_bucket() {
        assert_eq!(
            relative_since(now() - Duration::days(3), now()),
            "3 hari yang lalu"
        );
    }

    #[test]
    fn test_largest_unit_wins() {
        assert_eq!(
            relative_since(now() - Duration::days(10), now()),
            "1 minggu yang lalu"
        );
        assert_eq!(
            relative_since(now() - Duration::days(40), now()),
            "1 bulan yang lalu"
        );
        assert_eq!(
            relative_since(now() - Duration::days(800), now()),
            "2 tahun yang lalu"
        );
    }

    #[test]
    fn test_hours_bucket() {
        assert_eq!(
            relative_since(now() - Duration::hours(5), now()),
            "5 jam yang lalu"
        );
    }
}
