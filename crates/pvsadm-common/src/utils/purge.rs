//! Age window used to select purge candidates

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Returns true when `created` falls into the purge window.
///
/// A non-zero `before` selects resources created earlier than `now - before`;
/// a non-zero `since` selects resources created later than `now - since`.
/// With both zero nothing is purgeable.
pub fn is_purgeable(
    created: DateTime<Utc>,
    before: Duration,
    since: Duration,
    now: DateTime<Utc>,
) -> bool {
    if !before.is_zero() {
        if let Some(cutoff) = cutoff(now, before) {
            if created < cutoff {
                return true;
            }
        }
    }

    if !since.is_zero() {
        match cutoff(now, since) {
            Some(cutoff) if created > cutoff => return true,
            // window reaches past the representable range
            None => return true,
            _ => {}
        }
    }

    false
}

fn cutoff(now: DateTime<Utc>, window: Duration) -> Option<DateTime<Utc>> {
    let window = chrono::Duration::from_std(window).ok()?;
    now.checked_sub_signed(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        now() - chrono::Duration::hours(hours)
    }

    #[test]
    fn test_before_selects_older() {
        assert!(is_purgeable(hours_ago(100), 72 * HOUR, Duration::ZERO, now()));
        assert!(!is_purgeable(hours_ago(10), 72 * HOUR, Duration::ZERO, now()));
    }

    #[test]
    fn test_since_selects_newer() {
        assert!(is_purgeable(hours_ago(1), Duration::ZERO, 24 * HOUR, now()));
        assert!(!is_purgeable(hours_ago(48), Duration::ZERO, 24 * HOUR, now()));
    }

    #[test]
    fn test_no_window_selects_nothing() {
        assert!(!is_purgeable(hours_ago(1000), Duration::ZERO, Duration::ZERO, now()));
        assert!(!is_purgeable(hours_ago(0), Duration::ZERO, Duration::ZERO, now()));
    }

    #[test]
    fn test_either_window_matches() {
        assert!(is_purgeable(hours_ago(200), 72 * HOUR, 24 * HOUR, now()));
        assert!(is_purgeable(hours_ago(2), 72 * HOUR, 24 * HOUR, now()));
        assert!(!is_purgeable(hours_ago(48), 72 * HOUR, 24 * HOUR, now()));
    }
}
