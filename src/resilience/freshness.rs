use chrono::{DateTime, Duration, Utc};

/// Data older than this is shown as stale.
pub const STALE_AFTER_MINUTES: i64 = 10;
/// Data older than this, or after [`OFFLINE_AFTER_FAILURES`] failed refreshes, is offline.
pub const OFFLINE_AFTER_MINUTES: i64 = 30;
pub const OFFLINE_AFTER_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    Fresh,
    Stale,
    Offline,
}

impl FreshnessState {
    /// Status badge text; fresh data needs none.
    #[must_use]
    pub fn badge(self) -> Option<&'static str> {
        match self {
            Self::Fresh => None,
            Self::Stale => Some("⚠ stale"),
            Self::Offline => Some("⚠ offline"),
        }
    }
}

#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
) -> FreshnessState {
    evaluate_freshness_at(Utc::now(), last_success, consecutive_failures)
}

#[must_use]
pub fn evaluate_freshness_at(
    now: DateTime<Utc>,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
) -> FreshnessState {
    let offline_by_failures = consecutive_failures >= OFFLINE_AFTER_FAILURES;
    let Some(last_success) = last_success else {
        return if offline_by_failures {
            FreshnessState::Offline
        } else {
            FreshnessState::Stale
        };
    };

    let age = now - last_success;
    if offline_by_failures || age > Duration::minutes(OFFLINE_AFTER_MINUTES) {
        FreshnessState::Offline
    } else if consecutive_failures > 0 || age > Duration::minutes(STALE_AFTER_MINUTES) {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes_ago: i64, failures: u32) -> FreshnessState {
        let now = Utc::now();
        evaluate_freshness_at(now, Some(now - Duration::minutes(minutes_ago)), failures)
    }

    #[test]
    fn nothing_fetched_yet_is_stale_then_offline() {
        assert_eq!(evaluate_freshness(None, 0), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(None, 2), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(None, 3), FreshnessState::Offline);
    }

    #[test]
    fn age_drives_the_state() {
        assert_eq!(at(0, 0), FreshnessState::Fresh);
        assert_eq!(at(9, 0), FreshnessState::Fresh);
        assert_eq!(at(11, 0), FreshnessState::Stale);
        assert_eq!(at(29, 0), FreshnessState::Stale);
        assert_eq!(at(31, 0), FreshnessState::Offline);
    }

    #[test]
    fn failures_degrade_recent_data() {
        assert_eq!(at(1, 1), FreshnessState::Stale);
        assert_eq!(at(1, 2), FreshnessState::Stale);
        assert_eq!(at(1, 3), FreshnessState::Offline);
    }

    #[test]
    fn only_degraded_states_carry_a_badge() {
        assert_eq!(FreshnessState::Fresh.badge(), None);
        assert_eq!(FreshnessState::Offline.badge(), Some("⚠ offline"));
    }
}
