//! Time-window policy: decides whether playback may continue.
//!
//! A [`Window`] is the daily allowed-use interval. It is half-open,
//! `[start, end)`: the start instant is allowed, the end instant is not.
//! When `start > end` the window wraps past midnight and covers
//! `[start, 24:00) ∪ [00:00, end)`.
//!
//! Everything here is pure and synchronous; the caller supplies the current
//! wall-clock time.

use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

/// The daily allowed-use interval. `start` may be later than `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Window {
    #[must_use]
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Whether the window spans midnight.
    #[must_use]
    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Whether `now` falls inside the allowed interval.
    #[must_use]
    pub fn contains(&self, now: TimeOfDay) -> bool {
        !is_outside(now.minutes(), self.start.minutes(), self.end.minutes())
    }
}

/// Outcome of evaluating the policy for one playback start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    BlockedByFlag,
    OutsideWindow,
}

impl Decision {
    /// Whether the player must be notified and stopped.
    #[must_use]
    pub fn requires_action(self) -> bool {
        !matches!(self, Self::Allowed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::BlockedByFlag => "blocked_by_flag",
            Self::OutsideWindow => "outside_window",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `now` lies outside the half-open window `[start, end)`,
/// all values in minutes since midnight.
///
/// `start == end` takes the non-wrapping branch, so such a window is empty.
#[must_use]
pub fn is_outside(now: u16, start: u16, end: u16) -> bool {
    if start <= end {
        now < start || now >= end
    } else {
        now >= end && now < start
    }
}

/// Gate a playback start.
///
/// Returns `None` when the control is disabled: no decision is made and the
/// caller takes no action. The blocked flag wins over the window.
#[must_use]
pub fn decide(enabled: bool, blocked: bool, window: Window, now: TimeOfDay) -> Option<Decision> {
    if !enabled {
        return None;
    }
    if blocked {
        return Some(Decision::BlockedByFlag);
    }
    if window.contains(now) {
        Some(Decision::Allowed)
    } else {
        Some(Decision::OutsideWindow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MINUTES_PER_DAY;

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn day_window() -> Window {
        Window::new(at(8, 0), at(20, 0))
    }

    fn night_window() -> Window {
        Window::new(at(20, 0), at(8, 0))
    }

    #[test]
    fn should_match_half_open_rule_for_every_minute_of_non_wrapping_window() {
        let (s, e) = (480, 1200);
        for now in 0..MINUTES_PER_DAY {
            assert_eq!(is_outside(now, s, e), now < s || now >= e, "now={now}");
        }
    }

    #[test]
    fn should_match_half_open_rule_for_every_minute_of_wrapping_window() {
        let (s, e) = (1200, 480);
        for now in 0..MINUTES_PER_DAY {
            assert_eq!(is_outside(now, s, e), e <= now && now < s, "now={now}");
        }
    }

    #[test]
    fn should_never_be_outside_at_start_instant() {
        for (s, e) in [(480, 1200), (1200, 480), (0, 1439), (1439, 0)] {
            assert!(!is_outside(s, s, e), "start={s} end={e}");
        }
    }

    #[test]
    fn should_always_be_outside_at_end_instant() {
        for (s, e) in [(480, 1200), (1200, 480), (0, 1439), (1439, 0)] {
            assert!(is_outside(e, s, e), "start={s} end={e}");
        }
    }

    #[test]
    fn should_treat_equal_start_and_end_as_empty_window() {
        for now in 0..MINUTES_PER_DAY {
            assert!(is_outside(now, 600, 600));
        }
    }

    #[test]
    fn should_report_outside_one_minute_before_day_window_opens() {
        assert_eq!(
            decide(true, false, day_window(), at(7, 59)),
            Some(Decision::OutsideWindow)
        );
    }

    #[test]
    fn should_allow_at_day_window_start() {
        assert_eq!(
            decide(true, false, day_window(), at(8, 0)),
            Some(Decision::Allowed)
        );
    }

    #[test]
    fn should_report_outside_at_day_window_end() {
        assert_eq!(
            decide(true, false, day_window(), at(20, 0)),
            Some(Decision::OutsideWindow)
        );
    }

    #[test]
    fn should_allow_late_evening_in_overnight_window() {
        assert!(night_window().wraps_midnight());
        assert_eq!(
            decide(true, false, night_window(), at(23, 0)),
            Some(Decision::Allowed)
        );
    }

    #[test]
    fn should_report_outside_mid_morning_in_overnight_window() {
        assert_eq!(
            decide(true, false, night_window(), at(10, 0)),
            Some(Decision::OutsideWindow)
        );
    }

    #[test]
    fn should_prefer_blocked_flag_over_window() {
        assert_eq!(
            decide(true, true, day_window(), at(12, 0)),
            Some(Decision::BlockedByFlag)
        );
        assert_eq!(
            decide(true, true, day_window(), at(3, 0)),
            Some(Decision::BlockedByFlag)
        );
    }

    #[test]
    fn should_make_no_decision_when_disabled() {
        for blocked in [false, true] {
            for now in [at(3, 0), at(12, 0), at(20, 0)] {
                assert_eq!(decide(false, blocked, day_window(), now), None);
                assert_eq!(decide(false, blocked, night_window(), now), None);
            }
        }
    }

    #[test]
    fn should_require_action_for_anything_but_allowed() {
        assert!(!Decision::Allowed.requires_action());
        assert!(Decision::BlockedByFlag.requires_action());
        assert!(Decision::OutsideWindow.requires_action());
    }

    #[test]
    fn should_serialize_decision_in_snake_case() {
        let json = serde_json::to_string(&Decision::OutsideWindow).unwrap();
        assert_eq!(json, "\"outside_window\"");
        assert_eq!(Decision::BlockedByFlag.to_string(), "blocked_by_flag");
    }
}
