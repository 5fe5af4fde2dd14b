//! Logging streaks over calendar days.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days counted back before the current streak stops looking.
pub const MAX_STREAK_DAYS: u32 = 365;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_log_date: Option<NaiveDate>,
    pub total_logs: u32,
    pub total_good_days: u32,
}

/// Consecutive logged days ending at `today`, or at yesterday when today
/// has no log yet.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    let mut check = if days.contains(&today) {
        Some(today)
    } else {
        today.checked_sub_days(Days::new(1))
    };

    let mut streak = 0;
    while let Some(day) = check {
        if streak >= MAX_STREAK_DAYS || !days.contains(&day) {
            break;
        }
        streak += 1;
        check = day.checked_sub_days(Days::new(1));
    }
    streak
}

/// Longest run of consecutive logged days anywhere in `dates`.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Folds one new log into stored streak data.
///
/// A second log on the same day only bumps `total_logs`. A log dated today
/// or yesterday extends the streak when the previous log was also today or
/// yesterday; anything else restarts it at one.
pub fn update_on_new_log(existing: &StreakData, log_date: NaiveDate, today: NaiveDate) -> StreakData {
    let mut current = existing.current_streak;
    let mut last = existing.last_log_date;

    if existing.last_log_date != Some(log_date) {
        last = Some(log_date);
        let yesterday = today.pred_opt();
        let recent = |d: NaiveDate| d == today || Some(d) == yesterday;

        current = match existing.last_log_date {
            Some(prev) if recent(log_date) && recent(prev) => existing.current_streak + 1,
            _ => 1,
        };
    }

    StreakData {
        current_streak: current,
        longest_streak: existing.longest_streak.max(current),
        last_log_date: last,
        total_logs: existing.total_logs + 1,
        total_good_days: existing.total_good_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn current_streak_counts_back_from_today() {
        let dates = vec![d(10), d(9), d(8), d(6)];
        assert_eq!(current_streak(&dates, d(10)), 3);
    }

    #[test]
    fn missing_today_starts_from_yesterday() {
        let dates = vec![d(9), d(8)];
        assert_eq!(current_streak(&dates, d(10)), 2);
        assert_eq!(current_streak(&dates, d(11)), 0);
    }

    #[test]
    fn duplicate_days_count_once() {
        let dates = vec![d(10), d(10), d(9)];
        assert_eq!(current_streak(&dates, d(10)), 2);
        assert_eq!(longest_streak(&dates), 2);
    }

    #[test]
    fn current_streak_is_capped() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<_> = start.iter_days().take(400).collect();
        let today = dates[399];
        assert_eq!(current_streak(&dates, today), MAX_STREAK_DAYS);
        assert_eq!(longest_streak(&dates), 400);
    }

    #[test]
    fn longest_streak_finds_the_best_run() {
        let dates = vec![d(1), d(2), d(5), d(6), d(7), d(9)];
        assert_eq!(longest_streak(&dates), 3);
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[d(4)]), 1);
    }

    #[test]
    fn first_log_starts_a_streak() {
        let next = update_on_new_log(&StreakData::default(), d(10), d(10));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 1);
        assert_eq!(next.last_log_date, Some(d(10)));
        assert_eq!(next.total_logs, 1);
    }

    #[test]
    fn consecutive_day_extends_and_same_day_does_not() {
        let existing = StreakData {
            current_streak: 4,
            longest_streak: 4,
            last_log_date: Some(d(9)),
            total_logs: 8,
            total_good_days: 2,
        };
        let next = update_on_new_log(&existing, d(10), d(10));
        assert_eq!(next.current_streak, 5);
        assert_eq!(next.longest_streak, 5);
        assert_eq!(next.total_good_days, 2);

        let again = update_on_new_log(&next, d(10), d(10));
        assert_eq!(again.current_streak, 5);
        assert_eq!(again.total_logs, 10);
    }

    #[test]
    fn gap_restarts_but_keeps_longest() {
        let existing = StreakData {
            current_streak: 6,
            longest_streak: 6,
            last_log_date: Some(d(5)),
            total_logs: 6,
            total_good_days: 0,
        };
        let next = update_on_new_log(&existing, d(10), d(10));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 6);
    }

    #[test]
    fn backfilled_old_log_restarts() {
        let existing = StreakData {
            current_streak: 2,
            longest_streak: 3,
            last_log_date: Some(d(10)),
            total_logs: 2,
            total_good_days: 0,
        };
        let next = update_on_new_log(&existing, d(3), d(10));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.last_log_date, Some(d(3)));
    }
}
