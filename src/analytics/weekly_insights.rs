//! Weekly insight cards: short factual sentences about one Sunday-to-Saturday
//! week of symptom logs, with the week before as the comparison point.
//!
//! Cards reflect counts only. No advice, no correlations; those live in
//! [`super::insights`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use super::AnalysisOptions;
use crate::models::enums::{Severity, TimeOfDay};
use crate::models::SymptomLog;
use crate::store::{DateWindow, TrackerData};

pub const TOP_FREQUENT: usize = 3;
pub const TRIGGER_PATTERN_MIN_USES: usize = 3;
pub const MAX_TRIGGER_PATTERNS: usize = 2;
pub const TIME_PATTERN_MIN_LOGS: usize = 4;
pub const SEVERITY_BREAKDOWN_MIN_LOGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

/// What a card is about, with the numbers behind its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum WeeklyFinding {
    Frequency { total_logs: usize, most_frequent: Vec<NameCount> },
    Comparison { symptom_name: String, this_week: usize, last_week: usize },
    Consistency { days_tracked: usize },
    TriggerPattern { trigger_name: String, count: usize },
    TimePattern { time_of_day: TimeOfDay, count: usize },
    GoodDays { count: usize },
    #[serde(rename = "severity")]
    SeverityMix { mild: usize, moderate: usize, severe: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyInsight {
    #[serde(flatten)]
    pub finding: WeeklyFinding,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyInsights {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub insights: Vec<WeeklyInsight>,
}

// ═══════════════════════════════════════════
// Week boundaries
// ═══════════════════════════════════════════

/// Sunday and Saturday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day - Days::new(u64::from(day.weekday().num_days_from_sunday()));
    (start, start + Days::new(6))
}

/// Windows for the week containing `now` and the week before it, as whole
/// local days.
pub fn week_windows(now: DateTime<Utc>, options: &AnalysisOptions) -> (DateWindow, DateWindow) {
    let (start, end) = week_bounds(options.day_of(&now));
    let previous_start = start - Days::new(7);
    (
        options.local_days(start, end),
        options.local_days(previous_start, previous_start + Days::new(6)),
    )
}

// ═══════════════════════════════════════════
// Generation
// ═══════════════════════════════════════════

/// Builds the cards for `current`, comparing its top symptom against
/// `previous`. The consistency card is always present; every other card
/// needs enough data to say something.
pub fn weekly_insights(current: &TrackerData, previous: &TrackerData, options: &AnalysisOptions) -> WeeklyInsights {
    let logs = &current.symptom_logs;
    let ranked = rank_by_name(logs);
    let mut insights = Vec::new();

    if let Some(card) = frequency(logs.len(), &ranked) {
        insights.push(card);
    }

    if let Some(top) = ranked.first() {
        let last_week = previous
            .symptom_logs
            .iter()
            .filter(|l| l.display_name() == top.name)
            .count();
        if let Some(card) = comparison(&top.name, top.count, last_week) {
            insights.push(card);
        }
    }

    let days_tracked = logs
        .iter()
        .map(|l| options.day_of(&l.logged_at))
        .collect::<BTreeSet<_>>()
        .len();
    insights.push(consistency(days_tracked));

    insights.extend(trigger_patterns(logs));

    if let Some(card) = time_pattern(logs, options) {
        insights.push(card);
    }
    if let Some(card) = good_days(logs.iter().filter(|l| l.is_good_day()).count()) {
        insights.push(card);
    }
    if let Some(card) = severity_mix(logs) {
        insights.push(card);
    }

    let week_start = options.day_of(&current.window.start);
    let week_end = options.day_of(&current.window.end);
    tracing::debug!(%week_start, cards = insights.len(), "Built weekly insight cards");

    WeeklyInsights {
        week_start,
        week_end,
        insights,
    }
}

/// Logs per symptom name, most logged first, ties alphabetical.
fn rank_by_name(logs: &[SymptomLog]) -> Vec<NameCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for log in logs {
        *counts.entry(log.display_name()).or_default() += 1;
    }
    let mut ranked: Vec<NameCount> = counts
        .into_iter()
        .map(|(name, count)| NameCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn frequency(total_logs: usize, ranked: &[NameCount]) -> Option<WeeklyInsight> {
    let top = ranked.first()?;
    Some(WeeklyInsight {
        content: format!(
            "You logged {} this week. Most frequent: {} ({}).",
            plural(total_logs, "symptom"),
            top.name,
            top.count
        ),
        finding: WeeklyFinding::Frequency {
            total_logs,
            most_frequent: ranked.iter().take(TOP_FREQUENT).cloned().collect(),
        },
    })
}

/// Only when the symptom was also logged last week.
fn comparison(symptom_name: &str, this_week: usize, last_week: usize) -> Option<WeeklyInsight> {
    if last_week == 0 {
        return None;
    }
    Some(WeeklyInsight {
        content: format!("{symptom_name}: {this_week} this week vs. {last_week} last week."),
        finding: WeeklyFinding::Comparison {
            symptom_name: symptom_name.to_string(),
            this_week,
            last_week,
        },
    })
}

fn consistency(days_tracked: usize) -> WeeklyInsight {
    WeeklyInsight {
        content: format!("You tracked {days_tracked} out of 7 days this week."),
        finding: WeeklyFinding::Consistency { days_tracked },
    }
}

fn trigger_patterns(logs: &[SymptomLog]) -> Vec<WeeklyInsight> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for trigger in logs.iter().flat_map(|l| l.triggers.iter()) {
        *counts.entry(trigger.as_str()).or_default() += 1;
    }
    let mut frequent: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= TRIGGER_PATTERN_MIN_USES)
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1));

    frequent
        .into_iter()
        .take(MAX_TRIGGER_PATTERNS)
        .map(|(trigger, count)| WeeklyInsight {
            content: format!("You tagged '{trigger}' on {} this week.", plural(count, "log")),
            finding: WeeklyFinding::TriggerPattern {
                trigger_name: trigger.to_string(),
                count,
            },
        })
        .collect()
}

/// The busiest part of the day, once it holds enough logs. Ties go to the
/// earlier part of the day.
fn time_pattern(logs: &[SymptomLog], options: &AnalysisOptions) -> Option<WeeklyInsight> {
    let mut counts: BTreeMap<TimeOfDay, usize> = BTreeMap::new();
    for log in logs {
        *counts.entry(options.time_of_day(&log.logged_at)).or_default() += 1;
    }
    let (time_of_day, count) = counts
        .into_iter()
        .fold(None::<(TimeOfDay, usize)>, |best, (time, count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((time, count)),
        })?;
    if count < TIME_PATTERN_MIN_LOGS {
        return None;
    }
    Some(WeeklyInsight {
        content: format!("Most symptoms logged in the {}.", time_of_day.as_str()),
        finding: WeeklyFinding::TimePattern { time_of_day, count },
    })
}

fn good_days(count: usize) -> Option<WeeklyInsight> {
    if count == 0 {
        return None;
    }
    Some(WeeklyInsight {
        content: format!("You had {} this week.", plural(count, "good day")),
        finding: WeeklyFinding::GoodDays { count },
    })
}

fn severity_mix(logs: &[SymptomLog]) -> Option<WeeklyInsight> {
    let count = |level: Severity| logs.iter().filter(|l| l.severity == level).count();
    let (mild, moderate, severe) = (count(Severity::Mild), count(Severity::Moderate), count(Severity::Severe));
    let total = mild + moderate + severe;
    if total < SEVERITY_BREAKDOWN_MIN_LOGS {
        return None;
    }

    let parts: Vec<String> = [(mild, "mild"), (moderate, "moderate"), (severe, "severe")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
    Some(WeeklyInsight {
        content: format!("Severity: {}.", parts.join(", ")),
        finding: WeeklyFinding::SeverityMix {
            mild,
            moderate,
            severe,
            total,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    fn log(name: &str, severity: Severity, day: u32, hour: u32, triggers: &[&str]) -> SymptomLog {
        SymptomLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            symptom_id: Uuid::nil(),
            symptom_name: Some(name.into()),
            severity,
            triggers: triggers.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            notes: None,
            logged_at: Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap(),
        }
    }

    fn fatigue(day: u32, hour: u32) -> SymptomLog {
        log("Fatigue", Severity::Moderate, day, hour, &[])
    }

    /// The week of Sunday 2026-06-07 and the week before it.
    fn weeks(current: Vec<SymptomLog>, previous: Vec<SymptomLog>) -> (TrackerData, TrackerData) {
        let options = AnalysisOptions::default();
        let mut this_week = TrackerData::empty(options.local_days(date(7), date(13)));
        this_week.symptom_logs = current;
        let mut last_week = TrackerData::empty(options.local_days(date(1) - Days::new(1), date(6)));
        last_week.symptom_logs = previous;
        (this_week, last_week)
    }

    fn cards(current: Vec<SymptomLog>, previous: Vec<SymptomLog>) -> Vec<WeeklyInsight> {
        let (this_week, last_week) = weeks(current, previous);
        weekly_insights(&this_week, &last_week, &AnalysisOptions::default()).insights
    }

    fn find<'a>(cards: &'a [WeeklyInsight], kind: &str) -> Vec<&'a WeeklyInsight> {
        cards
            .iter()
            .filter(|c| serde_json::to_value(c).unwrap()["type"] == kind)
            .collect()
    }

    #[test]
    fn week_bounds_run_sunday_to_saturday() {
        // 2026-06-10 is a Wednesday.
        assert_eq!(week_bounds(date(10)), (date(7), date(13)));
        assert_eq!(week_bounds(date(7)), (date(7), date(13)));
        assert_eq!(week_bounds(date(13)), (date(7), date(13)));
    }

    #[test]
    fn week_windows_pair_this_and_last_week() {
        let now = Utc.with_ymd_and_hms(2026, 6, 10, 15, 0, 0).unwrap();
        let (current, previous) = week_windows(now, &AnalysisOptions::default());
        assert_eq!(current.start, Utc.with_ymd_and_hms(2026, 6, 7, 0, 0, 0).unwrap());
        assert_eq!(current.end, Utc.with_ymd_and_hms(2026, 6, 13, 23, 59, 59).unwrap());
        assert_eq!(previous.start, Utc.with_ymd_and_hms(2026, 5, 31, 0, 0, 0).unwrap());
        assert_eq!(previous.end, Utc.with_ymd_and_hms(2026, 6, 6, 23, 59, 59).unwrap());
    }

    #[test]
    fn empty_week_only_reports_consistency() {
        let cards = cards(vec![], vec![fatigue(3, 9)]);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].content, "You tracked 0 out of 7 days this week.");
        assert_eq!(cards[0].finding, WeeklyFinding::Consistency { days_tracked: 0 });
    }

    #[test]
    fn frequency_names_the_top_symptom() {
        let logs = vec![
            fatigue(8, 9),
            fatigue(9, 9),
            log("Anxiety", Severity::Mild, 9, 20, &[]),
            log("Brain fog", Severity::Mild, 10, 20, &[]),
        ];
        let cards = cards(logs, vec![]);
        assert_eq!(cards[0].content, "You logged 4 symptoms this week. Most frequent: Fatigue (2).");
        let WeeklyFinding::Frequency { most_frequent, .. } = &cards[0].finding else {
            panic!("first card is not frequency");
        };
        let names: Vec<_> = most_frequent.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Fatigue", "Anxiety", "Brain fog"]);

        let single = self::cards(vec![fatigue(8, 9)], vec![]);
        assert_eq!(single[0].content, "You logged 1 symptom this week. Most frequent: Fatigue (1).");
    }

    #[test]
    fn comparison_needs_last_week_logs_of_the_top_symptom() {
        let current = vec![fatigue(8, 9), fatigue(9, 9), fatigue(10, 9)];
        assert!(find(&cards(current.clone(), vec![]), "comparison").is_empty());
        let other = vec![log("Anxiety", Severity::Mild, 3, 9, &[])];
        assert!(find(&cards(current.clone(), other), "comparison").is_empty());

        let previous: Vec<_> = (1..=5).map(|d| fatigue(d, 9)).collect();
        let cards = cards(current, previous);
        let comparison = find(&cards, "comparison");
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].content, "Fatigue: 3 this week vs. 5 last week.");
    }

    #[test]
    fn consistency_counts_distinct_days() {
        let cards = cards(vec![fatigue(8, 9), fatigue(8, 20), fatigue(11, 9)], vec![]);
        assert_eq!(find(&cards, "consistency")[0].content, "You tracked 2 out of 7 days this week.");
    }

    #[test]
    fn trigger_patterns_need_three_uses_and_cap_at_two() {
        let two_uses = vec![
            log("Fatigue", Severity::Mild, 8, 9, &["Stress"]),
            log("Fatigue", Severity::Mild, 9, 9, &["Stress"]),
        ];
        assert!(find(&cards(two_uses, vec![]), "trigger_pattern").is_empty());

        let mut logs = Vec::new();
        for day in 8..=11 {
            logs.push(log("Fatigue", Severity::Mild, day, 9, &["Stress", "Poor sleep", "Coffee"]));
        }
        logs.push(log("Fatigue", Severity::Mild, 12, 9, &["Poor sleep"]));
        let cards = cards(logs, vec![]);
        let triggers = find(&cards, "trigger_pattern");
        assert_eq!(triggers.len(), MAX_TRIGGER_PATTERNS);
        assert_eq!(triggers[0].content, "You tagged 'Poor sleep' on 5 logs this week.");
        // Coffee and Stress tie at four; alphabetical order decides.
        assert_eq!(triggers[1].content, "You tagged 'Coffee' on 4 logs this week.");
    }

    #[test]
    fn time_pattern_needs_four_logs_in_one_part_of_day() {
        let three = vec![fatigue(8, 7), fatigue(9, 8), fatigue(10, 9), fatigue(10, 19)];
        assert!(find(&cards(three, vec![]), "time_pattern").is_empty());

        let four = vec![fatigue(8, 19), fatigue(9, 20), fatigue(10, 21), fatigue(11, 18), fatigue(11, 9)];
        let cards = cards(four, vec![]);
        let time = find(&cards, "time_pattern");
        assert_eq!(time[0].content, "Most symptoms logged in the evening.");
        assert_eq!(
            time[0].finding,
            WeeklyFinding::TimePattern { time_of_day: TimeOfDay::Evening, count: 4 }
        );
    }

    #[test]
    fn time_pattern_uses_the_local_clock() {
        // 02:00 UTC is evening at UTC-6.
        let logs: Vec<_> = (8..=11).map(|d| fatigue(d, 2)).collect();
        let (this_week, last_week) = weeks(logs, vec![]);
        let options = AnalysisOptions {
            utc_offset: FixedOffset::west_opt(6 * 3600).unwrap(),
            ..AnalysisOptions::default()
        };
        let cards = weekly_insights(&this_week, &last_week, &options).insights;
        assert_eq!(find(&cards, "time_pattern")[0].content, "Most symptoms logged in the evening.");
    }

    #[test]
    fn good_days_are_counted_when_present() {
        assert!(find(&cards(vec![fatigue(8, 9)], vec![]), "good_days").is_empty());

        let logs = vec![
            log("Good Day", Severity::Mild, 8, 9, &[]),
            log("good day", Severity::Mild, 9, 9, &[]),
            fatigue(10, 9),
        ];
        let cards = cards(logs, vec![]);
        assert_eq!(find(&cards, "good_days")[0].content, "You had 2 good days this week.");
    }

    #[test]
    fn severity_mix_needs_three_logs_and_skips_empty_levels() {
        let two = vec![fatigue(8, 9), fatigue(9, 9)];
        assert!(find(&cards(two, vec![]), "severity").is_empty());

        let logs = vec![
            log("Fatigue", Severity::Mild, 8, 9, &[]),
            log("Fatigue", Severity::Severe, 9, 9, &[]),
            log("Fatigue", Severity::Severe, 10, 9, &[]),
        ];
        let cards = cards(logs, vec![]);
        assert_eq!(find(&cards, "severity")[0].content, "Severity: 1 mild, 2 severe.");
    }

    #[test]
    fn cards_serialize_with_type_and_data() {
        let logs: Vec<_> = (8..=10)
            .map(|d| log("Fatigue", Severity::Mild, d, 9, &["Stress"]))
            .collect();
        let cards = cards(logs, vec![]);
        let json = serde_json::to_value(find(&cards, "trigger_pattern")[0]).unwrap();
        assert_eq!(json["type"], "trigger_pattern");
        assert_eq!(json["data"]["triggerName"], "Stress");
        assert_eq!(json["data"]["count"], 3);
        assert_eq!(json["content"], "You tagged 'Stress' on 3 logs this week.");
    }
}
