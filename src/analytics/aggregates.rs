use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveTime, Utc};

use super::types::*;
use crate::models::{DailyMood, SymptomLog};

pub const RECENT_LOG_LIMIT: usize = 5;

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Mean of integer-valued samples. `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Relative change of the mean value between the two halves of the observed span.
///
/// Points are ordered chronologically and the span `[earliest, latest]` is
/// split at its midpoint; points strictly before the midpoint form the first
/// half. `None` when there are fewer than two points, a half is empty, or the
/// first-half mean is zero.
pub fn half_split_change(points: &[(DateTime<Utc>, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let earliest = sorted[0].0;
    let latest = sorted[sorted.len() - 1].0;
    let midpoint = earliest + (latest - earliest) / 2;

    let (first, second): (Vec<_>, Vec<_>) = sorted.iter().partition(|(t, _)| *t < midpoint);
    let first_mean = mean(&first.iter().map(|(_, v)| *v).collect::<Vec<_>>())?;
    let second_mean = mean(&second.iter().map(|(_, v)| *v).collect::<Vec<_>>())?;

    if first_mean == 0.0 {
        return None;
    }
    Some((second_mean - first_mean) / first_mean)
}

pub fn severity_trend(logs: &[&SymptomLog]) -> (Trend, Option<f64>) {
    let points: Vec<_> = logs
        .iter()
        .map(|l| (l.logged_at, f64::from(l.severity.level())))
        .collect();
    let change = half_split_change(&points);
    (Trend::from_severity_change(change), change)
}

/// Per-symptom figures kept alongside the serialized stats for the insight formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomDetail {
    pub change: Option<f64>,
    pub last_logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomAggregation {
    pub summary: SymptomSummary,
    pub details: BTreeMap<String, SymptomDetail>,
}

/// Groups logs by symptom name and computes count, average severity and trend
/// for each group and for the whole set.
pub fn aggregate_symptoms(logs: &[SymptomLog]) -> SymptomAggregation {
    let mut by_name: BTreeMap<&str, Vec<&SymptomLog>> = BTreeMap::new();
    for log in logs {
        by_name.entry(log.display_name()).or_default().push(log);
    }

    let mut stats = BTreeMap::new();
    let mut details = BTreeMap::new();
    for (name, group) in &by_name {
        let severities: Vec<f64> = group.iter().map(|l| f64::from(l.severity.level())).collect();
        let (trend, change) = severity_trend(group);
        stats.insert(
            name.to_string(),
            SymptomStats {
                count: group.len(),
                avg_severity: mean(&severities).map(round1),
                trend,
            },
        );
        if let Some(last) = group.iter().map(|l| l.logged_at).max() {
            details.insert(
                name.to_string(),
                SymptomDetail {
                    change,
                    last_logged_at: last,
                },
            );
        }
    }

    let all: Vec<&SymptomLog> = logs.iter().collect();
    let severities: Vec<f64> = all.iter().map(|l| f64::from(l.severity.level())).collect();
    let (trend, _) = severity_trend(&all);

    let mut newest_first = all.clone();
    newest_first.sort_by(|a, b| b.logged_at.cmp(&a.logged_at).then(a.id.cmp(&b.id)));
    let recent = newest_first
        .into_iter()
        .take(RECENT_LOG_LIMIT)
        .map(|l| RecentLog {
            id: l.id,
            symptom_name: l.display_name().to_string(),
            severity: l.severity,
            triggers: l.triggers.iter().cloned().collect(),
            logged_at: l.logged_at,
        })
        .collect();

    SymptomAggregation {
        summary: SymptomSummary {
            total: logs.len(),
            avg_severity: mean(&severities).map(round1),
            trend,
            by_name: stats,
            recent,
        },
        details,
    }
}

/// Mood check-ins: days logged, average mood, good days and direction.
pub fn aggregate_mood(moods: &[DailyMood]) -> MoodSummary {
    let days: BTreeSet<_> = moods.iter().map(|m| m.date).collect();
    let values: Vec<f64> = moods.iter().map(|m| f64::from(m.mood.level())).collect();
    let good_days: BTreeSet<_> = moods.iter().filter(|m| m.mood.is_good()).map(|m| m.date).collect();

    MoodSummary {
        days_logged: days.len(),
        avg_mood: mean(&values).map(round1),
        good_days: good_days.len(),
        trend: Trend::from_mood_change(mood_change(moods)),
    }
}

/// Relative change in mood between the halves of the logged span.
pub fn mood_change(moods: &[DailyMood]) -> Option<f64> {
    let points: Vec<_> = moods
        .iter()
        .map(|m| (m.date.and_time(NaiveTime::MIN).and_utc(), f64::from(m.mood.level())))
        .collect();
    half_split_change(&points)
}
