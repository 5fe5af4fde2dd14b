//! Health summary: an at-a-glance digest of a whole window, with a
//! week-by-week breakdown and how often each trigger was tagged.
//!
//! "Good Day" logs are counted as good days and kept out of every symptom
//! figure.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::aggregates::{mean, round1};
use super::report::{patient_display_name, ReportDateRange};
use super::types::{AnalysisOptions, Summary, Trend};
use crate::models::enums::Severity;
use crate::models::SymptomLog;
use crate::store::TrackerData;

pub const TOP_SYMPTOMS: usize = 5;
pub const COMMON_SYMPTOMS: usize = 2;
pub const TOP_TRIGGERS: usize = 5;
pub const MAX_PATTERNS: usize = 5;
const WEEK_LENGTH: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub patient_name: String,
    pub date_range: ReportDateRange,
    pub at_a_glance: AtAGlance,
    pub top_symptoms: Vec<TopSymptom>,
    pub patterns: Vec<String>,
    pub week_by_week: WeekByWeek,
    pub triggers: Vec<TriggerShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtAGlance {
    pub days_tracked: usize,
    pub total_days: usize,
    pub tracking_percentage: u32,
    pub total_symptoms: usize,
    pub good_days: usize,
    pub most_common_symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSymptom {
    pub name: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_severity: Option<f64>,
    pub most_common_severity: Severity,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBreakdown {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Distinct symptoms logged that week.
    pub symptoms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_severity: Option<f64>,
    pub good_days: usize,
}

/// Last week against first week. Present once there are two weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTrends {
    pub symptoms: Trend,
    pub severity: Trend,
    pub good_days: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekByWeek {
    pub weeks: Vec<WeekBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<WeekTrends>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerShare {
    pub name: String,
    /// Share of trigger-tagged logs carrying this trigger, 0..=100.
    pub percentage: u32,
}

// ═══════════════════════════════════════════
// Assembly
// ═══════════════════════════════════════════

/// Digest of `data.window` in whole local days. `summary` must come from
/// the same data.
pub fn health_summary(
    data: &TrackerData,
    summary: &Summary,
    patient_name: Option<&str>,
    options: &AnalysisOptions,
) -> HealthSummary {
    let first_day = options.day_of(&data.window.start);
    let last_day = options.day_of(&data.window.end);
    let logs = &data.symptom_logs;
    let symptom_logs: Vec<&SymptomLog> = logs.iter().filter(|l| !l.is_good_day()).collect();

    let top_symptoms = top_symptoms(summary, &symptom_logs);
    let days_tracked = distinct_days(logs.iter(), options);
    let total_days = (last_day - first_day).num_days().max(0) as usize + 1;

    let at_a_glance = AtAGlance {
        days_tracked,
        total_days,
        tracking_percentage: percentage(days_tracked, total_days).min(100),
        total_symptoms: symptom_logs.len(),
        good_days: distinct_days(logs.iter().filter(|l| l.is_good_day()), options),
        most_common_symptoms: top_symptoms.iter().take(COMMON_SYMPTOMS).map(|s| s.name.clone()).collect(),
        typical_severity: most_common_severity(symptom_logs.iter().copied()),
    };

    HealthSummary {
        patient_name: patient_display_name(patient_name),
        date_range: ReportDateRange::of_days(first_day, last_day),
        at_a_glance,
        top_symptoms,
        patterns: summary
            .plain_language_insights
            .iter()
            .take(MAX_PATTERNS)
            .map(|i| i.text.clone())
            .collect(),
        week_by_week: week_by_week(logs, first_day, last_day, options),
        triggers: trigger_shares(logs),
    }
}

/// Rounded share in percent; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (2 * whole)) as u32
}

fn distinct_days<'a>(logs: impl Iterator<Item = &'a SymptomLog>, options: &AnalysisOptions) -> usize {
    logs.map(|l| options.day_of(&l.logged_at)).collect::<BTreeSet<_>>().len()
}

/// Modal severity; ties go to the milder level.
fn most_common_severity<'a>(logs: impl Iterator<Item = &'a SymptomLog>) -> Option<Severity> {
    let mut counts: BTreeMap<Severity, usize> = BTreeMap::new();
    for log in logs {
        *counts.entry(log.severity).or_default() += 1;
    }
    counts
        .into_iter()
        .fold(None::<(Severity, usize)>, |best, (severity, count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((severity, count)),
        })
        .map(|(severity, _)| severity)
}

fn top_symptoms(summary: &Summary, symptom_logs: &[&SymptomLog]) -> Vec<TopSymptom> {
    let mut top: Vec<TopSymptom> = summary
        .symptoms
        .by_name
        .iter()
        .filter_map(|(name, stats)| {
            let severity = most_common_severity(
                symptom_logs.iter().copied().filter(|l| l.display_name() == name),
            )?;
            Some(TopSymptom {
                name: name.clone(),
                count: stats.count,
                avg_severity: stats.avg_severity,
                most_common_severity: severity,
                trend: stats.trend,
            })
        })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    top.truncate(TOP_SYMPTOMS);
    top
}

/// Seven-day blocks from `first_day`; the last block stops at `last_day`.
fn week_by_week(logs: &[SymptomLog], first_day: NaiveDate, last_day: NaiveDate, options: &AnalysisOptions) -> WeekByWeek {
    let mut weeks = Vec::new();
    let mut start = first_day;
    let mut week = 1;

    while start <= last_day {
        let end = (start + Days::new(WEEK_LENGTH - 1)).min(last_day);
        let in_week: Vec<&SymptomLog> = logs
            .iter()
            .filter(|l| (start..=end).contains(&options.day_of(&l.logged_at)))
            .collect();
        let symptoms: Vec<&SymptomLog> = in_week.iter().copied().filter(|l| !l.is_good_day()).collect();
        let severities: Vec<f64> = symptoms.iter().map(|l| f64::from(l.severity.level())).collect();

        weeks.push(WeekBreakdown {
            week,
            start,
            end,
            symptoms: symptoms.iter().map(|l| l.symptom_id).collect::<BTreeSet<_>>().len(),
            avg_severity: mean(&severities).map(round1),
            good_days: distinct_days(in_week.iter().copied().filter(|l| l.is_good_day()), options),
        });

        start = start + Days::new(WEEK_LENGTH);
        week += 1;
    }

    let trends = match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) if weeks.len() >= 2 => Some(WeekTrends {
            symptoms: lower_is_better(first.symptoms as f64, last.symptoms as f64),
            severity: match (first.avg_severity, last.avg_severity) {
                (Some(a), Some(b)) => lower_is_better(a, b),
                _ => Trend::Stable,
            },
            good_days: lower_is_better(last.good_days as f64, first.good_days as f64),
        }),
        _ => None,
    };

    WeekByWeek { weeks, trends }
}

fn lower_is_better(first: f64, last: f64) -> Trend {
    if last < first {
        Trend::Improving
    } else if last > first {
        Trend::Worsening
    } else {
        Trend::Stable
    }
}

/// Share of trigger-tagged logs per trigger, highest first, ties alphabetical.
fn trigger_shares(logs: &[SymptomLog]) -> Vec<TriggerShare> {
    let tagged: Vec<&SymptomLog> = logs.iter().filter(|l| !l.triggers.is_empty()).collect();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for trigger in tagged.iter().flat_map(|l| l.triggers.iter()) {
        *counts.entry(trigger.as_str()).or_default() += 1;
    }

    let mut shares: Vec<TriggerShare> = counts
        .into_iter()
        .map(|(name, count)| TriggerShare {
            name: name.to_string(),
            percentage: percentage(count, tagged.len()),
        })
        .collect();
    shares.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    shares.truncate(TOP_TRIGGERS);
    shares
}
