//! Conversational recap of the last seven days.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::streak::current_streak;
use super::{analyze_with, AnalysisOptions};
use crate::store::TrackerData;

/// Length of the weekly window, in days.
pub const WEEK_DAYS: u32 = 7;
pub const TOP_INSIGHTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_symptoms: usize,
    pub most_frequent_symptom: Option<String>,
    pub most_frequent_count: usize,
    pub top_insights: Vec<String>,
    /// Consecutive logged days ending at the last day of the week.
    pub streak: u32,
    pub message: String,
}

/// Summarizes a seven-day window. `None` when no symptoms were logged.
pub fn weekly_summary(data: &TrackerData, options: &AnalysisOptions) -> Option<WeeklySummary> {
    if data.symptom_logs.is_empty() {
        return None;
    }

    let summary = analyze_with(data, options);
    let week_end = options.day_of(&data.window.end);
    let week_start = options.day_of(&data.window.start);

    let logged_days: Vec<NaiveDate> = data
        .symptom_logs
        .iter()
        .map(|l| options.day_of(&l.logged_at))
        .collect();
    let streak = current_streak(&logged_days, week_end).min(WEEK_DAYS);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for log in &data.symptom_logs {
        *counts.entry(log.display_name()).or_default() += 1;
    }
    // Highest count wins; BTreeMap order makes the alphabetically first name win ties.
    let most_frequent = counts
        .iter()
        .fold(None::<(&str, usize)>, |best, (name, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((*name, *count)),
        });

    let top_insights: Vec<String> = summary
        .plain_language_insights
        .iter()
        .take(TOP_INSIGHTS)
        .map(|i| i.text.clone())
        .collect();

    let message = compose_message(summary.symptoms.total, streak, most_frequent, top_insights.first());

    Some(WeeklySummary {
        week_start,
        week_end,
        total_symptoms: summary.symptoms.total,
        most_frequent_symptom: most_frequent.map(|(name, _)| name.to_string()),
        most_frequent_count: most_frequent.map(|(_, count)| count).unwrap_or(0),
        top_insights,
        streak,
        message,
    })
}

fn compose_message(
    total: usize,
    streak: u32,
    most_frequent: Option<(&str, usize)>,
    first_insight: Option<&String>,
) -> String {
    let mut lines = vec!["Here's your week:".to_string(), String::new()];

    let consistent = if streak == WEEK_DAYS { " (you're consistent!)" } else { "" };
    let noun = if total == 1 { "symptom" } else { "symptoms" };
    lines.push(format!("- {total} {noun} logged{consistent}"));

    if let Some((name, count)) = most_frequent {
        let times = if count == 1 { "time" } else { "times" };
        lines.push(format!("- {name}: {count} {times}"));
    }

    if let Some(insight) = first_insight {
        lines.push(String::new());
        lines.push(format!("One pattern I noticed: {insight}"));
    }

    lines.push(String::new());
    lines.push("Anything you want to focus on this week?".to_string());
    lines.join("\n")
}
