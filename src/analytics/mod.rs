//! Tracker analytics: aggregation, correlation and plain-language insights
//! over one user's log window.
//!
//! Everything here is a pure function of [`TrackerData`]. No clock reads, no
//! I/O, no randomness: the same window always produces the same summary,
//! whatever order the store returned the rows in.

pub mod aggregates;
pub mod correlations;
pub mod fitness;
pub mod health;
pub mod insights;
pub mod nutrition;
pub mod report;
pub mod streak;
pub mod types;
pub mod weekly;
pub mod weekly_insights;

pub use aggregates::{aggregate_mood, aggregate_symptoms, half_split_change};
pub use correlations::detect_correlations;
pub use health::{health_summary, HealthSummary};
pub use insights::{build_insights, InsightInputs};
pub use report::{build_doctor_report, format_tracker_context, render_pdf, DoctorReport, ReportError};
pub use streak::{current_streak, longest_streak, update_on_new_log, StreakData};
pub use types::*;
pub use weekly::{weekly_summary, WeeklySummary};
pub use weekly_insights::{week_windows, weekly_insights, WeeklyInsight, WeeklyInsights};

use crate::store::TrackerData;

/// Runs the full analysis with default options (UTC days, support 3).
pub fn analyze(data: &TrackerData) -> Summary {
    analyze_with(data, &AnalysisOptions::default())
}

pub fn analyze_with(data: &TrackerData, options: &AnalysisOptions) -> Summary {
    let symptoms = aggregate_symptoms(&data.symptom_logs);
    let mood = aggregate_mood(&data.daily_mood);
    let mood_change = aggregates::mood_change(&data.daily_mood);
    let nutrition = nutrition::summarize_nutrition(
        &data.nutrition,
        &data.hydration,
        &data.symptom_logs,
        &data.window,
        options,
    );
    let fitness = fitness::summarize_fitness(&data.fitness);
    let correlations = detect_correlations(&data.symptom_logs, &data.nutrition, &data.hydration, options);
    let workout_comparison = fitness::compare_workout_days(&data.symptom_logs, &data.fitness, options);

    let plain_language_insights = build_insights(&InsightInputs {
        symptoms: &symptoms,
        mood: &mood,
        mood_change,
        nutrition: &nutrition,
        fitness: &fitness,
        correlations: &correlations,
        workout_comparison: workout_comparison.as_ref(),
        options,
    });

    tracing::debug!(
        symptom_logs = symptoms.summary.total,
        correlations = correlations.len(),
        insights = plain_language_insights.len(),
        "Analyzed tracker window"
    );

    Summary {
        symptoms: symptoms.summary,
        mood,
        nutrition,
        fitness,
        correlations,
        workout_comparison,
        plain_language_insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{MealType, MoodLevel, Severity};
    use crate::models::{DailyMood, HydrationEntry, NutritionEntry, SymptomLog};
    use crate::store::DateWindow;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 30, 20, 0, 0).unwrap()
    }

    fn window() -> DateWindow {
        DateWindow::ending_at(end(), 30)
    }

    fn log(name: &str, severity: Severity, at: DateTime<Utc>, triggers: &[&str]) -> SymptomLog {
        SymptomLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            symptom_id: Uuid::nil(),
            symptom_name: Some(name.into()),
            severity,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            notes: None,
            logged_at: at,
        }
    }

    fn day(n: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, n, hour, 0, 0).unwrap()
    }

    fn hot_flashes() -> Vec<SymptomLog> {
        let levels = [3, 3, 3, 2, 2, 1, 1, 1, 1, 1];
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let severity = Severity::from_level(*level).unwrap();
                log("Hot flashes", severity, day(1 + i as u32, 9), &[])
            })
            .collect()
    }

    fn rich_data() -> TrackerData {
        let mut data = TrackerData::empty(window());
        data.symptom_logs = hot_flashes();
        for d in [2, 5, 8, 11] {
            data.symptom_logs.push(log("Headache", Severity::Severe, day(d, 15), &["stress"]));
        }
        data.symptom_logs.push(log("Headache", Severity::Mild, day(14, 15), &["stress"]));
        data.daily_mood = (10..20)
            .map(|d| DailyMood {
                user_id: Uuid::nil(),
                date: NaiveDate::from_ymd_opt(2026, 4, d).unwrap(),
                mood: if d < 15 { MoodLevel::Okay } else { MoodLevel::Great },
            })
            .collect();
        data.nutrition = (2..12)
            .map(|d| NutritionEntry {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                food_item: "Coffee".into(),
                meal_type: if d % 2 == 0 { MealType::Snack } else { MealType::Lunch },
                calories: Some(5),
                food_tags: ["caffeine".to_string()].into_iter().collect(),
                notes: None,
                consumed_at: day(d, 19),
            })
            .collect();
        data.hydration = (1..29)
            .map(|d| HydrationEntry {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                glasses: if d % 3 == 0 { 3 } else { 7 },
                logged_at: day(d, 12),
            })
            .collect();
        data
    }

    #[test]
    fn hot_flashes_scenario() {
        let mut data = TrackerData::empty(window());
        data.symptom_logs = hot_flashes();
        let summary = analyze(&data);

        let stats = &summary.symptoms.by_name["Hot flashes"];
        assert_eq!(stats.count, 10);
        assert_eq!(stats.avg_severity, Some(1.8));
        assert_eq!(stats.trend, Trend::Improving);

        let trend_insight = summary
            .plain_language_insights
            .iter()
            .find(|i| i.insight_type == InsightType::SymptomTrend)
            .unwrap();
        assert_eq!(trend_insight.symptom.as_deref(), Some("Hot flashes"));
        assert_eq!(trend_insight.trend, Some(Trend::Improving));
    }

    #[test]
    fn empty_window_gives_empty_summary() {
        let summary = analyze(&TrackerData::empty(window()));
        assert_eq!(summary.symptoms.total, 0);
        assert!(summary.symptoms.avg_severity.is_none());
        assert!(summary.symptoms.by_name.is_empty());
        assert!(summary.correlations.is_empty());
        assert!(summary.plain_language_insights.is_empty());
    }

    #[test]
    fn permuted_input_serializes_identically() {
        let data = rich_data();
        let mut shuffled = data.clone();
        shuffled.symptom_logs.reverse();
        shuffled.symptom_logs.rotate_left(3);
        shuffled.daily_mood.reverse();
        shuffled.nutrition.rotate_right(4);
        shuffled.hydration.reverse();

        let a = serde_json::to_string(&analyze(&data)).unwrap();
        let b = serde_json::to_string(&analyze(&shuffled)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn counts_and_bounds_hold() {
        let data = rich_data();
        let summary = analyze(&data);
        let total: usize = summary.symptoms.by_name.values().map(|s| s.count).sum();
        assert_eq!(total, data.symptom_logs.len());
        for (name, stats) in &summary.symptoms.by_name {
            let expected = data.symptom_logs.iter().filter(|l| l.display_name() == name).count();
            assert_eq!(stats.count, expected);
            let avg = stats.avg_severity.unwrap();
            assert!((1.0..=3.0).contains(&avg));
        }
    }

    #[test]
    fn supported_trigger_is_reported() {
        let summary = analyze(&rich_data());
        let stress = summary
            .correlations
            .iter()
            .find(|c| c.factor == "stress")
            .unwrap();
        assert_eq!(stress.occurrences, 5);
        assert_eq!(stress.co_occurrences, 4);
        assert_eq!(stress.strength, 0.8);
        assert!(summary
            .plain_language_insights
            .iter()
            .any(|i| i.insight_type == InsightType::TriggerCorrelation));
    }

    #[test]
    fn two_co_occurrences_are_not_enough() {
        let mut data = TrackerData::empty(window());
        data.symptom_logs = vec![
            log("Headache", Severity::Severe, day(1, 9), &["alcohol"]),
            log("Headache", Severity::Severe, day(2, 9), &["alcohol"]),
            log("Headache", Severity::Mild, day(3, 9), &["alcohol"]),
        ];
        let summary = analyze(&data);
        assert!(summary.correlations.is_empty());
        assert!(summary
            .plain_language_insights
            .iter()
            .all(|i| i.insight_type != InsightType::TriggerCorrelation));
    }

    #[test]
    fn insights_are_sorted_by_strength() {
        let summary = analyze(&rich_data());
        let strengths: Vec<f64> = summary.plain_language_insights.iter().map(|i| i.strength).collect();
        assert!(!strengths.is_empty());
        assert!(strengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn mood_and_offsets_flow_through() {
        let data = rich_data();
        let summary = analyze(&data);
        assert_eq!(summary.mood.days_logged, 10);
        assert_eq!(summary.mood.good_days, 5);
        assert_eq!(summary.mood.trend, Trend::Improving);

        // Shifting the day boundary must not change counts.
        let options = AnalysisOptions {
            utc_offset: chrono::FixedOffset::east_opt(2 * 3600).unwrap(),
            ..AnalysisOptions::default()
        };
        let shifted = analyze_with(&data, &options);
        assert_eq!(shifted.symptoms.total, summary.symptoms.total);
        assert_eq!(shifted.nutrition.total, summary.nutrition.total);
    }
}
