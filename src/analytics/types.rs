use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{MealType, Severity, TimeOfDay};
use crate::store::DateWindow;

// ═══════════════════════════════════════════
// Options
// ═══════════════════════════════════════════

/// Knobs for one analysis run. Defaults match the thresholds the insight
/// texts are written for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Offset used to bucket timestamps into calendar days.
    pub utc_offset: FixedOffset,
    /// Minimum factor occurrences and co-occurrences before a correlation is reported.
    pub min_support: usize,
    /// Minimum co-occurrence ratio before a correlation is reported.
    pub min_strength: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            min_support: 3,
            min_strength: 0.5,
        }
    }
}

impl AnalysisOptions {
    pub fn day_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.utc_offset).date_naive()
    }

    pub fn time_of_day(&self, ts: &DateTime<Utc>) -> TimeOfDay {
        TimeOfDay::from_hour(ts.with_timezone(&self.utc_offset).hour())
    }

    /// Whole local days `first..=last` as a UTC window.
    pub fn local_days(&self, first: NaiveDate, last: NaiveDate) -> DateWindow {
        let offset = Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
        let start = first.and_time(NaiveTime::MIN) - offset;
        let end = last.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1) - offset;
        DateWindow::new(start.and_utc(), end.and_utc())
    }
}

// ═══════════════════════════════════════════
// Trend
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Worsening => "worsening",
            Self::Stable => "stable",
        }
    }

    /// Rising severity is worsening.
    pub fn from_severity_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c < -TREND_THRESHOLD => Self::Improving,
            Some(c) if c > TREND_THRESHOLD => Self::Worsening,
            _ => Self::Stable,
        }
    }

    /// Rising mood is improving.
    pub fn from_mood_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > TREND_THRESHOLD => Self::Improving,
            Some(c) if c < -TREND_THRESHOLD => Self::Worsening,
            _ => Self::Stable,
        }
    }
}

/// Relative change between halves needed to call a direction.
pub const TREND_THRESHOLD: f64 = 0.10;

// ═══════════════════════════════════════════
// Symptoms
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomStats {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_severity: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLog {
    pub id: Uuid,
    pub symptom_name: String,
    pub severity: Severity,
    pub triggers: Vec<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomSummary {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_severity: Option<f64>,
    pub trend: Trend,
    pub by_name: BTreeMap<String, SymptomStats>,
    pub recent: Vec<RecentLog>,
}

// ═══════════════════════════════════════════
// Mood
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub days_logged: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_mood: Option<f64>,
    pub good_days: usize,
    pub trend: Trend,
}

// ═══════════════════════════════════════════
// Nutrition and hydration
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaffeineTiming {
    pub morning: usize,
    pub afternoon: usize,
    pub evening: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTiming {
    /// Share of entries that are breakfast, in percent (one decimal).
    pub breakfast_frequency: f64,
    pub meal_distribution: BTreeMap<MealType, usize>,
    pub caffeine_timing: CaffeineTiming,
    /// Days with at least one meal but no breakfast.
    pub skip_breakfast_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationPattern {
    /// Mean glasses per logged day over the last seven days of the window.
    pub weekly_average: f64,
    pub daily_breakdown: BTreeMap<NaiveDate, u32>,
    pub low_hydration_days: Vec<NaiveDate>,
    /// Mean severity on low-hydration days relative to adequate days, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_change_pct: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodChange {
    pub before: usize,
    pub after: usize,
    /// Percent change in the desired direction (positive is progress).
    pub change: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodProgress {
    pub trigger_food_reduction: BTreeMap<String, FoodChange>,
    pub supportive_food_increase: BTreeMap<String, FoodChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFoodFrequency {
    pub tag: String,
    pub count: usize,
    /// Percent of last-week entries carrying the tag.
    pub frequency: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_calories: Option<u32>,
    pub by_meal_type: BTreeMap<MealType, usize>,
    pub meal_timing: MealTiming,
    pub hydration: HydrationPattern,
    pub food_progress: FoodProgress,
    pub frequent_trigger_foods: Vec<TriggerFoodFrequency>,
}

// ═══════════════════════════════════════════
// Fitness
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessSummary {
    pub total: usize,
    pub avg_workouts_per_week: f64,
    pub by_type: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutComparison {
    pub workout_day_avg: f64,
    pub other_day_avg: f64,
    /// How much lower severity is on workout days, in percent.
    pub reduction_pct: i64,
    pub workout_day_logs: usize,
    pub other_day_logs: usize,
}

// ═══════════════════════════════════════════
// Correlations
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactorFamily {
    Trigger,
    Food,
    Hydration,
    MealTiming,
}

impl FactorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Food => "food",
            Self::Hydration => "hydration",
            Self::MealTiming => "meal-timing",
        }
    }
}

pub const LOW_HYDRATION_FACTOR: &str = "low-hydration";
pub const SKIPPED_BREAKFAST_FACTOR: &str = "skipped-breakfast";
pub const EVENING_CAFFEINE_FACTOR: &str = "evening-caffeine";

/// Co-occurrence of a factor with high-severity logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub family: FactorFamily,
    pub factor: String,
    /// Logs (triggers) or days (everything else) on which the factor was present.
    pub occurrences: usize,
    /// Of those, the ones with a high-severity log.
    pub co_occurrences: usize,
    pub strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_symptom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════
// Insights
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightType {
    SymptomTrend,
    FrequentSymptom,
    TriggerCorrelation,
    FoodCorrelation,
    Hydration,
    MealTiming,
    FoodProgress,
    Activity,
    Mood,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymptomTrend => "symptom-trend",
            Self::FrequentSymptom => "frequent-symptom",
            Self::TriggerCorrelation => "trigger-correlation",
            Self::FoodCorrelation => "food-correlation",
            Self::Hydration => "hydration",
            Self::MealTiming => "meal-timing",
            Self::FoodProgress => "food-progress",
            Self::Activity => "activity",
            Self::Mood => "mood",
        }
    }

    /// Types shown on the nutrition page.
    pub fn is_nutrition(&self) -> bool {
        matches!(
            self,
            Self::FoodCorrelation | Self::Hydration | Self::FoodProgress | Self::MealTiming
        )
    }
}

/// A plain-language finding. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub text: String,
    /// Normalized to [0, 1]; higher sorts first.
    pub strength: f64,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_logged_at: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════
// Summary
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub symptoms: SymptomSummary,
    pub mood: MoodSummary,
    pub nutrition: NutritionSummary,
    pub fitness: FitnessSummary,
    pub correlations: Vec<Correlation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_comparison: Option<WorkoutComparison>,
    pub plain_language_insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn local_days_cover_whole_offset_days() {
        let options = AnalysisOptions {
            utc_offset: FixedOffset::east_opt(-5 * 3600).unwrap(),
            ..AnalysisOptions::default()
        };
        let day = NaiveDate::from_ymd_opt(2026, 6, 7).unwrap();
        let window = options.local_days(day, NaiveDate::from_ymd_opt(2026, 6, 13).unwrap());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 6, 7, 5, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 6, 14, 4, 59, 59).unwrap());
        assert_eq!(options.day_of(&window.start), day);
    }

    #[test]
    fn time_of_day_follows_the_offset() {
        let ts = Utc.with_ymd_and_hms(2026, 6, 7, 3, 0, 0).unwrap();
        assert_eq!(AnalysisOptions::default().time_of_day(&ts), TimeOfDay::Night);
        let options = AnalysisOptions {
            utc_offset: FixedOffset::east_opt(5 * 3600).unwrap(),
            ..AnalysisOptions::default()
        };
        assert_eq!(options.time_of_day(&ts), TimeOfDay::Morning);
    }
}
