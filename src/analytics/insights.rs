//! Plain-language insights.
//!
//! Each qualifying finding becomes one tagged sentence. Findings under their
//! threshold produce nothing. Texts only contain numbers and names taken
//! from the input, so the same window always yields the same sentences.

use std::cmp::Ordering;

use super::aggregates::{round2, SymptomAggregation};
use super::nutrition::LOW_HYDRATION_GLASSES;
use super::types::*;
use crate::models::catalogue::food_tag_label;

/// Logs needed before a symptom can be called frequent.
pub const FREQUENT_SYMPTOM_MIN_COUNT: usize = 5;
/// Average severity (1 to 3 scale) at which a frequent symptom is flagged.
pub const FREQUENT_SYMPTOM_MIN_SEVERITY: f64 = 2.5;
/// Breakfast share, in percent, below which logging is called infrequent.
pub const BREAKFAST_MIN_SHARE: f64 = 30.0;
/// Meals needed before the breakfast share is judged.
pub const BREAKFAST_MIN_MEALS: usize = 3;
/// Percent change in a food tag needed to report progress.
pub const FOOD_PROGRESS_MIN_CHANGE: i64 = 25;
/// Percent by which low-hydration severity must exceed adequate days.
pub const HYDRATION_SEVERITY_MIN_PCT: i64 = 20;
pub const LOW_WORKOUTS_PER_WEEK: f64 = 2.0;
pub const GREAT_WORKOUTS_PER_WEEK: f64 = 3.0;
/// Mood days needed before mood insights are offered.
pub const MOOD_MIN_DAYS: usize = 3;

/// Everything the formatter reads. Borrowed from one analysis run.
pub struct InsightInputs<'a> {
    pub symptoms: &'a SymptomAggregation,
    pub mood: &'a MoodSummary,
    pub mood_change: Option<f64>,
    pub nutrition: &'a NutritionSummary,
    pub fitness: &'a FitnessSummary,
    pub correlations: &'a [Correlation],
    pub workout_comparison: Option<&'a WorkoutComparison>,
    pub options: &'a AnalysisOptions,
}

fn insight(insight_type: InsightType, text: String, strength: f64, count: usize) -> Insight {
    Insight {
        insight_type,
        text,
        strength: round2(strength.clamp(0.0, 1.0)),
        count,
        symptom: None,
        factor: None,
        trend: None,
        last_logged_at: None,
    }
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Builds every insight and returns them in display order.
pub fn build_insights(inputs: &InsightInputs) -> Vec<Insight> {
    let mut insights = Vec::new();
    insights.extend(symptom_insights(inputs.symptoms));
    insights.extend(inputs.correlations.iter().map(correlation_insight));
    insights.extend(hydration_insights(inputs.nutrition, inputs.options));
    insights.extend(meal_timing_insights(inputs.nutrition));
    insights.extend(food_progress_insights(&inputs.nutrition.food_progress));
    insights.extend(activity_insights(inputs.fitness, inputs.workout_comparison));
    insights.extend(mood_insights(inputs.mood, inputs.mood_change));
    sort_insights(&mut insights);
    insights
}

/// Strength, then count, then most recent underlying log, then type and text.
pub fn sort_insights(insights: &mut [Insight]) {
    insights.sort_by(compare_insights);
}

fn compare_insights(a: &Insight, b: &Insight) -> Ordering {
    b.strength
        .total_cmp(&a.strength)
        .then(b.count.cmp(&a.count))
        .then(b.last_logged_at.cmp(&a.last_logged_at))
        .then_with(|| a.insight_type.as_str().cmp(b.insight_type.as_str()))
        .then_with(|| a.text.cmp(&b.text))
}

// ═══════════════════════════════════════════
// Symptoms
// ═══════════════════════════════════════════

fn symptom_insights(agg: &SymptomAggregation) -> Vec<Insight> {
    let mut out = Vec::new();
    for (name, stats) in &agg.summary.by_name {
        let detail = agg.details.get(name);
        let last = detail.map(|d| d.last_logged_at);

        if let Some(change) = detail.and_then(|d| d.change) {
            let text = match stats.trend {
                Trend::Improving => Some(format!(
                    "Good news: {name} is easing, with average severity down {}% over this period.",
                    percent(change.abs())
                )),
                Trend::Worsening => Some(format!(
                    "{name} has been getting more intense, with average severity up {}% over this period. \
                     Consider raising it with your healthcare provider.",
                    percent(change.abs())
                )),
                Trend::Stable => None,
            };
            if let Some(text) = text {
                let mut i = insight(InsightType::SymptomTrend, text, change.abs(), stats.count);
                i.symptom = Some(name.clone());
                i.trend = Some(stats.trend);
                i.last_logged_at = last;
                out.push(i);
            }
        }

        if let Some(avg) = stats.avg_severity {
            if stats.count >= FREQUENT_SYMPTOM_MIN_COUNT && avg >= FREQUENT_SYMPTOM_MIN_SEVERITY {
                let text = format!(
                    "{name} shows up often and at high severity (average {avg}/3 across {} logs). \
                     Worth discussing with your healthcare provider.",
                    stats.count
                );
                let mut i = insight(InsightType::FrequentSymptom, text, avg / 3.0, stats.count);
                i.symptom = Some(name.clone());
                i.last_logged_at = last;
                out.push(i);
            }
        }
    }
    out
}

// ═══════════════════════════════════════════
// Correlations
// ═══════════════════════════════════════════

fn correlation_insight(c: &Correlation) -> Insight {
    let most_often = c
        .top_symptom
        .as_ref()
        .map(|s| format!(", most often {s}"))
        .unwrap_or_default();
    let share = format!("{} of {}", c.co_occurrences, c.occurrences);
    let pct = percent(c.strength);

    let (insight_type, text) = match c.family {
        FactorFamily::Trigger => (
            InsightType::TriggerCorrelation,
            format!(
                "When you tag \"{}\", {share} logs ({pct}%) were severe{most_often}.",
                c.factor
            ),
        ),
        FactorFamily::Food => (
            InsightType::FoodCorrelation,
            format!(
                "On days you logged {}, {share} days ({pct}%) included a severe symptom{most_often}.",
                food_tag_label(&c.factor)
            ),
        ),
        FactorFamily::Hydration => (
            InsightType::Hydration,
            format!(
                "On low-hydration days (under {LOW_HYDRATION_GLASSES} glasses), {share} days ({pct}%) \
                 included a severe symptom{most_often}."
            ),
        ),
        FactorFamily::MealTiming => {
            let when = if c.factor == EVENING_CAFFEINE_FACTOR {
                "On days with caffeine after 6pm".to_string()
            } else if c.factor == SKIPPED_BREAKFAST_FACTOR {
                "On days you skipped breakfast".to_string()
            } else {
                format!("On {} days", c.factor)
            };
            (
                InsightType::MealTiming,
                format!("{when}, {share} days ({pct}%) included a severe symptom{most_often}."),
            )
        }
    };

    let mut i = insight(insight_type, text, c.strength, c.co_occurrences);
    i.symptom = c.top_symptom.clone();
    i.factor = Some(c.factor.clone());
    i.last_logged_at = c.last_seen;
    i
}

// ═══════════════════════════════════════════
// Nutrition
// ═══════════════════════════════════════════

fn hydration_insights(nutrition: &NutritionSummary, options: &AnalysisOptions) -> Vec<Insight> {
    let pattern = &nutrition.hydration;
    let low_days = pattern.low_hydration_days.len();
    let mut out = Vec::new();

    let target = f64::from(LOW_HYDRATION_GLASSES);
    if pattern.weekly_average > 0.0 && pattern.weekly_average < target {
        out.push(insight(
            InsightType::Hydration,
            format!(
                "You averaged {} glasses of water a day over the last week. Aim for 6 to 8.",
                pattern.weekly_average
            ),
            (target - pattern.weekly_average) / target,
            low_days,
        ));
    }

    if let Some(pct) = pattern.severity_change_pct {
        if pct >= HYDRATION_SEVERITY_MIN_PCT && low_days >= options.min_support {
            out.push(insight(
                InsightType::Hydration,
                format!("Symptoms were {pct}% more severe on days you drank less than {LOW_HYDRATION_GLASSES} glasses."),
                pct as f64 / 100.0,
                low_days,
            ));
        }
    }
    out
}

fn meal_timing_insights(nutrition: &NutritionSummary) -> Vec<Insight> {
    let share = nutrition.meal_timing.breakfast_frequency;
    if nutrition.total < BREAKFAST_MIN_MEALS || share >= BREAKFAST_MIN_SHARE {
        return Vec::new();
    }
    vec![insight(
        InsightType::MealTiming,
        format!(
            "Breakfast is only {share}% of your logged meals. Logging morning meals gives clearer patterns."
        ),
        (BREAKFAST_MIN_SHARE - share) / BREAKFAST_MIN_SHARE,
        nutrition.total,
    )]
}

fn food_progress_insights(progress: &FoodProgress) -> Vec<Insight> {
    let mut out = Vec::new();
    for (tag, c) in &progress.trigger_food_reduction {
        if c.before >= 3 && c.change >= FOOD_PROGRESS_MIN_CHANGE {
            let mut i = insight(
                InsightType::FoodProgress,
                format!(
                    "You cut back on {}: {} recently, down from {} ({}% less).",
                    food_tag_label(tag),
                    plural(c.after, "entry", "entries"),
                    c.before,
                    c.change
                ),
                c.change as f64 / 100.0,
                c.before + c.after,
            );
            i.factor = Some(tag.clone());
            out.push(i);
        }
    }
    for (tag, c) in &progress.supportive_food_increase {
        if c.before >= 3 && c.change >= FOOD_PROGRESS_MIN_CHANGE {
            let mut i = insight(
                InsightType::FoodProgress,
                format!(
                    "You're eating more {}: {} recently, up from {} ({}% more).",
                    food_tag_label(tag),
                    plural(c.after, "entry", "entries"),
                    c.before,
                    c.change
                ),
                c.change as f64 / 100.0,
                c.before + c.after,
            );
            i.factor = Some(tag.clone());
            out.push(i);
        }
    }
    out
}

// ═══════════════════════════════════════════
// Activity and mood
// ═══════════════════════════════════════════

fn activity_insights(fitness: &FitnessSummary, comparison: Option<&WorkoutComparison>) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(cmp) = comparison {
        out.push(insight(
            InsightType::Activity,
            format!(
                "Workout days show {}% lower symptom severity (average {} vs {} on other days).",
                cmp.reduction_pct, cmp.workout_day_avg, cmp.other_day_avg
            ),
            cmp.reduction_pct as f64 / 100.0,
            cmp.workout_day_logs,
        ));
    }

    if fitness.total > 0 {
        let rate = fitness.avg_workouts_per_week;
        if rate < LOW_WORKOUTS_PER_WEEK {
            out.push(insight(
                InsightType::Activity,
                format!(
                    "Exercise frequency is low at {rate} workouts a week. \
                     Two to three sessions a week can help with symptom management."
                ),
                (LOW_WORKOUTS_PER_WEEK - rate) / LOW_WORKOUTS_PER_WEEK,
                fitness.total,
            ));
        } else if rate >= GREAT_WORKOUTS_PER_WEEK {
            out.push(insight(
                InsightType::Activity,
                format!("Great exercise consistency at {rate} workouts a week."),
                rate / 7.0,
                fitness.total,
            ));
        }
    }
    out
}

fn mood_insights(mood: &MoodSummary, change: Option<f64>) -> Vec<Insight> {
    let mut out = Vec::new();
    if mood.days_logged < MOOD_MIN_DAYS {
        return out;
    }

    if let Some(change) = change {
        let text = match mood.trend {
            Trend::Improving => Some("Your mood has been lifting over this period."),
            Trend::Worsening => Some("Your mood has dipped over this period. Be gentle with yourself."),
            Trend::Stable => None,
        };
        if let Some(text) = text {
            let mut i = insight(InsightType::Mood, text.to_string(), change.abs(), mood.days_logged);
            i.trend = Some(mood.trend);
            out.push(i);
        }
    }

    if mood.good_days > 0 {
        out.push(insight(
            InsightType::Mood,
            format!(
                "You had {} out of {} logged.",
                plural(mood.good_days, "good day", "good days"),
                mood.days_logged
            ),
            mood.good_days as f64 / mood.days_logged as f64,
            mood.good_days,
        ));
    }
    out
}
