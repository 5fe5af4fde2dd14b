//! Nutrition and hydration summaries: meal counts, meal timing, hydration
//! pattern, food progress and frequently logged trigger foods.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, Timelike};

use super::aggregates::{mean, round1};
use super::types::*;
use crate::models::catalogue::{CAFFEINE_TAG, SUPPORTIVE_FOODS, TRIGGER_FOODS};
use crate::models::enums::MealType;
use crate::models::{HydrationEntry, NutritionEntry, SymptomLog};
use crate::store::DateWindow;

/// Glasses per day below which a day counts as low hydration.
pub const LOW_HYDRATION_GLASSES: u32 = 6;
/// Entries needed before first and second half are compared.
pub const FOOD_PROGRESS_MIN_ENTRIES: usize = 14;
/// Tagged entries in the last week before a trigger food is called frequent.
pub const FREQUENT_TRIGGER_MIN: usize = 3;
pub const RECENT_DAYS: i64 = 7;

pub fn summarize_nutrition(
    nutrition: &[NutritionEntry],
    hydration: &[HydrationEntry],
    symptom_logs: &[SymptomLog],
    window: &DateWindow,
    options: &AnalysisOptions,
) -> NutritionSummary {
    let with_calories: Vec<f64> = nutrition
        .iter()
        .filter_map(|n| n.calories)
        .filter(|c| *c > 0)
        .map(f64::from)
        .collect();

    let meal_timing = meal_timing(nutrition, options);

    NutritionSummary {
        total: nutrition.len(),
        avg_calories: mean(&with_calories).map(|m| m.round() as u32),
        by_meal_type: meal_timing.meal_distribution.clone(),
        meal_timing,
        hydration: hydration_pattern(hydration, symptom_logs, window, options),
        food_progress: food_progress(nutrition),
        frequent_trigger_foods: frequent_trigger_foods(nutrition, window),
    }
}

// ═══════════════════════════════════════════
// Meal timing
// ═══════════════════════════════════════════

pub fn meal_timing(nutrition: &[NutritionEntry], options: &AnalysisOptions) -> MealTiming {
    let mut meal_distribution: BTreeMap<MealType, usize> = BTreeMap::new();
    for entry in nutrition {
        *meal_distribution.entry(entry.meal_type).or_default() += 1;
    }

    let breakfasts = meal_distribution.get(&MealType::Breakfast).copied().unwrap_or(0);
    let breakfast_frequency = if nutrition.is_empty() {
        0.0
    } else {
        round1(breakfasts as f64 / nutrition.len() as f64 * 100.0)
    };

    let mut caffeine_timing = CaffeineTiming::default();
    for entry in nutrition.iter().filter(|n| n.has_tag(CAFFEINE_TAG)) {
        match entry.consumed_at.with_timezone(&options.utc_offset).hour() {
            6..=11 => caffeine_timing.morning += 1,
            12..=17 => caffeine_timing.afternoon += 1,
            18..=23 => caffeine_timing.evening += 1,
            _ => {}
        }
    }

    MealTiming {
        breakfast_frequency,
        meal_distribution,
        caffeine_timing,
        skip_breakfast_days: skipped_breakfast_days(nutrition, options).len(),
    }
}

/// Days with at least one logged meal but no breakfast.
pub fn skipped_breakfast_days(
    nutrition: &[NutritionEntry],
    options: &AnalysisOptions,
) -> BTreeSet<NaiveDate> {
    let meal_days: BTreeSet<_> = nutrition.iter().map(|n| options.day_of(&n.consumed_at)).collect();
    let breakfast_days: BTreeSet<_> = nutrition
        .iter()
        .filter(|n| n.meal_type == MealType::Breakfast)
        .map(|n| options.day_of(&n.consumed_at))
        .collect();
    meal_days.difference(&breakfast_days).copied().collect()
}

/// Days with caffeine logged at or after 18:00.
pub fn evening_caffeine_days(
    nutrition: &[NutritionEntry],
    options: &AnalysisOptions,
) -> BTreeSet<NaiveDate> {
    nutrition
        .iter()
        .filter(|n| n.has_tag(CAFFEINE_TAG))
        .filter(|n| n.consumed_at.with_timezone(&options.utc_offset).hour() >= 18)
        .map(|n| options.day_of(&n.consumed_at))
        .collect()
}

// ═══════════════════════════════════════════
// Hydration
// ═══════════════════════════════════════════

/// Total glasses per calendar day.
pub fn glasses_by_day(hydration: &[HydrationEntry], options: &AnalysisOptions) -> BTreeMap<NaiveDate, u32> {
    let mut by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for entry in hydration {
        let total = by_day.entry(options.day_of(&entry.logged_at)).or_default();
        *total = total.saturating_add(entry.glasses);
    }
    by_day
}

pub fn low_hydration_days(hydration: &[HydrationEntry], options: &AnalysisOptions) -> BTreeSet<NaiveDate> {
    glasses_by_day(hydration, options)
        .into_iter()
        .filter(|(_, glasses)| *glasses < LOW_HYDRATION_GLASSES)
        .map(|(day, _)| day)
        .collect()
}

pub fn hydration_pattern(
    hydration: &[HydrationEntry],
    symptom_logs: &[SymptomLog],
    window: &DateWindow,
    options: &AnalysisOptions,
) -> HydrationPattern {
    let daily_breakdown = glasses_by_day(hydration, options);

    let week_start = window.end - Duration::days(RECENT_DAYS);
    let recent: Vec<&HydrationEntry> = hydration.iter().filter(|h| h.logged_at >= week_start).collect();
    let recent_days: BTreeSet<_> = recent.iter().map(|h| options.day_of(&h.logged_at)).collect();
    let weekly_average = if recent_days.is_empty() {
        0.0
    } else {
        let glasses: u64 = recent.iter().map(|h| u64::from(h.glasses)).sum();
        round1(glasses as f64 / recent_days.len() as f64)
    };

    let low: BTreeSet<NaiveDate> = daily_breakdown
        .iter()
        .filter(|(_, g)| **g < LOW_HYDRATION_GLASSES)
        .map(|(d, _)| *d)
        .collect();

    let mut low_severities = Vec::new();
    let mut adequate_severities = Vec::new();
    for log in symptom_logs {
        let day = options.day_of(&log.logged_at);
        let severity = f64::from(log.severity.level());
        if low.contains(&day) {
            low_severities.push(severity);
        } else if daily_breakdown.contains_key(&day) {
            adequate_severities.push(severity);
        }
    }
    let severity_change_pct = match (mean(&low_severities), mean(&adequate_severities)) {
        (Some(low_avg), Some(adequate_avg)) if adequate_avg > 0.0 => {
            Some(((low_avg - adequate_avg) / adequate_avg * 100.0).round() as i64)
        }
        _ => None,
    };

    HydrationPattern {
        weekly_average,
        daily_breakdown,
        low_hydration_days: low.into_iter().collect(),
        severity_change_pct,
    }
}

// ═══════════════════════════════════════════
// Food progress
// ═══════════════════════════════════════════

/// Compares tag counts between the older and newer half of the entries.
/// Empty until there are enough entries to compare.
pub fn food_progress(nutrition: &[NutritionEntry]) -> FoodProgress {
    if nutrition.len() < FOOD_PROGRESS_MIN_ENTRIES {
        return FoodProgress::default();
    }

    let mut sorted: Vec<&NutritionEntry> = nutrition.iter().collect();
    sorted.sort_by(|a, b| a.consumed_at.cmp(&b.consumed_at).then(a.id.cmp(&b.id)));
    let (first, second) = sorted.split_at(sorted.len() / 2);

    let count = |half: &[&NutritionEntry], tag: &str| half.iter().filter(|n| n.has_tag(tag)).count();
    let compare = |tag: &str, reduction: bool| -> Option<FoodChange> {
        let before = count(first, tag);
        let after = count(second, tag);
        if before == 0 && after == 0 {
            return None;
        }
        let change = if before == 0 {
            0
        } else {
            let delta = if reduction {
                before as f64 - after as f64
            } else {
                after as f64 - before as f64
            };
            (delta / before as f64 * 100.0).round() as i64
        };
        Some(FoodChange { before, after, change })
    };

    FoodProgress {
        trigger_food_reduction: TRIGGER_FOODS
            .iter()
            .filter_map(|tag| compare(*tag, true).map(|c| (tag.to_string(), c)))
            .collect(),
        supportive_food_increase: SUPPORTIVE_FOODS
            .iter()
            .filter_map(|tag| compare(*tag, false).map(|c| (tag.to_string(), c)))
            .collect(),
    }
}

/// Trigger foods logged at least three times in the last seven days of the window.
pub fn frequent_trigger_foods(nutrition: &[NutritionEntry], window: &DateWindow) -> Vec<TriggerFoodFrequency> {
    let week_start = window.end - Duration::days(RECENT_DAYS);
    let recent: Vec<&NutritionEntry> = nutrition.iter().filter(|n| n.consumed_at >= week_start).collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &recent {
        for tag in TRIGGER_FOODS.iter().copied().filter(|t| entry.has_tag(t)) {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut frequent: Vec<TriggerFoodFrequency> = counts
        .into_iter()
        .filter(|(_, count)| *count >= FREQUENT_TRIGGER_MIN)
        .map(|(tag, count)| TriggerFoodFrequency {
            tag: tag.to_string(),
            count,
            frequency: (count as f64 / recent.len() as f64 * 100.0).round() as i64,
        })
        .collect();
    frequent.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    frequent
}
