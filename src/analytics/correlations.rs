//! Frequency-based co-occurrence of candidate factors with high-severity logs.
//!
//! Triggers are counted per log: a trigger occurs once for every log that
//! carries it. Every other family is counted per calendar day: a factor
//! occurs on a day, and co-occurs when that day also has a high-severity log.
//! Strength is co-occurrences over occurrences. Nothing is claimed below the
//! support count or the strength floor.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

use super::aggregates::round2;
use super::nutrition::{evening_caffeine_days, low_hydration_days, skipped_breakfast_days};
use super::types::*;
use crate::models::{HydrationEntry, NutritionEntry, SymptomLog};

/// Running tally for one factor.
#[derive(Debug, Default)]
struct Tally {
    occurrences: usize,
    co_occurrences: usize,
    symptoms: BTreeMap<String, usize>,
    last_seen: Option<DateTime<Utc>>,
}

impl Tally {
    fn record_high(&mut self, logs: &[&SymptomLog]) {
        self.co_occurrences += 1;
        for log in logs {
            *self.symptoms.entry(log.display_name().to_string()).or_default() += 1;
            self.last_seen = self.last_seen.max(Some(log.logged_at));
        }
    }

    /// Most frequent symptom among the co-occurring logs; ties go to the name
    /// that sorts first.
    fn top_symptom(&self) -> Option<String> {
        self.symptoms
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.clone())
    }

    fn into_correlation(
        self,
        family: FactorFamily,
        factor: String,
        options: &AnalysisOptions,
    ) -> Option<Correlation> {
        if self.occurrences == 0
            || self.occurrences < options.min_support
            || self.co_occurrences < options.min_support
        {
            return None;
        }
        let strength = self.co_occurrences as f64 / self.occurrences as f64;
        if strength < options.min_strength {
            return None;
        }
        Some(Correlation {
            family,
            top_symptom: self.top_symptom(),
            factor,
            occurrences: self.occurrences,
            co_occurrences: self.co_occurrences,
            strength: round2(strength),
            last_seen: self.last_seen,
        })
    }
}

/// High-severity logs grouped by calendar day.
fn high_severity_days<'a>(
    symptom_logs: &'a [SymptomLog],
    options: &AnalysisOptions,
) -> BTreeMap<NaiveDate, Vec<&'a SymptomLog>> {
    let mut days: BTreeMap<NaiveDate, Vec<&SymptomLog>> = BTreeMap::new();
    for log in symptom_logs.iter().filter(|l| l.severity.is_high()) {
        days.entry(options.day_of(&log.logged_at)).or_default().push(log);
    }
    days
}

pub fn trigger_correlations(symptom_logs: &[SymptomLog], options: &AnalysisOptions) -> Vec<Correlation> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for log in symptom_logs {
        for trigger in &log.triggers {
            let tally = tallies.entry(trigger.as_str()).or_default();
            tally.occurrences += 1;
            if log.severity.is_high() {
                tally.record_high(&[log]);
            }
        }
    }

    tallies
        .into_iter()
        .filter_map(|(trigger, tally)| {
            tally.into_correlation(FactorFamily::Trigger, trigger.to_string(), options)
        })
        .collect()
}

fn day_correlation(
    family: FactorFamily,
    factor: &str,
    factor_days: &BTreeSet<NaiveDate>,
    high_days: &BTreeMap<NaiveDate, Vec<&SymptomLog>>,
    options: &AnalysisOptions,
) -> Option<Correlation> {
    let mut tally = Tally::default();
    for day in factor_days {
        tally.occurrences += 1;
        if let Some(logs) = high_days.get(day) {
            tally.record_high(logs);
        }
    }
    tally.into_correlation(family, factor.to_string(), options)
}

pub fn food_correlations(
    symptom_logs: &[SymptomLog],
    nutrition: &[NutritionEntry],
    options: &AnalysisOptions,
) -> Vec<Correlation> {
    let high_days = high_severity_days(symptom_logs, options);

    let mut tag_days: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for entry in nutrition {
        for tag in &entry.food_tags {
            tag_days
                .entry(tag.as_str())
                .or_default()
                .insert(options.day_of(&entry.consumed_at));
        }
    }

    tag_days
        .iter()
        .filter_map(|(tag, days)| day_correlation(FactorFamily::Food, tag, days, &high_days, options))
        .collect()
}

pub fn hydration_correlations(
    symptom_logs: &[SymptomLog],
    hydration: &[HydrationEntry],
    options: &AnalysisOptions,
) -> Vec<Correlation> {
    let high_days = high_severity_days(symptom_logs, options);
    let low_days = low_hydration_days(hydration, options);
    day_correlation(FactorFamily::Hydration, LOW_HYDRATION_FACTOR, &low_days, &high_days, options)
        .into_iter()
        .collect()
}

pub fn meal_timing_correlations(
    symptom_logs: &[SymptomLog],
    nutrition: &[NutritionEntry],
    options: &AnalysisOptions,
) -> Vec<Correlation> {
    let high_days = high_severity_days(symptom_logs, options);
    [
        (SKIPPED_BREAKFAST_FACTOR, skipped_breakfast_days(nutrition, options)),
        (EVENING_CAFFEINE_FACTOR, evening_caffeine_days(nutrition, options)),
    ]
    .iter()
    .filter_map(|(factor, days)| day_correlation(FactorFamily::MealTiming, factor, days, &high_days, options))
    .collect()
}

/// All factor families, strongest first.
pub fn detect_correlations(
    symptom_logs: &[SymptomLog],
    nutrition: &[NutritionEntry],
    hydration: &[HydrationEntry],
    options: &AnalysisOptions,
) -> Vec<Correlation> {
    let mut correlations = trigger_correlations(symptom_logs, options);
    correlations.extend(food_correlations(symptom_logs, nutrition, options));
    correlations.extend(hydration_correlations(symptom_logs, hydration, options));
    correlations.extend(meal_timing_correlations(symptom_logs, nutrition, options));

    correlations.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then(b.co_occurrences.cmp(&a.co_occurrences))
            .then(a.family.cmp(&b.family))
            .then_with(|| a.factor.cmp(&b.factor))
    });
    correlations
}
