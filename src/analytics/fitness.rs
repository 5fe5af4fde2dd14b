use std::collections::{BTreeMap, BTreeSet};

use super::aggregates::{mean, round1};
use super::types::*;
use crate::models::{FitnessEntry, SymptomLog};

/// Logs needed on each side before workout days are compared.
pub const WORKOUT_MIN_LOGS: usize = 3;
/// Relative reduction on workout days needed before it is reported.
pub const WORKOUT_MIN_REDUCTION: f64 = 0.20;

pub fn summarize_fitness(fitness: &[FitnessEntry]) -> FitnessSummary {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for entry in fitness {
        *by_type.entry(entry.exercise_type.clone()).or_default() += 1;
    }

    let durations: Vec<f64> = fitness
        .iter()
        .filter_map(|f| f.duration_minutes)
        .filter(|d| *d > 0)
        .map(f64::from)
        .collect();

    FitnessSummary {
        total: fitness.len(),
        avg_workouts_per_week: workouts_per_week(fitness),
        by_type,
        avg_duration: mean(&durations).map(|m| m.round() as u32),
    }
}

/// Workouts per week over the observed span. The span is floored at one day
/// so a burst of same-day workouts does not explode the rate.
fn workouts_per_week(fitness: &[FitnessEntry]) -> f64 {
    let (Some(oldest), Some(newest)) = (
        fitness.iter().map(|f| f.performed_at).min(),
        fitness.iter().map(|f| f.performed_at).max(),
    ) else {
        return 0.0;
    };
    let span_days = ((newest - oldest).num_seconds() as f64 / 86_400.0).max(1.0);
    round1(fitness.len() as f64 / (span_days / 7.0))
}

/// Mean severity on days with a workout against all other days.
/// `None` unless both sides have enough logs and workout days are clearly lower.
pub fn compare_workout_days(
    symptom_logs: &[SymptomLog],
    fitness: &[FitnessEntry],
    options: &AnalysisOptions,
) -> Option<WorkoutComparison> {
    let workout_days: BTreeSet<_> = fitness.iter().map(|f| options.day_of(&f.performed_at)).collect();
    if workout_days.is_empty() {
        return None;
    }

    let (on, off): (Vec<&SymptomLog>, Vec<&SymptomLog>) = symptom_logs
        .iter()
        .partition(|l| workout_days.contains(&options.day_of(&l.logged_at)));
    if on.len() < WORKOUT_MIN_LOGS || off.len() < WORKOUT_MIN_LOGS {
        return None;
    }

    let severities = |logs: &[&SymptomLog]| -> Vec<f64> {
        logs.iter().map(|l| f64::from(l.severity.level())).collect()
    };
    let workout_avg = mean(&severities(&on))?;
    let other_avg = mean(&severities(&off))?;
    if other_avg <= 0.0 {
        return None;
    }

    let reduction = (other_avg - workout_avg) / other_avg;
    if reduction < WORKOUT_MIN_REDUCTION {
        return None;
    }

    Some(WorkoutComparison {
        workout_day_avg: round1(workout_avg),
        other_day_avg: round1(other_avg),
        reduction_pct: (reduction * 100.0).round() as i64,
        workout_day_logs: on.len(),
        other_day_logs: off.len(),
    })
}
