//! Fixed vocabularies shared by logging and analysis: default symptoms,
//! trigger options and the food-tag groups the nutrition analysis keys on.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════
// Symptoms and triggers
// ═══════════════════════════════════════════

/// Symptoms seeded for every new user: (name, icon).
pub const DEFAULT_SYMPTOMS: &[(&str, &str)] = &[
    ("Hot flashes", "🔥"),
    ("Night sweats", "💧"),
    ("Fatigue", "😫"),
    ("Brain fog", "🌫️"),
    ("Mood swings", "🎭"),
    ("Anxiety", "😰"),
    ("Headaches", "🤕"),
    ("Joint pain", "🦴"),
    ("Bloating", "🎈"),
    ("Insomnia", "😵"),
    ("Weight gain", "⚖️"),
    ("Low libido", "💔"),
];

/// Symptom users log to mark a day without complaints. Counted as a good day,
/// never as a symptom, by the health summary.
pub const GOOD_DAY_SYMPTOM: &str = "Good Day";

/// Trigger options offered when logging a symptom. Not stored in the database.
pub const TRIGGER_OPTIONS: &[&str] = &[
    "Stress",
    "Poor sleep",
    "Alcohol",
    "Coffee",
    "Spicy food",
    "Skipped meal",
    "Exercise",
    "Hot weather",
    "Work",
    "Travel",
    "Hormonal",
    "Unknown",
];

// ═══════════════════════════════════════════
// Food tags
// ═══════════════════════════════════════════

pub const TRIGGER_FOODS: &[&str] = &[
    "caffeine",
    "alcohol",
    "spicy_food",
    "sugar_refined_carbs",
    "processed_food",
];

pub const SUPPORTIVE_FOODS: &[&str] = &[
    "phytoestrogens",
    "calcium_rich",
    "omega_3s",
    "fiber",
    "protein",
];

pub const CAFFEINE_TAG: &str = "caffeine";

/// Human-readable form of a food tag: `spicy_food` → `spicy food`.
pub fn food_tag_label(tag: &str) -> String {
    tag.replace('_', " ")
}

pub fn is_trigger_food(tag: &str) -> bool {
    TRIGGER_FOODS.contains(&tag)
}

/// Default symptom info for seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultSymptom {
    pub name: String,
    pub icon: String,
}

pub fn default_symptoms() -> Vec<DefaultSymptom> {
    DEFAULT_SYMPTOMS
        .iter()
        .map(|&(name, icon)| DefaultSymptom {
            name: name.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}
