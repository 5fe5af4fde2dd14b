use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MealType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item: String,
    pub meal_type: MealType,
    pub calories: Option<u32>,
    pub food_tags: BTreeSet<String>,
    pub notes: Option<String>,
    pub consumed_at: DateTime<Utc>,
}

impl NutritionEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.food_tags.contains(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub glasses: u32,
    pub logged_at: DateTime<Utc>,
}
