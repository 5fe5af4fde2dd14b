use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Intensity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub exercise_type: String,
    pub duration_minutes: Option<u32>,
    pub calories_burned: Option<u32>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    pub performed_at: DateTime<Utc>,
}
