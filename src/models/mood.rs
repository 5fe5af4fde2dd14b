use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MoodLevel;

/// One mood check-in per user per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMood {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mood: MoodLevel,
}
