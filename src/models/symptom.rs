use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalogue::GOOD_DAY_SYMPTOM;
use super::enums::Severity;

/// A trackable symptom. Defaults are seeded per user; users may add their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub is_default: bool,
}

/// One logged occurrence of a symptom.
///
/// `symptom_name` is joined from the symptoms table when the log is read;
/// logs whose symptom no longer resolves carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symptom_id: Uuid,
    pub symptom_name: Option<String>,
    pub severity: Severity,
    pub triggers: BTreeSet<String>,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl SymptomLog {
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    pub fn display_name(&self) -> &str {
        self.symptom_name.as_deref().unwrap_or(Self::UNKNOWN_NAME)
    }

    pub fn is_good_day(&self) -> bool {
        self.display_name().eq_ignore_ascii_case(GOOD_DAY_SYMPTOM)
    }
}
