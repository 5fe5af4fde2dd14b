//! Log store: the read boundary between persisted tracker logs and the
//! analytics core.
//!
//! One `fetch_logs` call returns everything the core needs for a window.
//! Rows are validated by the repository layer, so the core never sees an
//! out-of-range severity or a negative glass count.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::{DailyMood, FitnessEntry, HydrationEntry, NutritionEntry, SymptomLog};

/// Inclusive time range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending at `end`.
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

/// Everything logged by one user inside a window. Lists may be in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerData {
    pub window: DateWindow,
    pub symptom_logs: Vec<SymptomLog>,
    pub daily_mood: Vec<DailyMood>,
    pub nutrition: Vec<NutritionEntry>,
    pub hydration: Vec<HydrationEntry>,
    pub fitness: Vec<FitnessEntry>,
}

impl TrackerData {
    pub fn empty(window: DateWindow) -> Self {
        Self {
            window,
            symptom_logs: Vec::new(),
            daily_mood: Vec::new(),
            nutrition: Vec::new(),
            hydration: Vec::new(),
            fitness: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symptom_logs.is_empty()
            && self.daily_mood.is_empty()
            && self.nutrition.is_empty()
            && self.hydration.is_empty()
            && self.fitness.is_empty()
    }
}

/// Read access to persisted tracker logs.
pub trait LogStore: Send + Sync {
    fn fetch_logs(&self, user_id: &Uuid, window: &DateWindow) -> Result<TrackerData, DatabaseError>;

    /// Display name for doctor reports, if the user has a profile.
    fn fetch_patient_name(&self, user_id: &Uuid) -> Result<Option<String>, DatabaseError>;
}

// ═══════════════════════════════════════════
// SQLite
// ═══════════════════════════════════════════

/// SQLite-backed store. Holds only the database path: the schema is prepared
/// once by [`SqliteLogStore::open`], then every read opens its own plain
/// connection, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct SqliteLogStore {
    path: PathBuf,
}

impl SqliteLogStore {
    /// Creates the database directory and applies pending migrations.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        db::open_database(&path)?;
        tracing::info!(database = %path.display(), "Log store ready");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writable connection for seeding tools and tests.
    pub fn writer(&self) -> Result<Connection, DatabaseError> {
        Ok(Connection::open(&self.path)?)
    }

    fn reader(&self) -> Result<Connection, DatabaseError> {
        db::open_read_connection(&self.path)
    }
}

impl LogStore for SqliteLogStore {
    fn fetch_logs(&self, user_id: &Uuid, window: &DateWindow) -> Result<TrackerData, DatabaseError> {
        let conn = self.reader()?;
        let data = TrackerData {
            window: *window,
            symptom_logs: db::fetch_symptom_logs(&conn, user_id, &window.start, &window.end)?,
            daily_mood: db::fetch_daily_moods(&conn, user_id, window.start_date(), window.end_date())?,
            nutrition: db::fetch_nutrition_entries(&conn, user_id, &window.start, &window.end)?,
            hydration: db::fetch_hydration_entries(&conn, user_id, &window.start, &window.end)?,
            fitness: db::fetch_fitness_entries(&conn, user_id, &window.start, &window.end)?,
        };

        tracing::debug!(
            user_id = %user_id,
            symptom_logs = data.symptom_logs.len(),
            moods = data.daily_mood.len(),
            nutrition = data.nutrition.len(),
            hydration = data.hydration.len(),
            fitness = data.fitness.len(),
            "Fetched tracker logs"
        );
        Ok(data)
    }

    fn fetch_patient_name(&self, user_id: &Uuid) -> Result<Option<String>, DatabaseError> {
        let conn = self.reader()?;
        db::fetch_patient_name(&conn, user_id)
    }
}

static SHARED_STORE: OnceLock<Arc<SqliteLogStore>> = OnceLock::new();

/// Process-wide store handle. The first call prepares the configured database;
/// later calls reuse it.
pub fn shared_store() -> Result<Arc<SqliteLogStore>, DatabaseError> {
    if let Some(store) = SHARED_STORE.get() {
        return Ok(Arc::clone(store));
    }
    let store = Arc::new(SqliteLogStore::open(config::get().database_path.clone())?);
    Ok(Arc::clone(SHARED_STORE.get_or_init(|| store)))
}

// ═══════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════

/// In-memory store for tests and demos. Filters by user and window like the
/// SQLite store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    symptom_logs: Vec<SymptomLog>,
    daily_mood: Vec<DailyMood>,
    nutrition: Vec<NutritionEntry>,
    hydration: Vec<HydrationEntry>,
    fitness: Vec<FitnessEntry>,
    names: BTreeMap<Uuid, String>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symptom_logs(mut self, logs: impl IntoIterator<Item = SymptomLog>) -> Self {
        self.symptom_logs.extend(logs);
        self
    }

    pub fn with_moods(mut self, moods: impl IntoIterator<Item = DailyMood>) -> Self {
        self.daily_mood.extend(moods);
        self
    }

    pub fn with_nutrition(mut self, entries: impl IntoIterator<Item = NutritionEntry>) -> Self {
        self.nutrition.extend(entries);
        self
    }

    pub fn with_hydration(mut self, entries: impl IntoIterator<Item = HydrationEntry>) -> Self {
        self.hydration.extend(entries);
        self
    }

    pub fn with_fitness(mut self, entries: impl IntoIterator<Item = FitnessEntry>) -> Self {
        self.fitness.extend(entries);
        self
    }

    pub fn with_patient_name(mut self, user_id: Uuid, name: impl Into<String>) -> Self {
        self.names.insert(user_id, name.into());
        self
    }
}

impl LogStore for MemoryLogStore {
    fn fetch_logs(&self, user_id: &Uuid, window: &DateWindow) -> Result<TrackerData, DatabaseError> {
        let (start_date, end_date) = (window.start_date(), window.end_date());
        Ok(TrackerData {
            window: *window,
            symptom_logs: self
                .symptom_logs
                .iter()
                .filter(|l| l.user_id == *user_id && window.contains(&l.logged_at))
                .cloned()
                .collect(),
            daily_mood: self
                .daily_mood
                .iter()
                .filter(|m| m.user_id == *user_id && m.date >= start_date && m.date <= end_date)
                .cloned()
                .collect(),
            nutrition: self
                .nutrition
                .iter()
                .filter(|n| n.user_id == *user_id && window.contains(&n.consumed_at))
                .cloned()
                .collect(),
            hydration: self
                .hydration
                .iter()
                .filter(|h| h.user_id == *user_id && window.contains(&h.logged_at))
                .cloned()
                .collect(),
            fitness: self
                .fitness
                .iter()
                .filter(|f| f.user_id == *user_id && window.contains(&f.performed_at))
                .cloned()
                .collect(),
        })
    }

    fn fetch_patient_name(&self, user_id: &Uuid) -> Result<Option<String>, DatabaseError> {
        Ok(self.names.get(user_id).cloned())
    }
}
