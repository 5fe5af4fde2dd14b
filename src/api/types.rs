//! Shared types for the tracker API layer.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::config::{self, MAX_WINDOW_DAYS};
use crate::store::{DateWindow, LogStore, TrackerData};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
/// Stateless after construction, so cloning per request is cheap.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn LogStore>,
    pub default_window_days: u32,
}

impl ApiContext {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            default_window_days: config::DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_default_window(mut self, days: u32) -> Self {
        self.default_window_days = days;
        self
    }

    /// One bounded read on the blocking pool.
    pub async fn load(&self, user_id: Uuid, window: DateWindow) -> Result<TrackerData, ApiError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.fetch_logs(&user_id, &window))
            .await
            .map_err(|e| ApiError::Internal(format!("log fetch task failed: {e}")))?
            .map_err(ApiError::from)
    }

    pub async fn patient_name(&self, user_id: Uuid) -> Result<Option<String>, ApiError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.fetch_patient_name(&user_id))
            .await
            .map_err(|e| ApiError::Internal(format!("profile fetch task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

// ═══════════════════════════════════════════════════════════
// Request parameters
// ═══════════════════════════════════════════════════════════

/// Query string shared by the windowed endpoints. Values are parsed by hand so
/// a malformed number gets the same JSON error body as every other failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub days: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WindowQuery {
    /// Window length in days: `default` when absent, otherwise 1..=365.
    pub fn days(&self, default: u32) -> Result<u32, ApiError> {
        let Some(raw) = self.days.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(default);
        };
        match raw.parse::<u32>() {
            Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
            _ => Err(ApiError::BadRequest(format!(
                "days must be a whole number between 1 and {MAX_WINDOW_DAYS}, got {raw:?}"
            ))),
        }
    }

    /// The window ending `now`, or the explicit `[startDate, endDate]` calendar range when
    /// both are given. Returns the window with its length in days.
    pub fn window(&self, default_days: u32, now: DateTime<Utc>) -> Result<(DateWindow, u32), ApiError> {
        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (None, None) => {
                let days = self.days(default_days)?;
                Ok((DateWindow::ending_at(now, days), days))
            }
            (Some(start), Some(end)) => {
                let start = parse_date("startDate", start)?;
                let end = parse_date("endDate", end)?;
                if end < start {
                    return Err(ApiError::BadRequest("endDate is before startDate".into()));
                }
                let days = (end - start).num_days() + 1;
                if days > i64::from(MAX_WINDOW_DAYS) {
                    return Err(ApiError::BadRequest(format!(
                        "date range may span at most {MAX_WINDOW_DAYS} days"
                    )));
                }
                let end_of_day = end
                    .and_hms_opt(23, 59, 59)
                    .ok_or_else(|| ApiError::BadRequest("endDate is out of range".into()))?;
                let window = DateWindow::new(start.and_time(NaiveTime::MIN).and_utc(), end_of_day.and_utc());
                Ok((window, days as u32))
            }
            _ => Err(ApiError::BadRequest(
                "startDate and endDate must be given together".into(),
            )),
        }
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("{field} must be YYYY-MM-DD, got {raw:?}")))
}

pub fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid user id: {raw}")))
}

// ═══════════════════════════════════════════════════════════
// Response envelopes
// ═══════════════════════════════════════════════════════════

/// `{ data, period }` envelope used by the insight endpoints.
#[derive(Debug, Serialize)]
pub struct WindowedResponse<T> {
    pub data: T,
    pub period: String,
}

impl<T> WindowedResponse<T> {
    pub fn new(data: T, days: u32) -> Self {
        Self {
            data,
            period: format!("{days} days"),
        }
    }
}
