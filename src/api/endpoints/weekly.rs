//! Weekly endpoints.
//!
//! `GET /api/users/:user_id/weekly-summary`: recap of the last seven days,
//! `null` when nothing was logged.
//! `GET /api/users/:user_id/weekly-insights`: cards for the current
//! Sunday-to-Saturday week, compared with the week before.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::analytics::{self, AnalysisOptions, WeeklyInsights, WeeklySummary};
use crate::api::error::ApiError;
use crate::api::types::{parse_user_id, ApiContext};
use crate::store::DateWindow;

pub async fn summary(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Option<WeeklySummary>>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let window = DateWindow::ending_at(Utc::now(), analytics::weekly::WEEK_DAYS);
    let data = ctx.load(user_id, window).await?;
    Ok(Json(analytics::weekly_summary(&data, &AnalysisOptions::default())))
}

pub async fn insights(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<WeeklyInsights>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let options = AnalysisOptions::default();
    let (this_week, last_week) = analytics::week_windows(Utc::now(), &options);

    let current = ctx.load(user_id, this_week).await?;
    let previous = ctx.load(user_id, last_week).await?;
    let cards = analytics::weekly_insights(&current, &previous, &options);

    tracing::info!(user_id = %user_id, cards = cards.insights.len(), "Weekly insights built");
    Ok(Json(cards))
}
