//! Insight endpoints.
//!
//! `GET /api/users/:user_id/tracker-insights`: full summary.
//! `GET /api/users/:user_id/nutrition-insights`: same summary, insights
//! limited to the nutrition types.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::analytics::{self, Summary};
use crate::api::error::ApiError;
use crate::api::types::{parse_user_id, ApiContext, WindowQuery, WindowedResponse};

async fn summarize(ctx: &ApiContext, user_id: &str, query: &WindowQuery) -> Result<(Summary, u32), ApiError> {
    let user_id = parse_user_id(user_id)?;
    let days = query.days(ctx.default_window_days)?;
    let window = crate::store::DateWindow::ending_at(Utc::now(), days);

    let data = ctx.load(user_id, window).await?;
    let summary = analytics::analyze(&data);

    tracing::info!(
        user_id = %user_id,
        days,
        symptom_logs = summary.symptoms.total,
        insights = summary.plain_language_insights.len(),
        "Tracker window analyzed"
    );
    Ok((summary, days))
}

pub async fn tracker(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowedResponse<Summary>>, ApiError> {
    let (summary, days) = summarize(&ctx, &user_id, &query).await?;
    Ok(Json(WindowedResponse::new(summary, days)))
}

pub async fn nutrition(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowedResponse<Summary>>, ApiError> {
    let (mut summary, days) = summarize(&ctx, &user_id, &query).await?;
    summary
        .plain_language_insights
        .retain(|i| i.insight_type.is_nutrition());
    Ok(Json(WindowedResponse::new(summary, days)))
}
