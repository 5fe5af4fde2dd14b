//! Doctor report endpoints.
//!
//! `GET /api/users/:user_id/doctor-report`: report as JSON.
//! `GET /api/users/:user_id/doctor-report.pdf`: same report rendered to PDF.
//! `GET /api/users/:user_id/health-summary`: at-a-glance digest with a
//! week-by-week breakdown.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::analytics::{self, AnalysisOptions, DoctorReport, HealthSummary};
use crate::api::error::ApiError;
use crate::api::types::{parse_user_id, ApiContext, WindowQuery};

#[derive(Debug, Serialize)]
pub struct ReportResponse<T> {
    pub report: T,
}

async fn assemble(ctx: &ApiContext, user_id: &str, query: &WindowQuery) -> Result<DoctorReport, ApiError> {
    let user_id = parse_user_id(user_id)?;
    let (window, days) = query.window(ctx.default_window_days, Utc::now())?;

    let data = ctx.load(user_id, window).await?;
    let patient_name = ctx.patient_name(user_id).await?;
    let summary = analytics::analyze(&data);

    tracing::info!(user_id = %user_id, days, "Doctor report assembled");
    Ok(analytics::build_doctor_report(&summary, patient_name.as_deref(), &window))
}

pub async fn json(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ReportResponse<DoctorReport>>, ApiError> {
    let report = assemble(&ctx, &user_id, &query).await?;
    Ok(Json(ReportResponse { report }))
}

pub async fn pdf(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Response, ApiError> {
    let report = assemble(&ctx, &user_id, &query).await?;
    let filename = format!(
        "symptom-report-{}-to-{}.pdf",
        report.date_range.start, report.date_range.end
    );
    let bytes = tokio::task::spawn_blocking(move || analytics::render_pdf(&report))
        .await
        .map_err(|e| ApiError::Internal(format!("PDF task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    )
        .into_response())
}

pub async fn health_summary(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ReportResponse<HealthSummary>>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let (window, days) = query.window(ctx.default_window_days, Utc::now())?;

    let data = ctx.load(user_id, window).await?;
    let patient_name = ctx.patient_name(user_id).await?;
    let options = AnalysisOptions::default();
    let summary = analytics::analyze_with(&data, &options);
    let report = analytics::health_summary(&data, &summary, patient_name.as_deref(), &options);

    tracing::info!(user_id = %user_id, days, "Health summary assembled");
    Ok(Json(ReportResponse { report }))
}
