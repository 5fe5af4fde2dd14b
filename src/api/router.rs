//! Tracker API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Audit logger

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::store::LogStore;

/// Build the tracker API router over `store`, with the configured default window.
pub fn tracker_api_router(store: Arc<dyn LogStore>) -> Router {
    let ctx = ApiContext::new(store).with_default_window(crate::config::get().default_window_days);
    build_router(ctx)
}

/// Build router from a pre-constructed `ApiContext`.
pub fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/users/:user_id/tracker-insights", get(endpoints::insights::tracker))
        .route("/users/:user_id/nutrition-insights", get(endpoints::insights::nutrition))
        .route("/users/:user_id/doctor-report", get(endpoints::report::json))
        .route("/users/:user_id/doctor-report.pdf", get(endpoints::report::pdf))
        .route("/users/:user_id/health-summary", get(endpoints::report::health_summary))
        .route("/users/:user_id/weekly-summary", get(endpoints::weekly::summary))
        .route("/users/:user_id/weekly-insights", get(endpoints::weekly::insights))
        .with_state(ctx)
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new().nest("/api", routes)
}
