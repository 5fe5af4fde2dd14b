pub mod analytics; // Aggregation, correlations, insights, reports
pub mod api; // HTTP layer (axum)
pub mod config;
pub mod db;
pub mod models;
pub mod store; // Log store boundary

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub use analytics::{analyze, analyze_with, AnalysisOptions, Summary};
pub use store::{DateWindow, LogStore, MemoryLogStore, SqliteLogStore, TrackerData};

/// Process entry point: tracing, configuration, then the HTTP server until Ctrl-C.
pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = config::get();
    tracing::info!(
        database = %cfg.database_path.display(),
        bind_addr = %cfg.bind_addr,
        default_window_days = cfg.default_window_days,
        "Configuration resolved"
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn LogStore> = match store::shared_store() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(database = %cfg.database_path.display(), "Cannot open log store: {e}");
            return ExitCode::FAILURE;
        }
    };
    let app = api::tracker_api_router(store);

    match runtime.block_on(api::server::serve_until_ctrl_c(app, cfg.bind_addr)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(bind_addr = %cfg.bind_addr, "API server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
