//! Tracker HTTP API.
//!
//! Thin axum layer over the analytics core: parse the window, do one
//! bounded read from the log store, analyze, serialize. Routes are nested
//! under `/api/` and wrapped by a small middleware stack
//! (Cache-Control → Audit → Handler).

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::{build_router, tracker_api_router};
pub use server::{start_server, ApiServer, ApiSession};
pub use types::ApiContext;
