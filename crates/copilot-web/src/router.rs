//! Axum router — maps URL paths to handlers.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    analyze::{analyze_form, api_analyze},
    page::{health, index},
    prevalence::api_prevalence,
};

/// Largest accepted analyze form, screenshot included.
pub const UPLOAD_LIMIT_BYTES: usize = 200 * 1024 * 1024;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",        get(index))
        .route("/analyze", post(analyze_form).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)))

        // API endpoints
        .route("/api/analyze",           post(api_analyze))
        .route("/api/prevalence/{code}", get(api_prevalence))
        .route("/health",                get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
