//! Orphadata prevalence passthrough.

use axum::{
    extract::{Path, State},
    Json,
};
use copilot_common::FetchOutcome;

use crate::state::SharedState;

/// Always 200: the body says whether data was found, absent, or unreachable.
pub async fn api_prevalence(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Json<FetchOutcome<serde_json::Value>> {
    Json(state.prevalence.prevalence(&code).await)
}
