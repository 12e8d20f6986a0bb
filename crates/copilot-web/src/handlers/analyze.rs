//! Analyze endpoints: HTML form submission and JSON API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use copilot_common::UserInput;
use serde::Deserialize;
use serde_json::json;

use crate::handlers::page::{render_page, PageResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
    #[serde(default)]
    pub image_attached: bool,
}

/// Reads the `query` text and notes whether a non-empty `image` file came
/// with it. The image bytes are discarded.
async fn read_form(mut multipart: Multipart) -> Result<UserInput, String> {
    let mut input = UserInput::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("query") => {
                input.text = field.text().await.map_err(|e| e.to_string())?;
            }
            Some("image") => {
                let named = field.file_name().map(|n| !n.is_empty()).unwrap_or(false);
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                input.image_attached = named && !bytes.is_empty();
            }
            _ => {}
        }
    }
    Ok(input)
}

pub async fn analyze_form(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let input = match read_form(multipart).await {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed analyze form");
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page("", Some(PageResult::Failed(&e)))),
            );
        }
    };

    match state.workflow.run(&input).await {
        Ok(presentation) => (
            StatusCode::OK,
            Html(render_page(input.as_str(), Some(PageResult::Presented(&presentation)))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Analyze request failed");
            let message = e.to_string();
            (
                StatusCode::BAD_GATEWAY,
                Html(render_page(input.as_str(), Some(PageResult::Failed(&message)))),
            )
        }
    }
}

pub async fn api_analyze(
    State(state): State<SharedState>,
    Json(payload): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let input = UserInput::new(payload.query).with_image(payload.image_attached);

    match state.workflow.run(&input).await {
        Ok(presentation) => (StatusCode::OK, Json(json!(presentation))),
        Err(e) => {
            tracing::error!(error = %e, "Analyze request failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() })))
        }
    }
}
