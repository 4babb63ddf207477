//! Health and static lookups.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use codebuddy_types::tutor::SUGGESTIONS;

use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /health - Liveness plus which collaborators are configured.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_configured": state.processor.has_provider(),
        "images_configured": state.processor.has_image_search(),
    }))
}

/// GET /api/v1/suggestions - The canned starter prompts.
pub async fn list_suggestions() -> Json<ApiResponse<Vec<&'static str>>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(SUGGESTIONS.to_vec(), request_id, elapsed))
}
