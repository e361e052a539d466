use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::state::AppState;
use crate::generation::GenerationError;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateScriptRequest {
    #[serde(default)]
    pub topic: String,

    #[serde(default, rename = "keyPoints")]
    pub key_points: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateScriptResponse {
    pub script: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/generate-script
/// Generate a podcast script from a topic and key points
pub async fn generate_script(
    State(state): State<AppState>,
    Json(req): Json<GenerateScriptRequest>,
) -> impl IntoResponse {
    if req.topic.trim().is_empty() || req.key_points.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Topic and key points are required.".to_string(),
            }),
        )
            .into_response();
    }

    info!("generating script for topic: {}", req.topic);

    match state.generator.generate(&req.topic, &req.key_points).await {
        Ok(script) => (StatusCode::OK, Json(GenerateScriptResponse { script })).into_response(),
        Err(GenerationError::InvalidInput) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: GenerationError::InvalidInput.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("script generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Fallback for unsupported verbs on the generation route
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed.".to_string(),
        }),
    )
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
