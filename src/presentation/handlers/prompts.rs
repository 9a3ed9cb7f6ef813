use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Serialize)]
pub struct EnhanceResponse {
    pub enhanced_prompt: String,
}

#[derive(Deserialize)]
pub struct VariationsRequest {
    pub source_url: String,
    #[serde(default = "default_variation_count")]
    pub count: u32,
}

fn default_variation_count() -> u32 {
    1
}

#[derive(Serialize)]
pub struct VariationsResponse {
    pub success: bool,
    pub error: Option<String>,
    pub urls: Vec<String>,
}

/// Pure local heuristics; never calls the backend.
pub async fn validate_prompt_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Json(request): Json<PromptRequest>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let validation = state.generation_service.validate_prompt(&request.prompt);

    (
        StatusCode::OK,
        Json(ValidationResponse {
            is_valid: validation.is_valid,
            issues: validation.issues,
            recommendations: validation.recommendations,
        }),
    )
}

#[tracing::instrument(skip(state, request))]
pub async fn enhance_prompt_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Json(request): Json<PromptRequest>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Enhancing prompt");

    let enhanced = state.generation_service.enhance_prompt(&request.prompt).await;

    (
        StatusCode::OK,
        Json(EnhanceResponse {
            enhanced_prompt: enhanced,
        }),
    )
}

pub async fn variations_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Json(request): Json<VariationsRequest>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let outcome = state
        .generation_service
        .generate_variations(&request.source_url, request.count);

    (
        StatusCode::OK,
        Json(VariationsResponse {
            success: outcome.success,
            error: outcome.error,
            urls: outcome.urls,
        }),
    )
}
