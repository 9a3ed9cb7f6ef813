use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::application::services::StudioOutcome;
use crate::domain::{ImageQuality, ImageSize, ImageVerdict};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CreateImageRequest {
    pub prompt: Option<String>,
    pub size: Option<String>,
    pub quality: Option<String>,
}

#[derive(Serialize)]
pub struct ImageCreatedResponse {
    pub prompt: String,
    pub revised_prompt: Option<String>,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
    pub moderation: ImageVerdict,
    pub rating_description: &'static str,
    pub show_warning: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn create_image_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<CreateImageRequest>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let prompt = match resolve_prompt(&state, session_id, request.prompt).await {
        Ok(prompt) => prompt,
        Err(response) => return response,
    };

    let size = match request.size.as_deref() {
        None => ImageSize::default(),
        Some(raw) => match ImageSize::parse(raw) {
            Some(size) => size,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!(
                            "Invalid size: {}. Expected 256x256, 512x512 or 1024x1024.",
                            raw
                        ),
                    }),
                )
                    .into_response();
            }
        },
    };

    let quality = match request.quality.as_deref() {
        None => ImageQuality::default(),
        Some(raw) => match ImageQuality::parse(raw) {
            Some(quality) => quality,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid quality: {}. Expected standard or hd.", raw),
                    }),
                )
                    .into_response();
            }
        },
    };

    tracing::debug!(prompt = %sanitize_prompt(&prompt), "Processing image request");

    match state
        .studio_service
        .create_image(session_id, &prompt, size, quality)
        .await
    {
        StudioOutcome::Created(record) => {
            let show_warning = state
                .studio_service
                .moderation()
                .should_show_warning(&record.moderation);

            (
                StatusCode::CREATED,
                Json(ImageCreatedResponse {
                    prompt: record.prompt,
                    revised_prompt: record.revised_prompt,
                    source_url: record.source_url,
                    created_at: record.created_at,
                    rating_description: record.moderation.content_rating.description(),
                    moderation: record.moderation,
                    show_warning,
                }),
            )
                .into_response()
        }
        StudioOutcome::Blocked { reason } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: format!("Content blocked: {}", reason),
            }),
        )
            .into_response(),
        StudioOutcome::GenerationFailed { error } => {
            (StatusCode::BAD_GATEWAY, Json(ErrorResponse { error })).into_response()
        }
        StudioOutcome::UnknownSession => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown session: {}", session_id),
            }),
        )
            .into_response(),
    }
}

/// An explicit prompt wins; otherwise the session transcript is used, which
/// is how spoken prompts reach generation.
async fn resolve_prompt<T, M, C, I>(
    state: &AppState<T, M, C, I>,
    session_id: Uuid,
    explicit: Option<String>,
) -> Result<String, axum::response::Response>
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    if let Some(prompt) = explicit {
        if prompt.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Prompt cannot be empty".to_string(),
                }),
            )
                .into_response());
        }
        return Ok(prompt);
    }

    match state.studio_service.sessions().transcript(session_id).await {
        Some(transcript) => Ok(transcript),
        None => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No prompt provided and no transcript stored for this session".to_string(),
            }),
        )
            .into_response()),
    }
}
