use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn create_session_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let (session_id, created_at) = state.studio_service.sessions().create().await;

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            created_at,
        }),
    )
}

#[tracing::instrument(skip(state))]
pub async fn reset_session_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    if state.studio_service.sessions().reset(session_id).await {
        (
            StatusCode::OK,
            Json(ResetResponse {
                message: "Session cleared".to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown session: {}", session_id),
            }),
        )
            .into_response()
    }
}
