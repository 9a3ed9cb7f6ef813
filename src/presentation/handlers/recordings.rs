use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::presentation::state::AppState;

#[derive(Deserialize, Default)]
pub struct RecordRequest {
    pub duration_seconds: Option<u64>,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub bytes: usize,
    pub duration_seconds: u64,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn record_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path(session_id): Path<Uuid>,
    request: Option<Json<RecordRequest>>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    if !state.studio_service.sessions().exists(session_id).await {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown session: {}", session_id),
            }),
        )
            .into_response();
    }

    if !state.transcription_service.recorder_available() {
        tracing::warn!("Recording requested without an input device");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Microphone not available in this environment. Upload an audio file instead."
                    .to_string(),
            }),
        )
            .into_response();
    }

    let seconds = request
        .and_then(|Json(r)| r.duration_seconds)
        .unwrap_or(state.settings.audio.record_seconds);

    match state
        .transcription_service
        .record(Duration::from_secs(seconds))
        .await
    {
        Some(audio) => {
            let bytes = audio.len();
            state
                .studio_service
                .sessions()
                .store_recording(session_id, audio)
                .await;

            (
                StatusCode::OK,
                Json(RecordResponse {
                    bytes,
                    duration_seconds: seconds,
                    message: "Recording completed".to_string(),
                }),
            )
                .into_response()
        }
        None => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "Failed to record audio. Please check your microphone.".to_string(),
            }),
        )
            .into_response(),
    }
}
