use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::domain::{SUPPORTED_FORMATS, UPLOAD_FORMATS};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CapabilitiesResponse {
    pub microphone_available: bool,
    pub record_seconds: u64,
    pub upload_formats: Vec<&'static str>,
    pub supported_formats: Vec<&'static str>,
}

pub async fn capabilities_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    (
        StatusCode::OK,
        Json(CapabilitiesResponse {
            microphone_available: state.transcription_service.recorder_available(),
            record_seconds: state.settings.audio.record_seconds,
            upload_formats: UPLOAD_FORMATS.iter().map(|f| f.extension()).collect(),
            supported_formats: SUPPORTED_FORMATS.iter().map(|f| f.extension()).collect(),
        }),
    )
}
