use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::application::services::TranscriptOutcome;
use crate::domain::AudioFormat;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
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

    let uploaded = match read_uploaded_audio(&mut multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let audio = match uploaded {
        Some(bytes) => bytes,
        None => {
            match state
                .studio_service
                .sessions()
                .recorded_audio(session_id)
                .await
            {
                Some(bytes) => bytes,
                None => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: "No audio uploaded and no recording stored for this session"
                                .to_string(),
                        }),
                    )
                        .into_response();
                }
            }
        }
    };

    match state.transcription_service.transcribe(&audio).await {
        TranscriptOutcome::Transcript(transcript) => {
            state
                .studio_service
                .sessions()
                .store_transcript(session_id, transcript.clone())
                .await;

            (
                StatusCode::OK,
                Json(TranscriptionResponse { transcript }),
            )
                .into_response()
        }
        TranscriptOutcome::NoSpeech => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "No speech detected. Please try again with clearer speech.".to_string(),
            }),
        )
            .into_response(),
        TranscriptOutcome::Failed { reason } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("Could not transcribe audio: {}", reason),
            }),
        )
            .into_response(),
    }
}

/// Reads the first uploaded file field, if any, validating the audio format
/// against the accepted upload formats.
async fn read_uploaded_audio(
    multipart: &mut Multipart,
) -> Result<Option<Vec<u8>>, axum::response::Response> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Ok(None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart body");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart body: {}", e),
                }),
            )
                .into_response());
        }
    };

    let filename = field.file_name().map(safe_filename);
    let content_type = field.content_type().map(str::to_string);

    let format = filename
        .as_deref()
        .and_then(AudioFormat::from_filename)
        .or_else(|| content_type.as_deref().and_then(AudioFormat::from_mime));

    match format {
        Some(format) if format.accepted_for_upload() => {
            tracing::debug!(
                filename = filename.as_deref().unwrap_or("unknown"),
                format = format.extension(),
                "Processing audio upload"
            );
        }
        Some(format) => {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse {
                    error: format!(
                        "Audio format {} is not accepted for upload. Use wav, mp3, m4a or ogg.",
                        format.extension()
                    ),
                }),
            )
                .into_response());
        }
        None => {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse {
                    error: "Unrecognized audio format. Use wav, mp3, m4a or ogg.".to_string(),
                }),
            )
                .into_response());
        }
    }

    match field.bytes().await {
        Ok(bytes) if bytes.is_empty() => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Uploaded audio file is empty".to_string(),
            }),
        )
            .into_response()),
        Ok(bytes) => Ok(Some(bytes.to_vec())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read uploaded audio");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read uploaded file: {}", e),
                }),
            )
                .into_response())
        }
    }
}

/// Strips path separators and other unsafe characters from an uploaded
/// filename before it reaches the logs.
fn safe_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c == ' ' || c == '.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
