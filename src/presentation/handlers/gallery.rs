use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::domain::ImageVerdict;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct GalleryQuery {
    #[serde(default)]
    pub include_adult: bool,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub total: usize,
    pub shown: usize,
    pub items: Vec<GalleryItem>,
}

#[derive(Serialize)]
pub struct GalleryItem {
    pub index: usize,
    pub prompt: String,
    pub revised_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub moderation: ImageVerdict,
    pub rating_description: &'static str,
    pub content_type: String,
    pub size_bytes: usize,
    pub source_url: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn gallery_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let sessions = state.studio_service.sessions();

    let records = match sessions.gallery(session_id, query.include_adult).await {
        Some(records) => records,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Unknown session: {}", session_id),
                }),
            )
                .into_response();
        }
    };

    let total = sessions.gallery_len(session_id).await.unwrap_or(0);

    let items: Vec<GalleryItem> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| GalleryItem {
            index,
            prompt: record.prompt,
            revised_prompt: record.revised_prompt,
            created_at: record.created_at,
            rating_description: record.moderation.content_rating.description(),
            content_type: record.content_type,
            size_bytes: record.image_bytes.len(),
            source_url: record.source_url,
            moderation: record.moderation,
        })
        .collect();

    (
        StatusCode::OK,
        Json(GalleryResponse {
            total,
            shown: items.len(),
            items,
        }),
    )
        .into_response()
}

/// Serves a single gallery image, addressed newest-first, as raw bytes.
#[tracing::instrument(skip(state))]
pub async fn gallery_image_handler<T, M, C, I>(
    State(state): State<AppState<T, M, C, I>>,
    Path((session_id, index)): Path<(Uuid, usize)>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    match state
        .studio_service
        .sessions()
        .gallery_record(session_id, index)
        .await
    {
        Some(record) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, record.content_type)],
            record.image_bytes,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No gallery image at index {}", index),
            }),
        )
            .into_response(),
    }
}
