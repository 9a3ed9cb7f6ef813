use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    capabilities_handler, create_image_handler, create_session_handler, enhance_prompt_handler,
    gallery_handler, gallery_image_handler, health_handler, record_handler,
    reset_session_handler, transcribe_handler, validate_prompt_handler, variations_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<T, M, C, I>(state: AppState<T, M, C, I>) -> Router
where
    T: TranscriptionEngine + 'static,
    M: ModerationEndpoint + 'static,
    C: ChatClient + 'static,
    I: ImageGenerationClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let max_upload_bytes = state.settings.audio.max_upload_bytes;

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/capabilities",
            get(capabilities_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions",
            post(create_session_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}",
            delete(reset_session_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}/recordings",
            post(record_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}/transcriptions",
            post(transcribe_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}/images",
            post(create_image_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}/gallery",
            get(gallery_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/sessions/{session_id}/gallery/{index}",
            get(gallery_image_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/prompts/validate",
            post(validate_prompt_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/prompts/enhance",
            post(enhance_prompt_handler::<T, M, C, I>),
        )
        .route(
            "/api/v1/prompts/variations",
            post(variations_handler::<T, M, C, I>),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
