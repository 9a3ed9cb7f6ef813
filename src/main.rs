use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use skagen::application::services::{
    GenerationService, ModerationService, SessionStore, StudioService, TranscriptionService,
};
use skagen::infrastructure::audio::CpalAudioRecorder;
use skagen::infrastructure::http::HttpImageFetcher;
use skagen::infrastructure::observability::{TracingConfig, init_tracing};
use skagen::infrastructure::openai::{
    OpenAiChatClient, OpenAiConfig, OpenAiImageClient, OpenAiModerationEndpoint,
    OpenAiTranscriptionEngine,
};
use skagen::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    init_tracing(
        TracingConfig::new(
            settings.environment.as_str(),
            settings.logging.json_format,
        ),
        settings.server.port,
    );

    let openai_config = OpenAiConfig::new(settings.openai.api_key.clone())
        .with_base_url(settings.openai.base_url.clone())
        .with_timeout(settings.openai.request_timeout);

    let transcription_engine = Arc::new(OpenAiTranscriptionEngine::new(
        openai_config.clone(),
        settings.openai.transcription_model.clone(),
    ));
    let moderation_endpoint = Arc::new(OpenAiModerationEndpoint::new(
        openai_config.clone(),
        settings.openai.moderation_model.clone(),
    ));
    let chat_client = Arc::new(OpenAiChatClient::new(
        openai_config.clone(),
        settings.openai.chat_model.clone(),
    ));
    let image_client = Arc::new(OpenAiImageClient::new(
        openai_config.with_timeout(settings.openai.image_timeout),
        settings.openai.image_model.clone(),
    ));

    let recorder = Arc::new(CpalAudioRecorder::new(settings.audio.sample_rate));
    let image_fetcher = Arc::new(HttpImageFetcher::new(settings.openai.request_timeout));

    let transcription_service = Arc::new(TranscriptionService::new(
        transcription_engine,
        recorder,
    ));
    let moderation_service = Arc::new(ModerationService::new(
        moderation_endpoint,
        Arc::clone(&chat_client),
    ));
    let generation_service = Arc::new(GenerationService::new(image_client, chat_client));
    let studio_service = Arc::new(StudioService::new(
        moderation_service,
        Arc::clone(&generation_service),
        image_fetcher,
        SessionStore::new(),
    ));

    let state = AppState {
        transcription_service,
        generation_service,
        studio_service,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
