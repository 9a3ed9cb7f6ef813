use std::sync::Arc;

use crate::application::ports::{
    ChatClient, ImageGenerationClient, ModerationEndpoint, TranscriptionEngine,
};
use crate::application::services::{GenerationService, StudioService, TranscriptionService};
use crate::presentation::config::Settings;

pub struct AppState<T, M, C, I>
where
    T: TranscriptionEngine,
    M: ModerationEndpoint,
    C: ChatClient,
    I: ImageGenerationClient,
{
    pub transcription_service: Arc<TranscriptionService<T>>,
    pub generation_service: Arc<GenerationService<I, C>>,
    pub studio_service: Arc<StudioService<M, C, I>>,
    pub settings: Settings,
}

impl<T, M, C, I> Clone for AppState<T, M, C, I>
where
    T: TranscriptionEngine,
    M: ModerationEndpoint,
    C: ChatClient,
    I: ImageGenerationClient,
{
    fn clone(&self) -> Self {
        Self {
            transcription_service: Arc::clone(&self.transcription_service),
            generation_service: Arc::clone(&self.generation_service),
            studio_service: Arc::clone(&self.studio_service),
            settings: self.settings.clone(),
        }
    }
}
