mod audio_recorder;
mod chat_client;
mod image_fetcher;
mod image_generation;
mod moderation_endpoint;
mod transcription_engine;

pub use audio_recorder::{AudioCaptureError, AudioRecorder};
pub use chat_client::{ChatClient, ChatClientError, ChatRequest};
pub use image_fetcher::{FetchedImage, ImageFetchError, ImageFetcher};
pub use image_generation::{GeneratedImage, ImageGenerationClient, ImageGenerationError};
pub use moderation_endpoint::{
    ModerationEndpoint, ModerationEndpointError, ScreeningCategories, TextScreening,
};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
