mod chat;
mod config;
mod image;
mod moderation;
mod transcription;

pub use chat::OpenAiChatClient;
pub use config::{DEFAULT_BASE_URL, OpenAiConfig};
pub use image::OpenAiImageClient;
pub use moderation::OpenAiModerationEndpoint;
pub use transcription::OpenAiTranscriptionEngine;
