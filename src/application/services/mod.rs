mod generation_service;
mod moderation_service;
mod studio_service;
mod transcription_service;

pub use generation_service::{
    GenerationOutcome, GenerationService, MAX_PROMPT_CHARS, PromptValidation, VariationOutcome,
};
pub use moderation_service::ModerationService;
pub use studio_service::{SessionStore, StudioOutcome, StudioService};
pub use transcription_service::{TranscriptOutcome, TranscriptionService};
