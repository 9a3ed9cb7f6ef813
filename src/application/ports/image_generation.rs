use async_trait::async_trait;

use crate::domain::{ImageQuality, ImageSize};

/// A successfully generated image. The backend returns a URL; downloading
/// the bytes is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}

#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<GeneratedImage, ImageGenerationError>;
}

/// Generation failures, classified from the backend's error payload so the
/// caller never has to inspect message text.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenerationError {
    #[error("prompt rejected by content policy")]
    ContentPolicyViolation,
    #[error("quota exceeded or billing issue")]
    QuotaExceeded,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
