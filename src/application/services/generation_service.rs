use std::sync::Arc;

use crate::application::ports::{
    ChatClient, ChatRequest, ImageGenerationClient, ImageGenerationError,
};
use crate::domain::{ImageQuality, ImageSize};

/// Hard prompt ceiling imposed by the image backend. Longer prompts are
/// truncated, not rejected.
pub const MAX_PROMPT_CHARS: usize = 4000;
const MIN_PROMPT_CHARS: usize = 10;
const ENHANCEMENT_MAX_TOKENS: u32 = 200;

const ENHANCEMENT_SYSTEM_PROMPT: &str = "You are an expert at writing prompts for AI image \
     generation. Create detailed, artistic prompts that will produce high-quality images.";

const PROBLEMATIC_KEYWORDS: [&str; 9] = [
    "violence", "weapon", "blood", "death", "kill", "nude", "naked", "sexual", "explicit",
];

/// Result of a generation attempt. Failure messages are user-facing and
/// specific to the failure class.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub success: bool,
    pub url: Option<String>,
    pub error: Option<String>,
    pub revised_prompt: Option<String>,
}

impl GenerationOutcome {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(error.into()),
            revised_prompt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptValidation {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariationOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub urls: Vec<String>,
}

pub struct GenerationService<I, C>
where
    I: ImageGenerationClient,
    C: ChatClient,
{
    image_client: Arc<I>,
    chat_client: Arc<C>,
}

impl<I, C> GenerationService<I, C>
where
    I: ImageGenerationClient,
    C: ChatClient,
{
    pub fn new(image_client: Arc<I>, chat_client: Arc<C>) -> Self {
        Self {
            image_client,
            chat_client,
        }
    }

    /// Generates one image for the prompt. Empty prompts are rejected before
    /// any remote call; over-length prompts are truncated to exactly
    /// [`MAX_PROMPT_CHARS`] characters.
    pub async fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return GenerationOutcome::failure("Prompt cannot be empty");
        }

        let submitted: String = if prompt.chars().count() > MAX_PROMPT_CHARS {
            tracing::warn!(
                chars = prompt.chars().count(),
                "Prompt truncated to {} characters",
                MAX_PROMPT_CHARS
            );
            prompt.chars().take(MAX_PROMPT_CHARS).collect()
        } else {
            prompt.to_string()
        };

        match self.image_client.generate(&submitted, size, quality).await {
            Ok(image) => {
                tracing::info!(size = size.as_str(), "Image generated successfully");
                GenerationOutcome {
                    success: true,
                    url: Some(image.url),
                    error: None,
                    revised_prompt: image.revised_prompt,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Image generation failed");
                GenerationOutcome::failure(user_facing_error(&e))
            }
        }
    }

    /// Rewrites a prompt for better generation results via the chat backend.
    /// Falls back to the original prompt on any failure.
    pub async fn enhance_prompt(&self, prompt: &str) -> String {
        let request = ChatRequest {
            system: ENHANCEMENT_SYSTEM_PROMPT.to_string(),
            user_text: format!(
                "Enhance this image prompt to be more detailed and artistic while keeping \
                 the core meaning:\n\"{}\"\n\nAdd artistic style, lighting, composition \
                 details but keep it under 200 words. Make it suitable for AI image \
                 generation.",
                prompt
            ),
            image_data_uri: None,
            max_tokens: ENHANCEMENT_MAX_TOKENS,
            json_response: false,
        };

        match self.chat_client.complete(request).await {
            Ok(enhanced) if !enhanced.trim().is_empty() => enhanced.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Enhancement returned empty content, using original prompt");
                prompt.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prompt enhancement failed, using original prompt");
                prompt.to_string()
            }
        }
    }

    /// Local prompt heuristics. Makes no remote call.
    pub fn validate_prompt(&self, prompt: &str) -> PromptValidation {
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let chars = prompt.chars().count();
        if chars < MIN_PROMPT_CHARS {
            issues.push("Prompt is too short".to_string());
            recommendations.push("Add more descriptive details".to_string());
        }
        if chars > MAX_PROMPT_CHARS {
            issues.push("Prompt is too long".to_string());
            recommendations.push(format!(
                "Reduce prompt length to under {} characters",
                MAX_PROMPT_CHARS
            ));
        }

        let lowered = prompt.to_lowercase();
        let found: Vec<&str> = PROBLEMATIC_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| lowered.contains(kw))
            .collect();

        if !found.is_empty() {
            issues.push(format!(
                "Potentially problematic content: {}",
                found.join(", ")
            ));
            recommendations
                .push("Consider rephrasing to avoid content policy violations".to_string());
        }

        PromptValidation {
            is_valid: issues.is_empty(),
            issues,
            recommendations,
        }
    }

    /// The current image backend cannot produce variations of an existing
    /// image; this always reports a structured failure.
    pub fn generate_variations(&self, _source_url: &str, count: u32) -> VariationOutcome {
        tracing::info!(count, "Image variations requested but unsupported");
        VariationOutcome {
            success: false,
            error: Some("Image variations not supported with current model".to_string()),
            urls: Vec::new(),
        }
    }
}

fn user_facing_error(error: &ImageGenerationError) -> String {
    match error {
        ImageGenerationError::ContentPolicyViolation => {
            "Content violates the provider's usage policy. Please try a different prompt."
                .to_string()
        }
        ImageGenerationError::QuotaExceeded => {
            "API quota exceeded or billing issue. Please check your account.".to_string()
        }
        ImageGenerationError::RateLimited => {
            "Rate limit exceeded. Please wait a moment and try again.".to_string()
        }
        ImageGenerationError::ApiRequestFailed(message) => {
            format!("Image generation failed: {}", message)
        }
    }
}
