use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use serde::Deserialize;

use crate::application::ports::{
    ChatClient, ChatClientError, ChatRequest, ModerationEndpoint, ModerationEndpointError,
    TextScreening,
};
use crate::domain::{ContentRating, ImageVerdict, TextVerdict};

const ADULT_KEYWORDS: [&str; 11] = [
    "nude",
    "naked",
    "sexual",
    "explicit",
    "adult",
    "pornographic",
    "erotic",
    "intimate",
    "seductive",
    "provocative",
    "sensual",
];

const VIOLENCE_KEYWORDS: [&str; 13] = [
    "violence",
    "violent",
    "weapon",
    "gun",
    "blood",
    "death",
    "kill",
    "murder",
    "fight",
    "battle",
    "war",
    "destruction",
    "harm",
];

const INAPPROPRIATE_KEYWORDS: [&str; 9] = [
    "hate",
    "racist",
    "discriminatory",
    "offensive",
    "inappropriate",
    "illegal",
    "drugs",
    "gambling",
    "extremist",
];

/// Keyword matches carry a fixed confidence, below the endpoint's own
/// flagging but well above the approval floor.
const KEYWORD_CONFIDENCE: f32 = 0.7;

/// Largest dimension sent to the vision backend.
const MAX_ANALYSIS_DIMENSION: u32 = 1024;
const ANALYSIS_JPEG_QUALITY: u8 = 85;
const ANALYSIS_MAX_TOKENS: u32 = 300;

const IMAGE_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a content moderator. Analyze this image and determine if it contains:
1. Adult/sexual content (nudity, sexual situations, etc.)
2. Violent content (weapons, blood, violence, etc.)
3. Inappropriate content for general audiences

Respond with JSON in this format:
{
    "is_adult_content": boolean,
    "is_violent": boolean,
    "is_inappropriate": boolean,
    "content_rating": "general" | "teen" | "mature" | "adult",
    "description": "brief description of concerning elements if any",
    "confidence": number between 0 and 1
}"#;

const IMAGE_ANALYSIS_USER_PROMPT: &str = "Please analyze this image for content moderation.";

pub struct ModerationService<M, C>
where
    M: ModerationEndpoint,
    C: ChatClient,
{
    moderation_endpoint: Arc<M>,
    chat_client: Arc<C>,
}

impl<M, C> ModerationService<M, C>
where
    M: ModerationEndpoint,
    C: ChatClient,
{
    pub fn new(moderation_endpoint: Arc<M>, chat_client: Arc<C>) -> Self {
        Self {
            moderation_endpoint,
            chat_client,
        }
    }

    /// Moderates a text prompt. Never fails: any error inside the procedure
    /// produces an unsafe verdict with confidence 1.0.
    pub async fn moderate_text(&self, text: &str) -> TextVerdict {
        match self.screen(text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!(error = %e, "Text moderation failed, blocking content");
                TextVerdict::moderation_error(e)
            }
        }
    }

    async fn screen(&self, text: &str) -> Result<TextVerdict, ModerationEndpointError> {
        let screening = self.moderation_endpoint.screen_text(text).await?;

        if screening.flagged {
            let categories = flagged_category_names(&screening);
            let reason = format!("Content flagged for: {}", categories.join(", "));
            tracing::info!(categories = ?categories, "Text flagged by moderation endpoint");
            return Ok(TextVerdict::flagged(reason, categories, screening.max_score));
        }

        let indicator_classes = keyword_indicator_classes(text);
        if !indicator_classes.is_empty() {
            let reason = format!("Detected: {}", indicator_classes.join(", "));
            tracing::info!(indicators = ?indicator_classes, "Text flagged by keyword screen");
            return Ok(TextVerdict::flagged(
                reason,
                indicator_classes,
                KEYWORD_CONFIDENCE,
            ));
        }

        tracing::debug!("Text content approved");
        Ok(TextVerdict::approved())
    }

    /// Moderates a generated image. Never fails: a transport or preprocessing
    /// error yields the most conservative verdict, while an unparseable
    /// analysis response yields the permissive "analysis failed" default.
    pub async fn moderate_image(&self, image_bytes: &[u8]) -> ImageVerdict {
        match self.analyze_image(image_bytes).await {
            Ok(verdict) => {
                tracing::info!(
                    rating = verdict.content_rating.as_str(),
                    requires_warning = verdict.requires_warning,
                    "Image moderation completed"
                );
                verdict
            }
            Err(e) => {
                tracing::error!(error = %e, "Image moderation failed, applying conservative verdict");
                ImageVerdict::moderation_error(e)
            }
        }
    }

    async fn analyze_image(&self, image_bytes: &[u8]) -> Result<ImageVerdict, ImageAnalysisError> {
        let data_uri = encode_for_analysis(image_bytes)?;

        let content = self
            .chat_client
            .complete(ChatRequest {
                system: IMAGE_ANALYSIS_SYSTEM_PROMPT.to_string(),
                user_text: IMAGE_ANALYSIS_USER_PROMPT.to_string(),
                image_data_uri: Some(data_uri),
                max_tokens: ANALYSIS_MAX_TOKENS,
                json_response: true,
            })
            .await
            .map_err(ImageAnalysisError::Chat)?;

        Ok(parse_analysis(&content))
    }

    pub fn rating_description(&self, rating: ContentRating) -> &'static str {
        rating.description()
    }

    pub fn should_show_warning(&self, verdict: &ImageVerdict) -> bool {
        verdict.requires_warning || verdict.content_rating.is_restricted()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageAnalysisError {
    #[error("image preprocessing failed: {0}")]
    Preprocess(String),
    #[error("analysis request failed: {0}")]
    Chat(ChatClientError),
}

fn flagged_category_names(screening: &TextScreening) -> Vec<String> {
    let mut names = Vec::new();
    if screening.categories.sexual {
        names.push("sexual content".to_string());
    }
    if screening.categories.violence {
        names.push("violent content".to_string());
    }
    if screening.categories.hate {
        names.push("hate speech".to_string());
    }
    if screening.categories.harassment {
        names.push("harassment".to_string());
    }
    if screening.categories.self_harm {
        names.push("self-harm content".to_string());
    }
    names
}

fn keyword_indicator_classes(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut classes = Vec::new();

    if ADULT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        classes.push("adult content indicators".to_string());
    }
    if VIOLENCE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        classes.push("violent content indicators".to_string());
    }
    if INAPPROPRIATE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        classes.push("inappropriate content indicators".to_string());
    }

    classes
}

/// Converts arbitrary image bytes into the base64 JPEG data URI the vision
/// backend expects: RGB, no side above 1024px, quality 85.
fn encode_for_analysis(image_bytes: &[u8]) -> Result<String, ImageAnalysisError> {
    let decoded = image::load_from_memory(image_bytes)
        .map_err(|e| ImageAnalysisError::Preprocess(format!("decode: {}", e)))?;

    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let (width, height) = (rgb.width(), rgb.height());
    let resized = if width > MAX_ANALYSIS_DIMENSION || height > MAX_ANALYSIS_DIMENSION {
        rgb.resize(
            MAX_ANALYSIS_DIMENSION,
            MAX_ANALYSIS_DIMENSION,
            FilterType::Lanczos3,
        )
    } else {
        rgb
    };

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let encoder = JpegEncoder::new_with_quality(
        &mut Cursor::new(&mut jpeg_bytes),
        ANALYSIS_JPEG_QUALITY,
    );
    resized
        .write_with_encoder(encoder)
        .map_err(|e| ImageAnalysisError::Preprocess(format!("jpeg encode: {}", e)))?;

    let b64 = general_purpose::STANDARD.encode(&jpeg_bytes);
    Ok(format!("data:image/jpeg;base64,{}", b64))
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    is_adult_content: bool,
    #[serde(default)]
    is_violent: bool,
    #[serde(default)]
    is_inappropriate: bool,
    #[serde(default)]
    content_rating: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f32,
}

fn default_confidence() -> f32 {
    0.5
}

fn parse_analysis(content: &str) -> ImageVerdict {
    match serde_json::from_str::<RawAnalysis>(content) {
        Ok(raw) => ImageVerdict::new(
            raw.is_adult_content,
            raw.is_violent,
            raw.is_inappropriate,
            raw.content_rating
                .as_deref()
                .map(ContentRating::parse_or_general)
                .unwrap_or(ContentRating::General),
            raw.description.unwrap_or_default(),
            raw.confidence,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Analysis response was not valid JSON, using fallback verdict");
            ImageVerdict::analysis_failed()
        }
    }
}
