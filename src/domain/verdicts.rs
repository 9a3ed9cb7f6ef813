use serde::Serialize;

use super::content_rating::ContentRating;

/// Outcome of moderating a text prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextVerdict {
    pub is_safe: bool,
    pub reason: String,
    pub flagged_categories: Vec<String>,
    pub confidence: f32,
}

impl TextVerdict {
    pub fn approved() -> Self {
        Self {
            is_safe: true,
            reason: "Content approved".to_string(),
            flagged_categories: Vec::new(),
            confidence: 0.1,
        }
    }

    pub fn flagged(reason: String, categories: Vec<String>, confidence: f32) -> Self {
        Self {
            is_safe: false,
            reason,
            flagged_categories: categories,
            confidence,
        }
    }

    /// Fail-closed verdict used when the moderation procedure itself fails.
    pub fn moderation_error(error: impl std::fmt::Display) -> Self {
        Self {
            is_safe: false,
            reason: format!("Moderation error: {}", error),
            flagged_categories: vec!["error".to_string()],
            confidence: 1.0,
        }
    }
}

/// Outcome of moderating a generated image.
///
/// `requires_warning` is derived from the three flags at construction and is
/// the only field the gallery consults when deciding to badge a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageVerdict {
    pub is_adult_content: bool,
    pub is_violent: bool,
    pub is_inappropriate: bool,
    pub content_rating: ContentRating,
    pub description: String,
    pub confidence: f32,
    pub requires_warning: bool,
}

impl ImageVerdict {
    pub fn new(
        is_adult_content: bool,
        is_violent: bool,
        is_inappropriate: bool,
        content_rating: ContentRating,
        description: String,
        confidence: f32,
    ) -> Self {
        Self {
            is_adult_content,
            is_violent,
            is_inappropriate,
            content_rating,
            description,
            confidence,
            requires_warning: is_adult_content || is_violent || is_inappropriate,
        }
    }

    /// Default used when the analysis response cannot be parsed.
    pub fn analysis_failed() -> Self {
        Self::new(
            false,
            false,
            false,
            ContentRating::General,
            "Analysis failed".to_string(),
            0.5,
        )
    }

    /// Fail-closed default used when the analysis call itself fails.
    pub fn moderation_error(error: impl std::fmt::Display) -> Self {
        Self::new(
            true,
            false,
            true,
            ContentRating::Adult,
            format!("Moderation error: {}", error),
            1.0,
        )
    }
}
