use chrono::{DateTime, Utc};

use super::verdicts::ImageVerdict;

/// A generated image together with the prompt that produced it and the
/// moderation verdict assigned before it entered the gallery.
///
/// Records are immutable once created and are appended in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImageRecord {
    pub image_bytes: Vec<u8>,
    pub content_type: String,
    pub prompt: String,
    pub source_url: String,
    pub revised_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub moderation: ImageVerdict,
}

impl GeneratedImageRecord {
    pub fn new(
        image_bytes: Vec<u8>,
        content_type: String,
        prompt: String,
        source_url: String,
        revised_prompt: Option<String>,
        moderation: ImageVerdict,
    ) -> Self {
        Self {
            image_bytes,
            content_type,
            prompt,
            source_url,
            revised_prompt,
            created_at: Utc::now(),
            moderation,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.image_bytes.len()
    }
}
