use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::generated_image::GeneratedImageRecord;

/// Per-user working state: the last captured audio, the last transcript, and
/// the gallery of generated images. Created explicitly, cleared by an
/// explicit reset, never shared across sessions.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recorded_audio: Option<Vec<u8>>,
    pub transcript: Option<String>,
    pub gallery: Vec<GeneratedImageRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            recorded_audio: None,
            transcript: None,
            gallery: Vec::new(),
        }
    }

    /// Drops the working audio, transcript, and every gallery record.
    pub fn clear(&mut self) {
        self.recorded_audio = None;
        self.transcript = None;
        self.gallery.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
