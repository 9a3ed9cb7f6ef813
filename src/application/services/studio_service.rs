use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{ChatClient, ImageFetcher, ImageGenerationClient, ModerationEndpoint};
use crate::application::services::{GenerationService, ModerationService};
use crate::domain::{GeneratedImageRecord, ImageQuality, ImageSize, Session};

/// Result of running the full prompt-to-gallery pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StudioOutcome {
    Created(GeneratedImageRecord),
    Blocked { reason: String },
    GenerationFailed { error: String },
    UnknownSession,
}

/// Owns every live session. Sessions are created explicitly, looked up by
/// id, and cleared by an explicit reset; nothing is shared between them.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, DateTime<Utc>) {
        let session = Session::new();
        let id = session.id;
        let created_at = session.created_at;
        self.inner.write().await.insert(id, session);
        tracing::info!(session_id = %id, "Session created");
        (id, created_at)
    }

    pub async fn exists(&self, id: Uuid) -> bool {
        self.inner.read().await.contains_key(&id)
    }

    /// Clears the session's audio, transcript, and gallery. Returns false
    /// for an unknown session.
    pub async fn reset(&self, id: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.clear();
                tracing::info!(session_id = %id, "Session cleared");
                true
            }
            None => false,
        }
    }

    pub async fn store_recording(&self, id: Uuid, audio: Vec<u8>) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.recorded_audio = Some(audio);
                true
            }
            None => false,
        }
    }

    pub async fn recorded_audio(&self, id: Uuid) -> Option<Vec<u8>> {
        self.inner
            .read()
            .await
            .get(&id)
            .and_then(|s| s.recorded_audio.clone())
    }

    pub async fn store_transcript(&self, id: Uuid, transcript: String) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.transcript = Some(transcript);
                true
            }
            None => false,
        }
    }

    pub async fn transcript(&self, id: Uuid) -> Option<String> {
        self.inner
            .read()
            .await
            .get(&id)
            .and_then(|s| s.transcript.clone())
    }

    async fn append_record(&self, id: Uuid, record: GeneratedImageRecord) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.gallery.push(record);
                true
            }
            None => false,
        }
    }

    /// Gallery records, newest first. Adult-rated records are omitted unless
    /// the caller opts in.
    pub async fn gallery(&self, id: Uuid, include_adult: bool) -> Option<Vec<GeneratedImageRecord>> {
        let sessions = self.inner.read().await;
        let session = sessions.get(&id)?;
        Some(
            session
                .gallery
                .iter()
                .rev()
                .filter(|record| include_adult || !record.moderation.is_adult_content)
                .cloned()
                .collect(),
        )
    }

    /// A single gallery record addressed newest-first, unfiltered.
    pub async fn gallery_record(&self, id: Uuid, index: usize) -> Option<GeneratedImageRecord> {
        let sessions = self.inner.read().await;
        let session = sessions.get(&id)?;
        session.gallery.iter().rev().nth(index).cloned()
    }

    pub async fn gallery_len(&self, id: Uuid) -> Option<usize> {
        self.inner.read().await.get(&id).map(|s| s.gallery.len())
    }
}

pub struct StudioService<M, C, I>
where
    M: ModerationEndpoint,
    C: ChatClient,
    I: ImageGenerationClient,
{
    moderation: Arc<ModerationService<M, C>>,
    generation: Arc<GenerationService<I, C>>,
    image_fetcher: Arc<dyn ImageFetcher>,
    sessions: SessionStore,
}

impl<M, C, I> StudioService<M, C, I>
where
    M: ModerationEndpoint,
    C: ChatClient,
    I: ImageGenerationClient,
{
    pub fn new(
        moderation: Arc<ModerationService<M, C>>,
        generation: Arc<GenerationService<I, C>>,
        image_fetcher: Arc<dyn ImageFetcher>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            moderation,
            generation,
            image_fetcher,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn moderation(&self) -> &ModerationService<M, C> {
        &self.moderation
    }

    /// Runs the full pipeline for one prompt: text moderation, generation,
    /// download, image moderation, gallery append. Generation is never
    /// invoked for a prompt that failed moderation.
    pub async fn create_image(
        &self,
        session_id: Uuid,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> StudioOutcome {
        if !self.sessions.exists(session_id).await {
            return StudioOutcome::UnknownSession;
        }

        let verdict = self.moderation.moderate_text(prompt).await;
        if !verdict.is_safe {
            tracing::info!(
                session_id = %session_id,
                reason = %verdict.reason,
                "Prompt blocked before generation"
            );
            return StudioOutcome::Blocked {
                reason: verdict.reason,
            };
        }

        let outcome = self.generation.generate(prompt, size, quality).await;
        let url = match (outcome.success, outcome.url) {
            (true, Some(url)) => url,
            _ => {
                return StudioOutcome::GenerationFailed {
                    error: outcome
                        .error
                        .unwrap_or_else(|| "Image generation failed".to_string()),
                };
            }
        };

        let fetched = match self.image_fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(error = %e, "Failed to download generated image");
                return StudioOutcome::GenerationFailed {
                    error: format!("Could not download generated image: {}", e),
                };
            }
        };

        let moderation = self.moderation.moderate_image(&fetched.bytes).await;

        let record = GeneratedImageRecord::new(
            fetched.bytes,
            fetched.content_type,
            prompt.to_string(),
            url,
            outcome.revised_prompt,
            moderation,
        );

        if !self.sessions.append_record(session_id, record.clone()).await {
            // Session was reset or dropped mid-pipeline.
            return StudioOutcome::UnknownSession;
        }

        tracing::info!(
            session_id = %session_id,
            rating = record.moderation.content_rating.as_str(),
            "Image added to gallery"
        );

        StudioOutcome::Created(record)
    }
}
