use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioRecorder, TranscriptionEngine};
use crate::infrastructure::storage::ScopedAudioFile;

/// Result of a transcription attempt. None of the variants is an error at
/// this boundary: failures are logged and reported as data so the caller can
/// give specific feedback without handling faults.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptOutcome {
    Transcript(String),
    NoSpeech,
    Failed { reason: String },
}

pub struct TranscriptionService<T>
where
    T: TranscriptionEngine,
{
    engine: Arc<T>,
    recorder: Arc<dyn AudioRecorder>,
}

impl<T> TranscriptionService<T>
where
    T: TranscriptionEngine,
{
    pub fn new(engine: Arc<T>, recorder: Arc<dyn AudioRecorder>) -> Self {
        Self { engine, recorder }
    }

    pub fn recorder_available(&self) -> bool {
        self.recorder.is_available()
    }

    /// Captures a fixed-duration clip from the input device. Device and
    /// encoding errors are logged and yield `None`.
    pub async fn record(&self, duration: Duration) -> Option<Vec<u8>> {
        if !self.recorder.is_available() {
            tracing::warn!("Recording requested but no input device is available");
            return None;
        }

        match self.recorder.record(duration).await {
            Ok(bytes) => {
                tracing::info!(bytes = bytes.len(), "Audio recording completed");
                Some(bytes)
            }
            Err(e) => {
                tracing::error!(error = %e, "Audio recording failed");
                None
            }
        }
    }

    /// Stages the audio bytes in a scoped temporary file, reads them back and
    /// hands them to the transcription backend. The temporary file is removed
    /// on every exit path.
    pub async fn transcribe(&self, audio_bytes: &[u8]) -> TranscriptOutcome {
        if audio_bytes.is_empty() {
            return TranscriptOutcome::Failed {
                reason: "audio payload is empty".to_string(),
            };
        }

        tracing::debug!(bytes = audio_bytes.len(), "Starting speech-to-text conversion");

        let staged = match ScopedAudioFile::persist(audio_bytes) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(error = %e, "Failed to stage audio for transcription");
                return TranscriptOutcome::Failed {
                    reason: format!("could not stage audio: {}", e),
                };
            }
        };

        let staged_bytes = match staged.read_back() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read staged audio");
                return TranscriptOutcome::Failed {
                    reason: format!("could not read staged audio: {}", e),
                };
            }
        };

        match self.engine.transcribe(&staged_bytes).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    tracing::info!("Transcription returned no speech");
                    TranscriptOutcome::NoSpeech
                } else {
                    tracing::info!(chars = trimmed.len(), "Speech-to-text completed");
                    TranscriptOutcome::Transcript(trimmed.to_string())
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Transcription failed");
                TranscriptOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
