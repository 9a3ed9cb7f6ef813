use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Whether an input device was found at construction. Callers must check
    /// this before offering the recording path.
    fn is_available(&self) -> bool;

    /// Captures a fixed-duration clip and returns it as an encoded WAV
    /// container (16-bit PCM, mono).
    async fn record(&self, duration: Duration) -> Result<Vec<u8>, AudioCaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioCaptureError {
    #[error("no audio input device available")]
    DeviceUnavailable,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("wav encoding failed: {0}")]
    EncodingFailed(String),
}
