use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AudioCaptureError, AudioRecorder};

/// Stand-in recorder for environments that must never touch an input
/// device. Always unavailable.
pub struct DisabledAudioRecorder;

#[async_trait]
impl AudioRecorder for DisabledAudioRecorder {
    fn is_available(&self) -> bool {
        false
    }

    async fn record(&self, _duration: Duration) -> Result<Vec<u8>, AudioCaptureError> {
        Err(AudioCaptureError::DeviceUnavailable)
    }
}
