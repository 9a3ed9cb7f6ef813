use std::io::{self, Write as _};
use std::path::Path;

use tempfile::NamedTempFile;

/// Audio bytes staged in a named temporary file for the duration of one
/// transcription call. The file is removed when the value drops, on every
/// exit path.
pub struct ScopedAudioFile {
    file: NamedTempFile,
}

impl ScopedAudioFile {
    pub fn persist(audio_bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("skagen-audio-")
            .suffix(".wav")
            .tempfile()?;
        file.write_all(audio_bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            bytes = audio_bytes.len(),
            "Audio staged in temporary file"
        );

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_back(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.file.path())
    }
}
