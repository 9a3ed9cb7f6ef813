mod scoped_audio_file;

pub use scoped_audio_file::ScopedAudioFile;
