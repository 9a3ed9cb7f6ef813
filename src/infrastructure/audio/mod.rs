mod cpal_recorder;
mod disabled_recorder;

pub use cpal_recorder::CpalAudioRecorder;
pub use disabled_recorder::DisabledAudioRecorder;
