mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AudioSettings, LoggingSettings, OpenAiSettings, ServerSettings, Settings, SettingsError,
};
