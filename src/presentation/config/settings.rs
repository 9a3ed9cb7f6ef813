use std::env;
use std::time::Duration;

use super::environment::Environment;

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub audio: AudioSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub transcription_model: String,
    pub chat_model: String,
    pub moderation_model: String,
    pub image_model: String,
    pub request_timeout: Duration,
    pub image_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub record_seconds: u64,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub json_format: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    MissingVariable(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Settings {
    /// Reads every setting from the process environment. The API key is the
    /// single hard precondition: without it nothing can run.
    pub fn from_env() -> Result<Self, SettingsError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SettingsError::MissingVariable("OPENAI_API_KEY"))?;

        let environment = env::var("APP_ENV")
            .ok()
            .map(Environment::try_from)
            .transpose()
            .map_err(|e| SettingsError::InvalidValue {
                name: "APP_ENV",
                value: e,
            })?
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerSettings {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 3000)?,
            },
            openai: OpenAiSettings {
                api_key,
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                transcription_model: env::var("OPENAI_TRANSCRIPTION_MODEL")
                    .unwrap_or_else(|_| "whisper-1".to_string()),
                chat_model: env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                moderation_model: env::var("OPENAI_MODERATION_MODEL")
                    .unwrap_or_else(|_| "omni-moderation-latest".to_string()),
                image_model: env::var("OPENAI_IMAGE_MODEL")
                    .unwrap_or_else(|_| "dall-e-3".to_string()),
                request_timeout: Duration::from_secs(parse_var("OPENAI_TIMEOUT_SECS", 60)?),
                image_timeout: Duration::from_secs(parse_var("OPENAI_IMAGE_TIMEOUT_SECS", 120)?),
            },
            audio: AudioSettings {
                sample_rate: parse_var("AUDIO_SAMPLE_RATE", 44_100)?,
                record_seconds: parse_var("AUDIO_RECORD_SECONDS", 5)?,
                max_upload_bytes: parse_var::<usize>("AUDIO_MAX_UPLOAD_MB", 25)? * 1024 * 1024,
            },
            logging: LoggingSettings {
                json_format: env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, SettingsError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| SettingsError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
