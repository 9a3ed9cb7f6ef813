use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use skagen::application::ports::{
    AudioCaptureError, AudioRecorder, ChatClient, ChatClientError, ChatRequest, FetchedImage,
    GeneratedImage, ImageFetchError, ImageFetcher, ImageGenerationClient, ImageGenerationError,
    ModerationEndpoint, ModerationEndpointError, ScreeningCategories, TextScreening,
    TranscriptionEngine, TranscriptionError,
};
use skagen::application::services::{
    GenerationService, ModerationService, SessionStore, StudioService, TranscriptionService,
};
use skagen::presentation::config::{
    AudioSettings, Environment, LoggingSettings, OpenAiSettings, ServerSettings, Settings,
};
use skagen::presentation::{AppState, create_router};

pub const SAFE_IMAGE_ANALYSIS: &str = r#"{
    "is_adult_content": false,
    "is_violent": false,
    "is_inappropriate": false,
    "content_rating": "general",
    "description": "",
    "confidence": 0.9
}"#;

pub const ADULT_IMAGE_ANALYSIS: &str = r#"{
    "is_adult_content": true,
    "is_violent": false,
    "is_inappropriate": false,
    "content_rating": "adult",
    "description": "mature themes",
    "confidence": 0.95
}"#;

/// One-pixel PNG so the moderation preprocessing has a real bitmap to chew
/// on.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::new(1, 1);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encode");
    bytes
}

pub struct StubTranscriptionEngine {
    pub transcript: String,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub received: Mutex<Option<Vec<u8>>>,
}

impl StubTranscriptionEngine {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
            received: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            received: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for StubTranscriptionEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.received.lock().await = Some(audio_data.to_vec());
        if self.fail {
            return Err(TranscriptionError::ApiRequestFailed(
                "transcription backend down".to_string(),
            ));
        }
        Ok(self.transcript.clone())
    }
}

pub struct StubModerationEndpoint {
    pub screening: TextScreening,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubModerationEndpoint {
    pub fn not_flagged() -> Self {
        Self {
            screening: TextScreening::default(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn flagged(categories: ScreeningCategories, max_score: f32) -> Self {
        Self {
            screening: TextScreening {
                flagged: true,
                categories,
                max_score,
            },
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            screening: TextScreening::default(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl ModerationEndpoint for StubModerationEndpoint {
    async fn screen_text(&self, _text: &str) -> Result<TextScreening, ModerationEndpointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModerationEndpointError::ApiRequestFailed(
                "moderation endpoint down".to_string(),
            ));
        }
        Ok(self.screening)
    }
}

pub struct StubChatClient {
    pub response: String,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<ChatRequest>>,
}

impl StubChatClient {
    pub fn returning(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl ChatClient for StubChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(request);
        if self.fail {
            return Err(ChatClientError::ApiRequestFailed(
                "chat backend down".to_string(),
            ));
        }
        Ok(self.response.clone())
    }
}

pub struct StubImageClient {
    pub error: Option<fn() -> ImageGenerationError>,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl StubImageClient {
    pub fn succeeding() -> Self {
        Self {
            error: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing_with(error: fn() -> ImageGenerationError) -> Self {
        Self {
            error: Some(error),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl ImageGenerationClient for StubImageClient {
    async fn generate(
        &self,
        prompt: &str,
        _size: skagen::domain::ImageSize,
        _quality: skagen::domain::ImageQuality,
    ) -> Result<GeneratedImage, ImageGenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(GeneratedImage {
            url: "https://images.example/generated.png".to_string(),
            revised_prompt: Some("a revised prompt".to_string()),
        })
    }
}

pub struct StubImageFetcher {
    pub fail: bool,
}

#[async_trait::async_trait]
impl ImageFetcher for StubImageFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedImage, ImageFetchError> {
        if self.fail {
            return Err(ImageFetchError::BadStatus(404));
        }
        Ok(FetchedImage {
            bytes: tiny_png(),
            content_type: "image/png".to_string(),
        })
    }
}

pub struct StubRecorder {
    pub available: bool,
    pub wav: Vec<u8>,
}

#[async_trait::async_trait]
impl AudioRecorder for StubRecorder {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn record(&self, _duration: Duration) -> Result<Vec<u8>, AudioCaptureError> {
        if !self.available {
            return Err(AudioCaptureError::DeviceUnavailable);
        }
        Ok(self.wav.clone())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        environment: Environment::Test,
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        openai: OpenAiSettings {
            api_key: "test-key".to_string(),
            base_url: "http://localhost:0".to_string(),
            transcription_model: "whisper-1".to_string(),
            chat_model: "gpt-4o".to_string(),
            moderation_model: "omni-moderation-latest".to_string(),
            image_model: "dall-e-3".to_string(),
            request_timeout: Duration::from_secs(5),
            image_timeout: Duration::from_secs(5),
        },
        audio: AudioSettings {
            sample_rate: 44_100,
            record_seconds: 5,
            max_upload_bytes: 25 * 1024 * 1024,
        },
        logging: LoggingSettings { json_format: false },
    }
}

pub type TestState =
    AppState<StubTranscriptionEngine, StubModerationEndpoint, StubChatClient, StubImageClient>;

pub struct TestHarness {
    pub router: axum::Router,
    pub transcription_engine: Arc<StubTranscriptionEngine>,
    pub moderation_endpoint: Arc<StubModerationEndpoint>,
    pub chat_client: Arc<StubChatClient>,
    pub image_client: Arc<StubImageClient>,
}

pub struct TestHarnessConfig {
    pub transcription_engine: StubTranscriptionEngine,
    pub moderation_endpoint: StubModerationEndpoint,
    pub chat_client: StubChatClient,
    pub image_client: StubImageClient,
    pub recorder: StubRecorder,
    pub fetcher: StubImageFetcher,
}

impl Default for TestHarnessConfig {
    fn default() -> Self {
        Self {
            transcription_engine: StubTranscriptionEngine::returning("a red balloon"),
            moderation_endpoint: StubModerationEndpoint::not_flagged(),
            chat_client: StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
            image_client: StubImageClient::succeeding(),
            recorder: StubRecorder {
                available: false,
                wav: Vec::new(),
            },
            fetcher: StubImageFetcher { fail: false },
        }
    }
}

pub fn build_harness(config: TestHarnessConfig) -> TestHarness {
    let transcription_engine = Arc::new(config.transcription_engine);
    let moderation_endpoint = Arc::new(config.moderation_endpoint);
    let chat_client = Arc::new(config.chat_client);
    let image_client = Arc::new(config.image_client);

    let transcription_service = Arc::new(TranscriptionService::new(
        Arc::clone(&transcription_engine),
        Arc::new(config.recorder) as Arc<dyn AudioRecorder>,
    ));
    let moderation_service = Arc::new(ModerationService::new(
        Arc::clone(&moderation_endpoint),
        Arc::clone(&chat_client),
    ));
    let generation_service = Arc::new(GenerationService::new(
        Arc::clone(&image_client),
        Arc::clone(&chat_client),
    ));
    let studio_service = Arc::new(StudioService::new(
        moderation_service,
        Arc::clone(&generation_service),
        Arc::new(config.fetcher) as Arc<dyn ImageFetcher>,
        SessionStore::new(),
    ));

    let state: TestState = AppState {
        transcription_service,
        generation_service,
        studio_service,
        settings: test_settings(),
    };

    TestHarness {
        router: create_router(state),
        transcription_engine,
        moderation_endpoint,
        chat_client,
        image_client,
    }
}
