use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{GeneratedImage, ImageGenerationClient, ImageGenerationError};
use crate::domain::{ImageQuality, ImageSize};

use super::config::OpenAiConfig;

pub struct OpenAiImageClient {
    client: reqwest::Client,
    config: OpenAiConfig,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Self {
        Self {
            client: config.build_client(),
            config,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageGenerationClient for OpenAiImageClient {
    async fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<GeneratedImage, ImageGenerationError> {
        let url = format!("{}/images/generations", self.config.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": size.as_str(),
            "quality": quality.as_str(),
            "n": 1,
        });

        tracing::debug!(
            model = %self.model,
            size = size.as_str(),
            quality = quality.as_str(),
            "Sending image generation request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGenerationError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ImageGenerationError::ApiRequestFailed(format!("parse: {}", e)))?;

        let first = parsed.data.into_iter().next().ok_or_else(|| {
            ImageGenerationError::ApiRequestFailed("response contained no images".to_string())
        })?;

        let url = first.url.ok_or_else(|| {
            ImageGenerationError::ApiRequestFailed("response contained no image url".to_string())
        })?;

        Ok(GeneratedImage {
            url,
            revised_prompt: first.revised_prompt,
        })
    }
}

/// Maps a non-2xx response body onto the failure classes callers present to
/// users. The backend encodes the class in the error message text.
fn classify_api_error(status: u16, body: &str) -> ImageGenerationError {
    let lowered = body.to_lowercase();

    if lowered.contains("content_policy_violation") {
        ImageGenerationError::ContentPolicyViolation
    } else if lowered.contains("billing") || lowered.contains("quota") {
        ImageGenerationError::QuotaExceeded
    } else if lowered.contains("rate_limit") {
        ImageGenerationError::RateLimited
    } else {
        ImageGenerationError::ApiRequestFailed(format!("status {}: {}", status, body))
    }
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}
