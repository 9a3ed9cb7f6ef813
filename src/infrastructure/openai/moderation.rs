use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{
    ModerationEndpoint, ModerationEndpointError, ScreeningCategories, TextScreening,
};

use super::config::OpenAiConfig;

pub struct OpenAiModerationEndpoint {
    client: reqwest::Client,
    config: OpenAiConfig,
    model: String,
}

impl OpenAiModerationEndpoint {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Self {
        Self {
            client: config.build_client(),
            config,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModerationEndpoint for OpenAiModerationEndpoint {
    async fn screen_text(&self, text: &str) -> Result<TextScreening, ModerationEndpointError> {
        let url = format!("{}/moderations", self.config.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModerationEndpointError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModerationEndpointError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: ModerationsResponse = response
            .json()
            .await
            .map_err(|e| ModerationEndpointError::InvalidResponse(e.to_string()))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| {
                ModerationEndpointError::InvalidResponse("empty results array".to_string())
            })?;

        let scores = [
            result.category_scores.sexual,
            result.category_scores.violence,
            result.category_scores.hate,
            result.category_scores.harassment,
            result.category_scores.self_harm,
        ];
        let max_score = scores.into_iter().fold(0.0_f32, f32::max);

        Ok(TextScreening {
            flagged: result.flagged,
            categories: ScreeningCategories {
                sexual: result.categories.sexual,
                violence: result.categories.violence,
                hate: result.categories.hate,
                harassment: result.categories.harassment,
                self_harm: result.categories.self_harm,
            },
            max_score,
        })
    }
}

#[derive(Deserialize)]
struct ModerationsResponse {
    results: Vec<ModerationResult>,
}

#[derive(Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: RawCategories,
    #[serde(default)]
    category_scores: RawCategoryScores,
}

#[derive(Deserialize, Default)]
struct RawCategories {
    #[serde(default)]
    sexual: bool,
    #[serde(default)]
    violence: bool,
    #[serde(default)]
    hate: bool,
    #[serde(default)]
    harassment: bool,
    #[serde(default, rename = "self-harm")]
    self_harm: bool,
}

#[derive(Deserialize, Default)]
struct RawCategoryScores {
    #[serde(default)]
    sexual: f32,
    #[serde(default)]
    violence: f32,
    #[serde(default)]
    hate: f32,
    #[serde(default)]
    harassment: f32,
    #[serde(default, rename = "self-harm")]
    self_harm: f32,
}
