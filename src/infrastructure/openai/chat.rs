use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{ChatClient, ChatClientError, ChatRequest};

use super::config::OpenAiConfig;

pub struct OpenAiChatClient {
    client: reqwest::Client,
    config: OpenAiConfig,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Self {
        Self {
            client: config.build_client(),
            config,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut user_content = vec![serde_json::json!({
            "type": "text",
            "text": request.user_text,
        })];
        if let Some(data_uri) = &request.image_data_uri {
            user_content.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": data_uri },
            }));
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": user_content },
            ],
            "max_tokens": request.max_tokens,
        });
        if request.json_response {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        tracing::debug!(
            model = %self.model,
            with_image = request.image_data_uri.is_some(),
            json_response = request.json_response,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatClientError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChatClientError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ChatClientError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
