use async_trait::async_trait;

/// A single chat completion request. Covers both plain text calls (prompt
/// enhancement) and vision calls carrying one base64 data-URI image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user_text: String,
    pub image_data_uri: Option<String>,
    pub max_tokens: u32,
    pub json_response: bool,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the completion content for the first choice.
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
