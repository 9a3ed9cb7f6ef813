use async_trait::async_trait;

/// Raw result of the hosted text-moderation endpoint, before local policy
/// is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextScreening {
    pub flagged: bool,
    pub categories: ScreeningCategories,
    /// Highest score across the mapped categories.
    pub max_score: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreeningCategories {
    pub sexual: bool,
    pub violence: bool,
    pub hate: bool,
    pub harassment: bool,
    pub self_harm: bool,
}

#[async_trait]
pub trait ModerationEndpoint: Send + Sync {
    async fn screen_text(&self, text: &str) -> Result<TextScreening, ModerationEndpointError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationEndpointError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
