use serde::{Deserialize, Serialize};

/// Age-appropriateness rating assigned to a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRating {
    General,
    Teen,
    Mature,
    Adult,
}

impl ContentRating {
    /// Parses a rating name, falling back to `General` for anything unknown.
    pub fn parse_or_general(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "teen" => Self::Teen,
            "mature" => Self::Mature,
            "adult" => Self::Adult,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Teen => "teen",
            Self::Mature => "mature",
            Self::Adult => "adult",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::General => "Suitable for all ages",
            Self::Teen => "Suitable for ages 13 and up",
            Self::Mature => "Suitable for ages 17 and up",
            Self::Adult => "Suitable for ages 18 and up only",
        }
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Mature | Self::Adult)
    }
}
