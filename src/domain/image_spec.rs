use serde::{Deserialize, Serialize};

/// Output dimensions supported by the image generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    Square256,
    #[serde(rename = "512x512")]
    Square512,
    #[serde(rename = "1024x1024")]
    Square1024,
}

impl ImageSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "256x256" => Some(Self::Square256),
            "512x512" => Some(Self::Square512),
            "1024x1024" => Some(Self::Square1024),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
        }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::Square1024
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    Hd,
}

impl ImageQuality {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "hd" => Some(Self::Hd),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hd => "hd",
        }
    }
}

impl Default for ImageQuality {
    fn default() -> Self {
        Self::Standard
    }
}
