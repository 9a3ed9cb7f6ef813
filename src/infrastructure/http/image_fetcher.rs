use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{FetchedImage, ImageFetchError, ImageFetcher};

const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Downloads generated images from the URLs the generation backend hands
/// out. The backend owns the images only briefly, so this happens right
/// after generation.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageFetchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageFetchError::BadStatus(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageFetchError::RequestFailed(format!("body: {}", e)))?;

        tracing::debug!(bytes = bytes.len(), content_type = %content_type, "Image downloaded");

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
