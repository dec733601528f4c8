use crate::{
    error::{RelayError, Result},
    together::ContentFetcher,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Downloads fallback images when the provider answers with a URL.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::InternalError(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| RelayError::FetchFailed(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::FetchFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
