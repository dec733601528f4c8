use crate::{
    config::TogetherConfig,
    error::{RelayError, Result},
    models::{ImageRequest, TogetherImageRequest, TogetherImageResponse},
    together::ImageGenerator,
};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct TogetherClient {
    client: Client,
    base_url: String,
}

impl TogetherClient {
    pub fn new(config: &TogetherConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.generation_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RelayError::InternalError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

#[async_trait]
impl ImageGenerator for TogetherClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &ImageRequest,
    ) -> Result<TogetherImageResponse> {
        let payload = TogetherImageRequest {
            prompt: &request.prompt,
            model: &request.model,
            steps: request.steps,
            n: request.n,
        };

        log::debug!("POST {} model={}", self.endpoint(), request.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::InternalError(format!("Together request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RelayError::InternalError(format!(
                "Together API returned {}: {}",
                status, error_text
            )));
        }

        response.json::<TogetherImageResponse>().await.map_err(|e| {
            RelayError::InternalError(format!("Invalid response from Together API: {}", e))
        })
    }
}
