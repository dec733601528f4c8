use crate::{
    config::TogetherConfig,
    error::{RelayError, Result},
    models::{ImageRequest, ImageResponse},
    together::{ContentFetcher, HttpFetcher, ImageGenerator, TogetherClient},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use uuid::Uuid;

/// Validates a payload, calls the provider and turns the first generated
/// image into base64. Holds no per-request state.
#[derive(Clone)]
pub struct ImageHandler {
    config: TogetherConfig,
    generator: Arc<dyn ImageGenerator>,
    fetcher: Arc<dyn ContentFetcher>,
}

impl ImageHandler {
    pub fn new(
        config: TogetherConfig,
        generator: Arc<dyn ImageGenerator>,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        Self {
            config,
            generator,
            fetcher,
        }
    }

    /// Handler backed by the real Together API and an HTTP fetcher.
    pub fn from_config(config: TogetherConfig) -> Result<Self> {
        let generator = Arc::new(TogetherClient::new(&config)?);
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        Ok(Self::new(config, generator, fetcher))
    }

    /// Runs one request to completion. Panics inside the pipeline are
    /// reported as `InternalError`.
    pub async fn handle(&self, payload: Option<Value>) -> Result<ImageResponse> {
        let request_id = Uuid::new_v4();

        let outcome = AssertUnwindSafe(self.process(request_id, payload))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let summary = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected failure".to_string());
                Err(RelayError::InternalError(summary))
            });

        match &outcome {
            Ok(response) => log::info!(
                "[req:{}] image ready ({} base64 chars)",
                request_id,
                response.image.len()
            ),
            Err(err) if err.is_client_error() => {
                log::warn!("[req:{}] rejected: {}", request_id, err)
            }
            Err(err) => log::error!("[req:{}] failed: {}", request_id, err),
        }

        outcome
    }

    async fn process(&self, request_id: Uuid, payload: Option<Value>) -> Result<ImageResponse> {
        log::debug!(
            "[req:{}] received payload: {}",
            request_id,
            payload
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "<none>".to_string())
        );

        let payload =
            payload.ok_or_else(|| RelayError::InvalidRequest("Request must be JSON".into()))?;
        let request = ImageRequest::from_payload(&payload, &self.config.default_model)?;

        let api_key = self.config.credential().ok_or_else(|| {
            RelayError::ServerMisconfiguration("Missing API key".into())
        })?;

        log::info!(
            "[req:{}] calling Together API with prompt: {:?}, model: {}, steps: {}, n: {}",
            request_id,
            request.prompt,
            request.model,
            request.steps,
            request.n
        );

        let response = self.generator.generate(api_key, &request).await?;
        log::debug!(
            "[req:{}] provider returned {} result(s)",
            request_id,
            response.data.len()
        );

        let first = response
            .data
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| RelayError::GenerationFailed("Empty response from API".into()))?;

        if let Some(data) = first.inline_data() {
            return Ok(ImageResponse {
                image: data.to_string(),
            });
        }

        let url = first.remote_url().ok_or_else(|| {
            RelayError::GenerationFailed("Neither inline data nor url provided".into())
        })?;

        log::info!("[req:{}] fetching image from {}", request_id, url);
        let bytes = self.fetcher.fetch(url).await?;

        Ok(ImageResponse {
            image: STANDARD.encode(bytes),
        })
    }
}
