pub mod fetcher;
pub mod image_client;

use crate::{error::Result, models::ImageRequest, models::TogetherImageResponse};
use async_trait::async_trait;

pub use fetcher::HttpFetcher;
pub use image_client::TogetherClient;

/// Remote capability that turns a validated request into a result set.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, api_key: &str, request: &ImageRequest)
        -> Result<TogetherImageResponse>;
}

/// Remote capability that downloads the bytes behind a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
