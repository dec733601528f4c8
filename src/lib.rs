pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
pub mod server;
pub mod together;

pub use config::{Config, Environment, TogetherConfig};
pub use error::{RelayError, Result};
pub use handler::ImageHandler;
pub use models::{ImageRequest, ImageResponse};
pub use together::{ContentFetcher, HttpFetcher, ImageGenerator, TogetherClient};
