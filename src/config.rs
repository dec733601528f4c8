use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-dev";
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }
}

#[derive(Debug, Clone)]
pub struct TogetherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    /// Unset means the generation call waits as long as the provider takes.
    pub generation_timeout: Option<Duration>,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
    pub landing_page: String,
    pub environment: Environment,
    pub max_body_bytes: usize,
    pub together: TogetherConfig,
}

impl Default for TogetherConfig {
    fn default() -> Self {
        TogetherConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            generation_timeout: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl TogetherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("TOGETHER_API_KEY").filter(|key| !key.trim().is_empty());
        let base_url = lookup("TOGETHER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);
        let default_model = lookup("TOGETHER_DEFAULT_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(defaults.default_model);
        let generation_timeout = lookup("GENERATION_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let fetch_timeout = lookup("FETCH_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        TogetherConfig {
            api_key,
            base_url,
            default_model,
            generation_timeout,
            fetch_timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The credential, if one is configured and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: None,
            allowed_origins: vec!["*".to_string()],
            static_dir: PathBuf::from("static"),
            landing_page: "index.html".to_string(),
            environment: Environment::Production,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            together: TogetherConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("PORT").and_then(|port| port.trim().parse().ok());
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|origins| parse_origins(&origins))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        let landing_page = lookup("LANDING_PAGE")
            .filter(|page| !page.trim().is_empty())
            .unwrap_or(defaults.landing_page);
        let environment = lookup("APP_ENV")
            .map(|value| Environment::parse(&value))
            .unwrap_or(defaults.environment);
        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|bytes| *bytes > 0)
            .unwrap_or(defaults.max_body_bytes);

        Config {
            host,
            port,
            allowed_origins,
            static_dir,
            landing_page,
            environment,
            max_body_bytes,
            together: TogetherConfig::from_lookup(&lookup),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_landing_page(mut self, page: impl Into<String>) -> Self {
        self.landing_page = page.into();
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn with_together(mut self, config: TogetherConfig) -> Self {
        self.together = config;
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port())
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    pub fn landing_page_path(&self) -> PathBuf {
        self.static_dir.join(&self.landing_page)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
