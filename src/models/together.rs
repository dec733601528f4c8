use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct TogetherImageRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub steps: u32,
    pub n: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TogetherImageResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Option<TogetherImageData>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TogetherImageData {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl TogetherImageData {
    pub fn inline(b64: impl Into<String>) -> Self {
        Self {
            b64_json: Some(b64.into()),
            ..Default::default()
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Inline base64 payload, ignoring empty strings.
    pub fn inline_data(&self) -> Option<&str> {
        self.b64_json.as_deref().filter(|data| !data.is_empty())
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}
