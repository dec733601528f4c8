use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_PROMPT_CHARS: usize = 1000;
pub const DEFAULT_STEPS: i64 = 10;
pub const MIN_STEPS: i64 = 1;
pub const MAX_STEPS: i64 = 50;
pub const DEFAULT_IMAGES: i64 = 1;
pub const MIN_IMAGES: i64 = 1;
pub const MAX_IMAGES: i64 = 10;

/// A request that has passed validation. `steps` and `n` are already clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    pub steps: u32,
    pub n: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image: String, // Base64 encoded
}

impl ImageRequest {
    /// Single validation pass over a loosely typed JSON payload.
    pub fn from_payload(payload: &Value, default_model: &str) -> Result<Self> {
        let fields = payload
            .as_object()
            .ok_or_else(|| RelayError::InvalidRequest("Request must be JSON".into()))?;

        let prompt = extract_prompt(fields)?;
        let model = extract_model(fields, default_model)?;
        let steps = extract_integer(fields, "steps", DEFAULT_STEPS)?.clamp(MIN_STEPS, MAX_STEPS);
        let n = extract_integer(fields, "n", DEFAULT_IMAGES)?.clamp(MIN_IMAGES, MAX_IMAGES);

        Ok(ImageRequest {
            prompt,
            model,
            steps: steps as u32,
            n: n as u32,
        })
    }
}

fn extract_prompt(fields: &Map<String, Value>) -> Result<String> {
    let prompt = match fields.get("prompt") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            return Err(RelayError::InvalidRequest(
                "Prompt must be a string".into(),
            ))
        }
    };

    if prompt.is_empty() {
        return Err(RelayError::InvalidRequest("Prompt is required".into()));
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(RelayError::InvalidRequest("Prompt is too long".into()));
    }

    Ok(prompt.to_string())
}

fn extract_model(fields: &Map<String, Value>, default_model: &str) -> Result<String> {
    match fields.get("model") {
        None | Some(Value::Null) => Ok(default_model.to_string()),
        Some(Value::String(model)) => Ok(model.clone()),
        Some(other) => Err(RelayError::InvalidParameterFormat(format!(
            "model must be a string, got {}",
            other
        ))),
    }
}

fn extract_integer(fields: &Map<String, Value>, name: &str, default: i64) -> Result<i64> {
    let Some(value) = fields.get(name) else {
        return Ok(default);
    };

    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_integer(s),
        _ => None,
    };

    parsed.ok_or_else(|| {
        RelayError::InvalidParameterFormat(format!(
            "invalid literal for {}: {}",
            name, value
        ))
    })
}

/// Parses an optionally signed run of ASCII digits, ignoring surrounding
/// whitespace. Values beyond the `i64` range saturate.
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) if negative => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}
