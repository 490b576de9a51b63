//! Google Gemini HTTP client.
//!
//! One non-streaming `generateContent` POST per generation call. No retries
//! and no timeout: every failure is terminal for that call and surfaced to
//! the caller, who may let the user retry manually.

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{GenerateError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const TEMPERATURE: f64 = 0.7;

/// Gemini API client. Cheap to clone per call site; holds one reqwest client.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client with an API key. The key may be empty; it is
    /// validated per call so brief validation can run first.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn require_api_key(&self) -> Result<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        Ok(key)
    }

    /// Issue exactly one generateContent request and return the parsed
    /// top-level JSON object from the model's text payload.
    pub(crate) async fn execute_prompt(&self, prompt: &str) -> Result<Value> {
        let key = self.require_api_key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "responseMimeType": "application/json",
            },
        });

        log::debug!("Gemini request to model {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Gemini API request failed with status {}.", status.as_u16())
                });
            return Err(GenerateError::Api(message));
        }

        let text = extract_text(&payload)?;
        parse_json_object(&text)
    }
}

/// Pull the text payload out of a successful response envelope.
fn extract_text(payload: &Value) -> Result<String> {
    if let Some(message) = payload.pointer("/error/message").and_then(Value::as_str) {
        return Err(GenerateError::Api(message.to_string()));
    }

    if let Some(reason) = payload
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(GenerateError::Blocked(reason.to_string()));
    }

    let text = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    Ok(text)
}

/// Parse the model text as a JSON object, tolerating surrounding non-JSON by
/// extracting the substring between the first `{` and the last `}`.
fn parse_json_object(raw: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        if value.is_object() {
            return Ok(value);
        }
    }

    let first = raw.find('{');
    let last = raw.rfind('}');
    if let (Some(first), Some(last)) = (first, last) {
        if last > first {
            if let Ok(value) = serde_json::from_str::<Value>(&raw[first..=last]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    Err(GenerateError::MalformedJson)
}
