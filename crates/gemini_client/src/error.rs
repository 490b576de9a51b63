//! Generation error taxonomy.
//!
//! Every error is terminal for its call; the caller decides whether the user
//! retries manually. Coercion never raises for malformed field values, so the
//! variants here cover only the pre-network checks and the call itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// No API key supplied. Checked after brief validation, before any network call.
    #[error("Gemini API key is required. Put it in the field or in .env.")]
    MissingApiKey,

    /// A required brief field is missing; the message names the field and mode.
    #[error("{0}")]
    MissingField(String),

    /// The backend refused the prompt with a safety block reason.
    #[error("Gemini blocked this request: {0}")]
    Blocked(String),

    /// Non-2xx response; carries the backend's own message when present.
    #[error("{0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned an empty response.")]
    EmptyResponse,

    /// Text extracted but not parseable as JSON, even after brace extraction.
    /// No second, more lenient parse is attempted.
    #[error("Model response was not valid JSON.")]
    MalformedJson,
}

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Heuristic over a surfaced error message for quota/credit exhaustion, so the
/// caller can show a "top up or switch keys" message instead of raw API text.
pub fn is_quota_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["quota", "resource exhausted", "429", "billing", "insufficient", "credit"]
        .iter()
        .any(|needle| lower.contains(needle))
}
