//! gemini_client - Gemini-backed generation operations
//!
//! Wraps the single outbound call per generation mode:
//! - `client` - the Gemini HTTP client and response-envelope handling
//! - `prompts` - mode-specific prompt templates (data)
//! - `generate` - the four generation operations with brief validation
//! - `error` - the terminal error taxonomy and quota classifier

pub mod client;
pub mod error;
pub mod generate;
pub mod prompts;

// Re-export commonly used types
pub use client::GeminiClient;
pub use error::{is_quota_error, GenerateError, Result};
