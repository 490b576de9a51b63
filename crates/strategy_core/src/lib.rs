//! strategy_core - Core types and transforms for affiliate content generation
//!
//! This crate provides the compliance pipeline that sits between the generative
//! backend and the rendered output:
//! - `types` - briefs, feedback examples, and the strict output shapes
//! - `guardrail` - ordered rewrite rules that strip risky phrasing from free text
//! - `price` - forbidden price-token extraction and coarse price-context labels
//! - `coerce` - loose-JSON to strict-output coercion with safe defaults
//! - `feedback` - rated-feedback aggregation into prompt context and directives

pub mod coerce;
pub mod feedback;
pub mod guardrail;
pub mod price;
pub mod types;

// Re-export commonly used types
pub use coerce::{coerce_live_follow_up, coerce_live_selling, coerce_strategy};
pub use feedback::{build_feedback_context, build_feedback_directives};
pub use guardrail::{sanitize, sanitize_hashtag, NoteSink};
pub use price::{build_price_context, extract_forbidden_price_tokens};
pub use types::{
    AutomationBrief, AutomationProfile, FeedbackExample, LiveFaq, LiveFollowUpOutput,
    LiveSellingBrief, LiveSellingOutput, Positioning, ProductBrief, ProductProfile,
    ScriptPostPackage, StrategyOutput, VideoScript,
};
