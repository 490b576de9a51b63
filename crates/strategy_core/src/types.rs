//! Data model for briefs, feedback, and generation outputs.
//!
//! Wire names are camelCase to match the backend JSON shape and the stored lists.

use serde::{Deserialize, Serialize};

/// User-authored brief for guided generation. Read-only input to the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
    pub product_name: String,
    pub niche: String,
    pub product_description: String,
    pub features: String,
    pub price: String,
    pub target_audience: String,
    pub goal: String,
    pub offer_details: String,
    pub objections: String,
}

/// Minimal brief for automation mode; the backend infers the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationBrief {
    pub product_name: String,
    pub product_info: String,
    pub product_details: String,
    pub price: String,
    pub brand_tone: String,
}

/// Brief for live-selling plan generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSellingBrief {
    pub product_name: String,
    pub product_info: String,
}

/// A saved guided brief with storage identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductProfile {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub brief: ProductBrief,
}

/// A saved automation brief with storage identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationProfile {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub brief: AutomationBrief,
}

/// One rated feedback entry on a previous generation. Producer-validated;
/// the core only reads lists of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackExample {
    pub id: String,
    pub created_at: String,
    /// Integer 1-5.
    pub rating: i32,
    pub what_worked: String,
    pub what_to_improve: String,
    pub product_name: String,
    pub output_snapshot: String,
}

/// A short video script. A script with no body is dropped during coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoScript {
    pub title: String,
    pub duration_sec: f64,
    pub script: String,
}

/// Posting kit derived from (or supplied alongside) one video script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPostPackage {
    pub script_title: String,
    pub post_title: String,
    pub post_description: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Positioning {
    pub audience: String,
    pub pain_point: String,
    pub offer_angle: String,
}

/// Full guided/automation result. Every string-bearing field has passed
/// through the guardrail engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOutput {
    pub strategy_summary: String,
    pub compliance_notes: Vec<String>,
    pub positioning: Positioning,
    pub assumptions: Vec<String>,
    pub hooks: Vec<String>,
    pub video_scripts: Vec<VideoScript>,
    pub script_post_packages: Vec<ScriptPostPackage>,
    pub cta_options: Vec<String>,
    pub captions: Vec<String>,
    pub hashtag_sets: Vec<Vec<String>>,
    pub posting_plan_14_days: Vec<String>,
    pub live_plan: Vec<String>,
    pub ab_tests: Vec<String>,
    pub kpi_focus: Vec<String>,
    pub next_actions_24h: Vec<String>,
}

impl StrategyOutput {
    /// Find the post package to display next to a script: case-insensitive
    /// trimmed title match first, positional index fallback.
    pub fn package_for_script(&self, script_title: &str, index: usize) -> Option<&ScriptPostPackage> {
        let normalized = script_title.trim().to_lowercase();
        self.script_post_packages
            .iter()
            .find(|item| item.script_title.trim().to_lowercase() == normalized)
            .or_else(|| self.script_post_packages.get(index))
    }
}

/// One FAQ entry for a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFaq {
    pub question: String,
    pub answer: String,
}

/// Live-selling playbook. `live_title` is always >= 15 chars and `about_me`
/// >= 30 chars; every line group is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSellingOutput {
    pub live_title: String,
    pub about_me: String,
    pub opening_lines: Vec<String>,
    pub product_pitch_lines: Vec<String>,
    pub low_viewer_repeat_lines: Vec<String>,
    pub high_viewer_repeat_lines: Vec<String>,
    pub engagement_prompts: Vec<String>,
    pub closing_lines: Vec<String>,
    pub faqs: Vec<LiveFaq>,
    pub random_question_framework: Vec<String>,
    pub compliance_notes: Vec<String>,
}

/// A single compliant Q/A exchange for an ad-hoc live viewer question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFollowUpOutput {
    pub question: String,
    pub answer: String,
    pub fallback_if_unsure: String,
    pub compliance_notes: Vec<String>,
}
