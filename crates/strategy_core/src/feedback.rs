//! Rated-feedback aggregation into prompt context and directives.
//!
//! Both artifacts feed the hard-constraint section of the outbound prompt, so
//! ordering and dedup must stay deterministic: context ranks by rating then
//! recency, directives rank by recency alone.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::types::FeedbackExample;

const NO_EXAMPLES_CONTEXT: &str = "No previous feedback examples yet.";

const MAX_CONTEXT_EXAMPLES: usize = 8;
const MAX_DIRECTIVE_EXAMPLES: usize = 12;
const MAX_LATEST_DIRECTIVES: usize = 4;
const MAX_PREFERRED_STYLE: usize = 6;
const MAX_IMPROVE_STYLE: usize = 8;

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("invalid pattern"));
static REPEATED_PERIODS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{2,}").expect("invalid pattern"));

fn or_na(text: &str) -> &str {
    if text.trim().is_empty() {
        "n/a"
    } else {
        text
    }
}

/// Ranked context summary: rating descending, recency descending on ties,
/// top 8 rendered as fixed multi-line blocks separated by blank lines.
pub fn build_feedback_context(examples: &[FeedbackExample]) -> String {
    if examples.is_empty() {
        return NO_EXAMPLES_CONTEXT.to_string();
    }

    let mut ranked: Vec<&FeedbackExample> = examples.iter().collect();
    ranked.sort_by(|a, b| {
        b.rating
            .cmp(&a.rating)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    ranked
        .iter()
        .take(MAX_CONTEXT_EXAMPLES)
        .enumerate()
        .map(|(index, item)| {
            [
                format!("Example {}:", index + 1),
                format!("- Rating: {}/5", item.rating),
                format!("- Product: {}", item.product_name),
                format!("- Worked: {}", or_na(&item.what_worked)),
                format!("- Improve: {}", or_na(&item.what_to_improve)),
                format!("- Snapshot: {}", or_na(&item.output_snapshot)),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collapse whitespace runs and repeated periods, then trim.
fn normalize_directive(text: &str) -> String {
    let collapsed = WHITESPACE_RUNS.replace_all(text, " ");
    REPEATED_PERIODS.replace_all(&collapsed, ".").trim().to_string()
}

/// De-duplicate case-insensitively on the normalized text, keeping first-seen
/// order and dropping empties.
fn unique_non_empty<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut output = Vec::new();
    for raw in lines {
        let normalized = normalize_directive(raw);
        if normalized.is_empty() {
            continue;
        }
        let key = normalized.to_lowercase();
        if seen.insert(key) {
            output.push(normalized);
        }
    }
    output
}

/// Deduplicated, prioritized directive list rendered as a labeled block that
/// ends with an explicit tie-break instruction.
pub fn build_feedback_directives(examples: &[FeedbackExample]) -> String {
    if examples.is_empty() {
        return [
            "User preference directives:",
            "- Keep outputs simple, direct, and conversion-focused.",
            "- Use clean CTA and practical Taglish phrasing.",
        ]
        .join("\n");
    }

    let mut recent: Vec<&FeedbackExample> = examples.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent: Vec<&FeedbackExample> = recent.into_iter().take(MAX_DIRECTIVE_EXAMPLES).collect();

    let latest = recent[0];
    let latest_must_apply: Vec<String> =
        unique_non_empty([latest.what_worked.as_str(), latest.what_to_improve.as_str()])
            .into_iter()
            .take(MAX_LATEST_DIRECTIVES)
            .collect();

    let preferred_style: Vec<String> =
        unique_non_empty(recent.iter().map(|item| item.what_worked.as_str()))
            .into_iter()
            .take(MAX_PREFERRED_STYLE)
            .collect();

    let improve_style: Vec<String> =
        unique_non_empty(recent.iter().map(|item| item.what_to_improve.as_str()))
            .into_iter()
            .take(MAX_IMPROVE_STYLE)
            .collect();

    let mut lines = vec!["User preference directives (hard requirements):".to_string()];

    if !latest_must_apply.is_empty() {
        lines.push("Latest feedback to apply now (highest priority):".to_string());
        lines.extend(latest_must_apply.iter().map(|item| format!("- {}", item)));
    }

    if !preferred_style.is_empty() {
        lines.push("Preferred style:".to_string());
        lines.extend(preferred_style.iter().map(|item| format!("- {}", item)));
    }

    if !improve_style.is_empty() {
        lines.push("Must improve / avoid:".to_string());
        lines.extend(improve_style.iter().map(|item| format!("- {}", item)));
    }

    if preferred_style.is_empty() && improve_style.is_empty() {
        lines.push("- Keep outputs simple, direct, and conversion-focused.".to_string());
        lines.push("- Use clean CTA and practical Taglish phrasing.".to_string());
    }

    lines.push(
        "If there is conflict, prioritize 'Latest feedback to apply now' first, then 'Must improve / avoid'."
            .to_string(),
    );
    lines.join("\n")
}
