//! Loose-JSON to strict-output coercion.
//!
//! The backend returns JSON that is supposed to match the shared output shape
//! but often drops, mistypes, or pads fields. Each field is extracted with one
//! of a small set of defaulting combinators so the coercers never fail on
//! field-level malformation; only a top-level non-object is fatal upstream.
//! Every extracted or derived string passes through the guardrail engine, with
//! one note sink shared across the whole output.

use serde_json::Value;

use crate::guardrail::{sanitize, sanitize_hashtag, NoteSink};
use crate::types::{
    LiveFaq, LiveFollowUpOutput, LiveSellingOutput, Positioning, ScriptPostPackage,
    StrategyOutput, VideoScript,
};

const DEFAULT_DURATION_SEC: f64 = 35.0;
const MIN_LIVE_TITLE_CHARS: usize = 15;
const MIN_ABOUT_ME_CHARS: usize = 30;

/// Minimum compliance-note count per output shape. Default boilerplate is
/// appended only up to the floor; organic notes above it are never truncated.
const STRATEGY_NOTE_FLOOR: usize = 3;
const LIVE_NOTE_FLOOR: usize = 4;

const STRATEGY_DEFAULT_NOTES: [&str; 4] = [
    "Avoided absolute claims like No.1, best, or guaranteed results.",
    "Used affiliate voice instead of owner or seller voice.",
    "No exact prices quoted; viewers are pointed to the shop for pricing.",
    "Kept benefit statements aligned with the product description.",
];

const LIVE_DEFAULT_NOTES: [&str; 4] = [
    "No exact prices quoted on stream; viewers are pointed to the basket.",
    "No medical or curative promises in any live line.",
    "Kept affiliate voice throughout the live script.",
    "FAQ answers avoid guarantees and absolute claims.",
];

const LIVE_TITLE_FALLBACK: &str = "Live sale today: trending finds and honest reviews";
const ABOUT_ME_FALLBACK: &str =
    "Your friendly affiliate host sharing honest product finds every live session.";

const FALLBACK_OPENING: [&str; 2] = [
    "Hello hello mga ka-live! Welcome sa stream natin ngayon.",
    "Drop your location sa comments habang nag-se-settle tayo!",
];
const FALLBACK_PITCH: [&str; 2] = [
    "Eto na yung product na pinaka-tinatanong niyo, quick demo tayo.",
    "I-tap lang ang basket para makita ang full details and current price.",
];
const FALLBACK_LOW_VIEWER: [&str; 2] = [
    "Sa mga bagong pasok, welcome! Quick recap tayo ng product.",
    "I-share ang live natin para makasali din ang mga friends niyo.",
];
const FALLBACK_HIGH_VIEWER: [&str; 2] = [
    "Ang dami na nating ka-live! Quick rundown ulit para sa mga bagong dating.",
    "Tap the basket now habang available pa ang stock.",
];
const FALLBACK_ENGAGEMENT: [&str; 2] = [
    "Comment ng 'MINE' kung interested ka dito!",
    "Anong gusto niyong makita next? Sabihin niyo sa comments.",
];
const FALLBACK_CLOSING: [&str; 2] = [
    "Salamat sa lahat ng sumali ngayong live natin!",
    "Follow na para ma-notify kayo sa next live session.",
];
const FALLBACK_FRAMEWORK: [&str; 3] = [
    "Acknowledge the question and thank the viewer by name.",
    "Answer only from the product page details, never from memory.",
    "If unsure, point them to the basket listing instead of guessing.",
];
const FALLBACK_FOLLOW_UP_ANSWER: &str =
    "Salamat sa tanong! Based sa product listing, best to check the basket for the exact details.";
const FALLBACK_IF_UNSURE: &str =
    "Good question! Let me check the product page in the basket so I only share accurate details.";

fn fallback_faqs() -> Vec<LiveFaq> {
    let pairs = [
        (
            "Paano mag-order?",
            "I-tap lang ang basket icon, piliin ang variant, tapos checkout na.",
        ),
        (
            "Magkano ito?",
            "Check the basket for the latest price, madalas may live-exclusive discount.",
        ),
        (
            "May warranty ba ito?",
            "Nasa product page sa basket ang official warranty details.",
        ),
        (
            "Legit ba ang seller?",
            "Orders go through the official in-app shop, so buyer protection applies.",
        ),
    ];
    pairs
        .iter()
        .map(|(q, a)| LiveFaq {
            question: (*q).to_string(),
            answer: (*a).to_string(),
        })
        .collect()
}

/// String field if present, else the named fallback literal.
fn string_or(raw: &Value, key: &str, fallback: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => fallback.to_string(),
    }
}

/// Non-empty trimmed strings from an array field; wrong-typed input yields an
/// empty sequence, never an error.
fn string_array(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_array_field(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key).map(string_array).unwrap_or_default()
}

/// Nested string arrays with empty inner groups dropped.
fn nested_string_array(raw: &Value, key: &str) -> Vec<Vec<String>> {
    match raw.get(key) {
        Some(Value::Array(groups)) => groups
            .iter()
            .map(string_array)
            .filter(|group| !group.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Finite number or the fixed default.
fn number_or(raw: &Value, key: &str, fallback: f64) -> f64 {
    match raw.get(key).and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

fn sanitize_all(items: Vec<String>, notes: &mut NoteSink, tokens: &[String]) -> Vec<String> {
    items
        .into_iter()
        .map(|item| sanitize(&item, notes, tokens))
        .filter(|item| !item.is_empty())
        .collect()
}

fn sanitize_hashtags(tags: Vec<String>, notes: &mut NoteSink, tokens: &[String]) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| sanitize_hashtag(&tag, notes, tokens))
        .collect()
}

/// Sanitized value when it meets the floor, else the fallback, padded with
/// filler when even the fallback is short. The guarantee is on length only.
fn ensure_min_chars(value: &str, min: usize, fallback: &str) -> String {
    if value.chars().count() >= min {
        return value.to_string();
    }
    let mut result = fallback.to_string();
    while result.chars().count() < min {
        result.push('.');
    }
    result
}

/// Seed the sink with backend-supplied compliance notes, whitespace-normalized.
fn seed_explicit_notes(raw: &Value, notes: &mut NoteSink) {
    for note in string_array_field(raw, "complianceNotes") {
        let normalized = note.split_whitespace().collect::<Vec<_>>().join(" ");
        notes.push(&normalized);
    }
}

/// Append default boilerplate notes only until the floor is met.
fn backfill_notes(notes: NoteSink, floor: usize, defaults: &[&str]) -> Vec<String> {
    let mut sink = notes;
    for default in defaults {
        if sink.len() >= floor {
            break;
        }
        sink.push(default);
    }
    sink.into_notes()
}

fn coerce_video_scripts(raw: &Value, notes: &mut NoteSink, tokens: &[String]) -> Vec<VideoScript> {
    let items = match raw.get("videoScripts") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => return Vec::new(),
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let title = string_or(item, "title", &format!("Script {}", index + 1));
            let script = string_or(item, "script", "");
            if script.trim().is_empty() {
                // A script with no body is not a script.
                return None;
            }
            Some(VideoScript {
                title: sanitize(title.trim(), notes, tokens),
                duration_sec: number_or(item, "durationSec", DEFAULT_DURATION_SEC),
                script: sanitize(script.trim(), notes, tokens),
            })
        })
        .collect()
}

/// Positional derivation of post packages from scripts, captions, and hashtag
/// sets. Out-of-range indexes fall back to the first element; kept for
/// compatibility with the existing pairing behavior even though the arrays are
/// independently sized.
fn derive_packages(
    scripts: &[VideoScript],
    captions: &[String],
    hashtag_sets: &[Vec<String>],
) -> Vec<ScriptPostPackage> {
    scripts
        .iter()
        .enumerate()
        .map(|(index, script)| ScriptPostPackage {
            script_title: script.title.clone(),
            post_title: script.title.clone(),
            post_description: captions
                .get(index)
                .or_else(|| captions.first())
                .cloned()
                .unwrap_or_else(|| {
                    format!(
                        "Try this {} angle for your next TikTok post.",
                        script.title.to_lowercase()
                    )
                }),
            hashtags: hashtag_sets
                .get(index)
                .or_else(|| hashtag_sets.first())
                .cloned()
                .unwrap_or_default(),
        })
        .collect()
}

fn coerce_script_post_packages(
    raw: &Value,
    scripts: &[VideoScript],
    captions: &[String],
    hashtag_sets: &[Vec<String>],
    notes: &mut NoteSink,
    tokens: &[String],
) -> Vec<ScriptPostPackage> {
    let items = match raw.get("scriptPostPackages") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => return derive_packages(scripts, captions, hashtag_sets),
    };

    let parsed: Vec<ScriptPostPackage> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let script_title = match string_or(item, "scriptTitle", "").trim() {
                "" => scripts
                    .get(index)
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| format!("Script {}", index + 1)),
                title => sanitize(title, notes, tokens),
            };
            let post_title = match string_or(item, "postTitle", "").trim() {
                "" => script_title.clone(),
                title => sanitize(title, notes, tokens),
            };
            if post_title.trim().is_empty() {
                return None;
            }

            let post_description = match string_or(item, "postDescription", "").trim() {
                "" => captions
                    .get(index)
                    .or_else(|| captions.first())
                    .cloned()
                    .unwrap_or_else(|| {
                        format!("For {}: show quick demo, proof, and CTA in Taglish.", script_title)
                    }),
                description => sanitize(description, notes, tokens),
            };

            let own_tags = item
                .get("hashtags")
                .map(string_array)
                .unwrap_or_default();
            let hashtags = if own_tags.is_empty() {
                hashtag_sets
                    .get(index)
                    .or_else(|| hashtag_sets.first())
                    .cloned()
                    .unwrap_or_default()
            } else {
                sanitize_hashtags(own_tags, notes, tokens)
            };

            Some(ScriptPostPackage {
                script_title,
                post_title,
                post_description,
                hashtags,
            })
        })
        .collect();

    if parsed.is_empty() {
        // Never an empty package list while scripts exist.
        derive_packages(scripts, captions, hashtag_sets)
    } else {
        parsed
    }
}

/// Coerce a parsed backend response into a strategy output. Missing or
/// malformed fields degrade to defaults; this never fails.
pub fn coerce_strategy(raw: &Value, forbidden_tokens: &[String]) -> StrategyOutput {
    let mut notes = NoteSink::new();
    seed_explicit_notes(raw, &mut notes);

    let positioning_raw = raw.get("positioning").cloned().unwrap_or(Value::Null);
    let positioning = Positioning {
        audience: sanitize(
            &string_or(&positioning_raw, "audience", "Not provided."),
            &mut notes,
            forbidden_tokens,
        ),
        pain_point: sanitize(
            &string_or(&positioning_raw, "painPoint", "Not provided."),
            &mut notes,
            forbidden_tokens,
        ),
        offer_angle: sanitize(
            &string_or(&positioning_raw, "offerAngle", "Not provided."),
            &mut notes,
            forbidden_tokens,
        ),
    };

    let captions = sanitize_all(string_array_field(raw, "captions"), &mut notes, forbidden_tokens);
    let hashtag_sets: Vec<Vec<String>> = nested_string_array(raw, "hashtagSets")
        .into_iter()
        .map(|group| sanitize_hashtags(group, &mut notes, forbidden_tokens))
        .filter(|group| !group.is_empty())
        .collect();
    let video_scripts = coerce_video_scripts(raw, &mut notes, forbidden_tokens);
    let script_post_packages = coerce_script_post_packages(
        raw,
        &video_scripts,
        &captions,
        &hashtag_sets,
        &mut notes,
        forbidden_tokens,
    );

    let strategy_summary = sanitize(
        &string_or(raw, "strategySummary", "No summary generated."),
        &mut notes,
        forbidden_tokens,
    );
    let assumptions = sanitize_all(string_array_field(raw, "assumptions"), &mut notes, forbidden_tokens);
    let hooks = sanitize_all(string_array_field(raw, "hooks"), &mut notes, forbidden_tokens);
    let cta_options = sanitize_all(string_array_field(raw, "ctaOptions"), &mut notes, forbidden_tokens);
    let posting_plan_14_days = sanitize_all(
        string_array_field(raw, "postingPlan14Days"),
        &mut notes,
        forbidden_tokens,
    );
    let live_plan = sanitize_all(string_array_field(raw, "livePlan"), &mut notes, forbidden_tokens);
    let ab_tests = sanitize_all(string_array_field(raw, "abTests"), &mut notes, forbidden_tokens);
    let kpi_focus = sanitize_all(string_array_field(raw, "kpiFocus"), &mut notes, forbidden_tokens);
    let next_actions_24h = sanitize_all(
        string_array_field(raw, "nextActions24h"),
        &mut notes,
        forbidden_tokens,
    );

    StrategyOutput {
        strategy_summary,
        compliance_notes: backfill_notes(notes, STRATEGY_NOTE_FLOOR, &STRATEGY_DEFAULT_NOTES),
        positioning,
        assumptions,
        hooks,
        video_scripts,
        script_post_packages,
        cta_options,
        captions,
        hashtag_sets,
        posting_plan_14_days,
        live_plan,
        ab_tests,
        kpi_focus,
        next_actions_24h,
    }
}

fn group_or_fallback(
    raw: &Value,
    key: &str,
    fallback: &[&str],
    notes: &mut NoteSink,
    tokens: &[String],
) -> Vec<String> {
    let lines = sanitize_all(string_array_field(raw, key), notes, tokens);
    if lines.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        lines
    }
}

fn coerce_faqs(raw: &Value, notes: &mut NoteSink, tokens: &[String]) -> Vec<LiveFaq> {
    let items = match raw.get("faqs") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => return fallback_faqs(),
    };

    let faqs: Vec<LiveFaq> = items
        .iter()
        .filter_map(|item| {
            let question = string_or(item, "question", "");
            let answer = string_or(item, "answer", "");
            if question.trim().is_empty() || answer.trim().is_empty() {
                return None;
            }
            Some(LiveFaq {
                question: sanitize(question.trim(), notes, tokens),
                answer: sanitize(answer.trim(), notes, tokens),
            })
        })
        .collect();

    if faqs.is_empty() {
        fallback_faqs()
    } else {
        faqs
    }
}

/// Coerce a parsed backend response into a live-selling playbook with
/// length-guaranteed title/about fields and non-empty line groups.
pub fn coerce_live_selling(raw: &Value, forbidden_tokens: &[String]) -> LiveSellingOutput {
    let mut notes = NoteSink::new();
    seed_explicit_notes(raw, &mut notes);

    let live_title = sanitize(&string_or(raw, "liveTitle", ""), &mut notes, forbidden_tokens);
    let about_me = sanitize(&string_or(raw, "aboutMe", ""), &mut notes, forbidden_tokens);

    let opening_lines =
        group_or_fallback(raw, "openingLines", &FALLBACK_OPENING, &mut notes, forbidden_tokens);
    let product_pitch_lines =
        group_or_fallback(raw, "productPitchLines", &FALLBACK_PITCH, &mut notes, forbidden_tokens);
    let low_viewer_repeat_lines = group_or_fallback(
        raw,
        "lowViewerRepeatLines",
        &FALLBACK_LOW_VIEWER,
        &mut notes,
        forbidden_tokens,
    );
    let high_viewer_repeat_lines = group_or_fallback(
        raw,
        "highViewerRepeatLines",
        &FALLBACK_HIGH_VIEWER,
        &mut notes,
        forbidden_tokens,
    );
    let engagement_prompts = group_or_fallback(
        raw,
        "engagementPrompts",
        &FALLBACK_ENGAGEMENT,
        &mut notes,
        forbidden_tokens,
    );
    let closing_lines =
        group_or_fallback(raw, "closingLines", &FALLBACK_CLOSING, &mut notes, forbidden_tokens);
    let faqs = coerce_faqs(raw, &mut notes, forbidden_tokens);
    let random_question_framework = group_or_fallback(
        raw,
        "randomQuestionFramework",
        &FALLBACK_FRAMEWORK,
        &mut notes,
        forbidden_tokens,
    );

    LiveSellingOutput {
        live_title: ensure_min_chars(&live_title, MIN_LIVE_TITLE_CHARS, LIVE_TITLE_FALLBACK),
        about_me: ensure_min_chars(&about_me, MIN_ABOUT_ME_CHARS, ABOUT_ME_FALLBACK),
        opening_lines,
        product_pitch_lines,
        low_viewer_repeat_lines,
        high_viewer_repeat_lines,
        engagement_prompts,
        closing_lines,
        faqs,
        random_question_framework,
        compliance_notes: backfill_notes(notes, LIVE_NOTE_FLOOR, &LIVE_DEFAULT_NOTES),
    }
}

/// Coerce a follow-up response for one ad-hoc viewer question.
pub fn coerce_live_follow_up(
    raw: &Value,
    asked_question: &str,
    forbidden_tokens: &[String],
) -> LiveFollowUpOutput {
    let mut notes = NoteSink::new();
    seed_explicit_notes(raw, &mut notes);

    let question = sanitize(
        &string_or(raw, "question", asked_question),
        &mut notes,
        forbidden_tokens,
    );
    let answer = sanitize(
        &string_or(raw, "answer", FALLBACK_FOLLOW_UP_ANSWER),
        &mut notes,
        forbidden_tokens,
    );
    let fallback_if_unsure = sanitize(
        &string_or(raw, "fallbackIfUnsure", FALLBACK_IF_UNSURE),
        &mut notes,
        forbidden_tokens,
    );

    LiveFollowUpOutput {
        question,
        answer,
        fallback_if_unsure,
        compliance_notes: backfill_notes(notes, STRATEGY_NOTE_FLOOR, &STRATEGY_DEFAULT_NOTES),
    }
}
