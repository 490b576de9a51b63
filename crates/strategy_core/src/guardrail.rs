//! Compliance guardrail engine.
//!
//! An ordered set of find-and-replace rules partitioned into three families:
//! affiliate-voice phrasing, absolute/medical claims, and exact-price phrasing.
//! Rules are data, not conditionals, so ordering stays auditable. A rule fires
//! (and contributes its note) only when it actually changed the text.
//!
//! Voice rules run before claim rules so a sentence like "we guarantee the best
//! results" is first de-owned, then de-superlatived.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::price::token_pattern;

/// Replacement phrase for any recognizable exact-price span.
pub const PRICE_PHRASE: &str = "check the latest price in the shop basket";

pub const VOICE_NOTE: &str = "Rewrote seller-style wording into affiliate-safe phrasing.";
pub const SUPERLATIVE_NOTE: &str = "Softened absolute and superlative claims.";
pub const MEDICAL_NOTE: &str = "Removed medical or miracle-cure language.";
pub const INSTANT_NOTE: &str = "Removed instant-result promises.";
pub const TRANSFORM_NOTE: &str = "Removed before-and-after transformation claims.";
pub const COMPOSITION_NOTE: &str = "Softened absolute composition claims.";
pub const PRICE_NOTE: &str = "Replaced exact prices with a check-the-shop reminder.";
pub const TOKEN_NOTE: &str =
    "Removed your listed price; viewers are directed to the shop for current pricing.";
pub const HASHTAG_NOTE: &str = "Dropped hashtags that hinted at claims or prices.";

/// Ordered accumulator for compliance notes. Duplicates collapse; insertion
/// order is first-seen. Threaded explicitly through every sanitize call so the
/// engine stays pure over its inputs.
#[derive(Debug, Default)]
pub struct NoteSink {
    seen: HashSet<String>,
    notes: Vec<String>,
}

impl NoteSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a note, collapsing duplicates case-insensitively.
    pub fn push(&mut self, note: &str) {
        let key = note.trim().to_lowercase();
        if key.is_empty() || self.seen.contains(&key) {
            return;
        }
        self.seen.insert(key);
        self.notes.push(note.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }
}

/// A single rewrite rule: pattern, fixed replacement, and the note recorded
/// when the rule changes the text.
struct GuardrailRule {
    pattern: Regex,
    replacement: &'static str,
    note: &'static str,
}

impl GuardrailRule {
    fn new(pattern: &str, replacement: &'static str, note: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid guardrail pattern"),
            replacement,
            note,
        }
    }
}

/// First-person seller/ownership phrasing rewritten into affiliate-safe voice.
static AFFILIATE_VOICE_RULES: Lazy<Vec<GuardrailRule>> = Lazy::new(|| {
    vec![
        GuardrailRule::new(r"(?i)\bwe\s+sell\b", "this shop sells", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bwe\s+guarantee\b", "buyers often find", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bour\s+products?\b", "this product", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bour\s+customers?\b", "buyers", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bour\s+(?:shop|store)\b", "the shop", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bbinebenta\s+namin\b", "binebenta ng shop", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bang\s+produkto\s+namin\b", "ang produktong ito", VOICE_NOTE),
        GuardrailRule::new(r"(?i)\bmga\s+customers?\s+namin\b", "mga buyer", VOICE_NOTE),
    ]
});

/// Absolute, superlative, medical, instant-result, transformation, and
/// composition claims mapped to neutral replacements.
static CLAIM_RULES: Lazy<Vec<GuardrailRule>> = Lazy::new(|| {
    vec![
        GuardrailRule::new(
            r"(?i)(?:\bno\.\s*1\b|#\s*1\b|\bnumber\s+one\b)",
            "well-loved",
            SUPERLATIVE_NOTE,
        ),
        GuardrailRule::new(r"(?i)\bthe\s+best\b", "a standout", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bbest\b", "standout", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bthe\s+(?:first|only)\b", "one of the few", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bperfect\b", "well-suited", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bguaranteed?s?\b", "expected", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bwalang\s+talo\b", "solid", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bpinaka[a-z]+\b", "kilalang", SUPERLATIVE_NOTE),
        GuardrailRule::new(r"(?i)\bmiracle\b", "impressive", MEDICAL_NOTE),
        GuardrailRule::new(r"(?i)\bcure[sd]?\b", "may help with", MEDICAL_NOTE),
        GuardrailRule::new(r"(?i)\bheals?\b", "soothes", MEDICAL_NOTE),
        GuardrailRule::new(r"(?i)\btreats?\b", "supports", MEDICAL_NOTE),
        GuardrailRule::new(r"(?i)\bgamot\s+sa\b", "pang-alaga sa", MEDICAL_NOTE),
        GuardrailRule::new(r"(?i)\binstant(?:ly)?\b", "over time", INSTANT_NOTE),
        GuardrailRule::new(r"(?i)\bovernight\b", "gradually", INSTANT_NOTE),
        GuardrailRule::new(
            r"(?i)\bin\s+just\s+\d+\s*(?:minutes?|hours?|days?|weeks?|araw|oras)\b",
            "with consistent use",
            INSTANT_NOTE,
        ),
        GuardrailRule::new(
            r"(?i)\bresults?\s+in\s+\d+\s*(?:minutes?|hours?|days?|weeks?|araw|oras)\b",
            "results that vary per user",
            INSTANT_NOTE,
        ),
        GuardrailRule::new(
            r"(?i)\bbefore\s+(?:and|&|/)\s*after\b",
            "progress over time",
            TRANSFORM_NOTE,
        ),
        GuardrailRule::new(r"(?i)\btransformations?\b", "improvement", TRANSFORM_NOTE),
        GuardrailRule::new(
            r"(?i)\b100%\s*(?:natural|organic|pure|safe|effective)\b",
            "naturally formulated",
            COMPOSITION_NOTE,
        ),
        GuardrailRule::new(r"(?i)\bchemical[\s-]*free\b", "gentle-formula", COMPOSITION_NOTE),
        GuardrailRule::new(r"(?i)\btoxin[\s-]*free\b", "gentle-formula", COMPOSITION_NOTE),
    ]
});

/// Recognizable currency-amount spans, tolerant of comma/space/decimal variants
/// and a trailing `+`.
static PRICE_RULES: Lazy<Vec<GuardrailRule>> = Lazy::new(|| {
    vec![
        GuardrailRule::new(r"(?i)[₱$]\s*\d[\d,\.]*(?: \d{3})*\+?", PRICE_PHRASE, PRICE_NOTE),
        GuardrailRule::new(r"(?i)\bphp\s*\d[\d,\.]*(?: \d{3})*\+?", PRICE_PHRASE, PRICE_NOTE),
        GuardrailRule::new(r"(?i)\bp\s*\d[\d,\.]*\+?", PRICE_PHRASE, PRICE_NOTE),
        GuardrailRule::new(
            r"(?i)\b(?:only|just|under|around|srp|starting\s+at|priced?\s*(?:at|:)?|for\s+only)\s+\d[\d,\.]*\+?",
            PRICE_PHRASE,
            PRICE_NOTE,
        ),
        GuardrailRule::new(r"(?i)\b\d[\d,\.]*\s*lang\b", PRICE_PHRASE, PRICE_NOTE),
    ]
});

/// Residual catch-all for any currency-marked amount the family rules missed.
static RESIDUAL_CURRENCY: Lazy<Regex> =
    Lazy::new(|| {
        Regex::new(r"(?i)(?:[₱$]|\bphp\b)\s*\d[\d,\.]*(?: \d{3})*").expect("invalid pattern")
    });

/// Runs of spaces and tabs; newlines are preserved for scripts.
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("invalid pattern"));

fn apply_rules(text: String, rules: &[GuardrailRule], notes: &mut NoteSink) -> String {
    let mut current = text;
    for rule in rules {
        let replaced = rule.pattern.replace_all(&current, rule.replacement);
        if replaced != current {
            notes.push(rule.note);
            current = replaced.into_owned();
        }
    }
    current
}

fn collapse_spaces(text: &str) -> String {
    SPACE_RUNS
        .replace_all(text, " ")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Rewrite one free-text field into compliant form, recording a note for every
/// rule that fired. `forbidden_tokens` are the digits derived from the user's
/// own price input; they are scrubbed even when phrased in a shape the generic
/// price patterns miss.
pub fn sanitize(text: &str, notes: &mut NoteSink, forbidden_tokens: &[String]) -> String {
    let mut current = text.to_string();

    current = apply_rules(current, &AFFILIATE_VOICE_RULES, notes);
    current = apply_rules(current, &CLAIM_RULES, notes);
    current = apply_rules(current, &PRICE_RULES, notes);

    let residual = RESIDUAL_CURRENCY.replace_all(&current, PRICE_PHRASE);
    if residual != current {
        notes.push(PRICE_NOTE);
        current = residual.into_owned();
    }

    for token in forbidden_tokens {
        let pattern = token_pattern(token);
        let scrubbed = pattern.replace_all(&current, PRICE_PHRASE);
        if scrubbed != current {
            notes.push(TOKEN_NOTE);
            current = scrubbed.into_owned();
        }
    }

    collapse_spaces(&current)
}

/// Keywords that make a hashtag unsalvageable rather than rewritable.
static RISKY_HASHTAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(best|no\.?\s*1|number\s*one|top\s*1|pinaka|perfect|miracle|cure|instant|overnight|guaranteed?|legit\s*seller|\d{3,}|[₱$]|php\s*\d)",
    )
    .expect("invalid pattern")
});

/// Sanitize one hashtag. Risky tags (claim keywords, price-like digits, or any
/// forbidden token) are dropped entirely, not rewritten. Survivors come back
/// with exactly one leading `#`.
pub fn sanitize_hashtag(
    tag: &str,
    notes: &mut NoteSink,
    forbidden_tokens: &[String],
) -> Option<String> {
    let stripped = tag.trim().trim_start_matches('#').trim();
    if stripped.is_empty() {
        return None;
    }

    if RISKY_HASHTAG.is_match(stripped) {
        notes.push(HASHTAG_NOTE);
        return None;
    }

    for token in forbidden_tokens {
        if token_pattern(token).is_match(stripped) {
            notes.push(HASHTAG_NOTE);
            return None;
        }
    }

    let compact: String = stripped.split_whitespace().collect::<Vec<_>>().join("");
    if compact.is_empty() {
        return None;
    }

    Some(format!("#{}", compact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::extract_forbidden_price_tokens;

    fn sanitize_plain(text: &str) -> (String, Vec<String>) {
        let mut notes = NoteSink::new();
        let out = sanitize(text, &mut notes, &[]);
        (out, notes.into_notes())
    }

    #[test]
    fn test_affiliate_voice_rewritten_before_claims() {
        let (out, notes) = sanitize_plain("We sell the best brush. Our customers love it.");
        let lower = out.to_lowercase();
        assert!(!lower.contains("we sell"));
        assert!(!lower.contains("our customers"));
        assert!(!lower.contains("best"));
        assert!(notes.contains(&VOICE_NOTE.to_string()));
        assert!(notes.contains(&SUPERLATIVE_NOTE.to_string()));
    }

    #[test]
    fn test_medical_claims_removed() {
        let (out, notes) = sanitize_plain("This miracle serum cures acne overnight.");
        let lower = out.to_lowercase();
        assert!(!lower.contains("miracle"));
        assert!(!lower.contains("cures"));
        assert!(!lower.contains("overnight"));
        assert!(notes.contains(&MEDICAL_NOTE.to_string()));
        assert!(notes.contains(&INSTANT_NOTE.to_string()));
    }

    #[test]
    fn test_composition_claims_softened() {
        let (out, notes) = sanitize_plain("100% natural and chemical-free formula");
        let lower = out.to_lowercase();
        assert!(!lower.contains("100% natural"));
        assert!(!lower.contains("chemical-free"));
        assert!(notes.contains(&COMPOSITION_NOTE.to_string()));
    }

    #[test]
    fn test_price_variants_replaced() {
        for text in [
            "Grab it for ₱1,299.00 today",
            "PHP 499 promo",
            "P299 lang",
            "only 499 this week",
            "under 1,000 pesos",
            "499 lang talaga",
        ] {
            let (out, notes) = sanitize_plain(text);
            assert!(
                !out.chars().any(|c| c.is_ascii_digit()),
                "digits survived in {:?} -> {:?}",
                text,
                out
            );
            assert!(out.contains(PRICE_PHRASE));
            assert!(notes.contains(&PRICE_NOTE.to_string()), "no note for {:?}", text);
        }
    }

    #[test]
    fn test_rule_without_effect_does_not_fire() {
        let (out, notes) = sanitize_plain("A gentle everyday brush for busy moms.");
        assert_eq!(out, "A gentle everyday brush for busy moms.");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_forbidden_token_scrubbed_without_generic_pattern() {
        let tokens = extract_forbidden_price_tokens("₱1,299");
        let mut notes = NoteSink::new();
        let out = sanitize("Makukuha mo ito sa 1299 pesos", &mut notes, &tokens);
        assert!(!out.contains("1299"));
        assert!(notes.notes().contains(&TOKEN_NOTE.to_string()));
    }

    #[test]
    fn test_forbidden_token_spares_longer_digit_runs() {
        let tokens = extract_forbidden_price_tokens("₱299");
        let mut notes = NoteSink::new();
        let out = sanitize("2990 units sold this month", &mut notes, &tokens);
        assert_eq!(out, "2990 units sold this month");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "We sell the #1 best straightener, results in just 299!",
            "Our product is a miracle, 100% natural, only ₱499 lang!",
            "Perfect before and after transformation, guaranteed overnight.",
        ];
        let tokens = extract_forbidden_price_tokens("₱299");
        for sample in samples {
            let mut first = NoteSink::new();
            let once = sanitize(sample, &mut first, &tokens);
            let mut second = NoteSink::new();
            let twice = sanitize(&once, &mut second, &tokens);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
            assert!(second.is_empty(), "second pass fired notes for {:?}", sample);
        }
    }

    #[test]
    fn test_whitespace_collapsed_but_newlines_kept() {
        let (out, _) = sanitize_plain("line one   with   gaps\nline    two  ");
        assert_eq!(out, "line one with gaps\nline two");
    }

    #[test]
    fn test_note_set_collapses_duplicates() {
        let mut notes = NoteSink::new();
        sanitize("the best brush, the best deal, the best price", &mut notes, &[]);
        let count = notes
            .notes()
            .iter()
            .filter(|n| n.as_str() == SUPERLATIVE_NOTE)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_hashtag_dropped_for_claims_and_price() {
        let mut notes = NoteSink::new();
        assert!(sanitize_hashtag("#1 best deal P299", &mut notes, &[]).is_none());
        assert!(sanitize_hashtag("#bestfinds", &mut notes, &[]).is_none());
        assert!(sanitize_hashtag("#sale499", &mut notes, &[]).is_none());
        assert!(notes.notes().contains(&HASHTAG_NOTE.to_string()));
    }

    #[test]
    fn test_hashtag_survivor_reprefixed() {
        let mut notes = NoteSink::new();
        let tag = sanitize_hashtag("  ## tik tok finds ", &mut notes, &[]).unwrap();
        assert_eq!(tag, "#tiktokfinds");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_hashtag_dropped_for_forbidden_token() {
        let tokens = extract_forbidden_price_tokens("P85");
        let mut notes = NoteSink::new();
        assert!(sanitize_hashtag("#just85", &mut notes, &tokens).is_none());
    }
}
