//! Price-token extraction and the coarse price-context label.
//!
//! The user's own price input is the one number the backend is most likely to
//! echo back, so every numeric token derived from it becomes a forbidden token
//! that the guardrail scrubs in all its formatting variants. The price context
//! that reaches the prompt is a bucket label, never a number.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digit chunks with comma/dot separators inside ("1,299.00").
static NUMBER_CHUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,\.]*").expect("invalid pattern"));

static REPEATED_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("invalid pattern"));

/// Canonical integer-digit token for one chunk, or `None` when the number is
/// too small to be a price (fewer than 3 digits and value below 10). Filters
/// incidental numbers like "size 2" while keeping realistic price magnitudes.
fn canonical_token(chunk: &str) -> Option<String> {
    let cleaned = chunk.replace(',', "");
    let cleaned = REPEATED_DOTS.replace_all(&cleaned, ".");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        return None;
    }

    let integer_part: String = cleaned
        .split('.')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if integer_part.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().unwrap_or(0.0);
    if integer_part.len() >= 3 || value >= 10.0 {
        Some(integer_part)
    } else {
        None
    }
}

/// Every canonical price token found in a free-form price string,
/// de-duplicated in first-seen order.
pub fn extract_forbidden_price_tokens(price_input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in NUMBER_CHUNK.find_iter(price_input) {
        if let Some(token) = canonical_token(chunk.as_str()) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// Group a digit string from the right in threes with the given separator.
fn group_digits(digits: &str, separator: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    while end > 3 {
        groups.push(chars[end - 3..end].iter().collect());
        end -= 3;
    }
    groups.push(chars[..end].iter().collect());
    groups.reverse();
    groups.join(separator)
}

/// Formatting variants of one token: raw digits plus comma-, space-, and
/// dot-grouped renderings when the token is long enough to group.
fn token_variants(token: &str) -> Vec<String> {
    let mut variants = vec![token.to_string()];
    if token.len() > 3 {
        for sep in [",", " ", "."] {
            let grouped = group_digits(token, sep);
            if !variants.contains(&grouped) {
                variants.push(grouped);
            }
        }
    }
    variants
}

/// Case-insensitive pattern matching any variant of `token`, optionally led by
/// a currency marker or contextual word and optionally followed by a trailing
/// `+` or decimal remainder. Both alternations end on a word boundary so a
/// token never matches as a prefix of a longer digit run.
pub fn token_pattern(token: &str) -> Regex {
    let alts = token_variants(token)
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?i)(?:[₱$]|\b(?:php|p|srp|price|at|under|around|only|just|starting\s+at))\s*(?:{alts})(?:\+|\.\d+)?\b|\b(?:{alts})(?:\+|\.\d+)?\b",
    );
    Regex::new(&pattern).expect("invalid token pattern")
}

const BUCKETS: [(f64, &str); 4] = [
    (500.0, "budget-friendly segment"),
    (2000.0, "affordable midrange segment"),
    (5000.0, "upper midrange segment"),
    (15000.0, "premium segment"),
];

/// Coarse, deliberately imprecise price-context label for prompt building.
/// Anchored on the largest token so ranges land in their upper bucket.
pub fn build_price_context(price_input: &str) -> String {
    let anchor = extract_forbidden_price_tokens(price_input)
        .iter()
        .filter_map(|t| t.parse::<f64>().ok())
        .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |a| a.max(v))));

    match anchor {
        None => {
            "Price not provided. Treat pricing as variable and never quote exact amounts."
                .to_string()
        }
        Some(value) => {
            let label = BUCKETS
                .iter()
                .find(|(limit, _)| value < *limit)
                .map(|(_, label)| *label)
                .unwrap_or("high-ticket segment");
            format!(
                "Price positioning: {}. Never mention exact amounts; point viewers to the in-app shop for the current price.",
                label
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers_ignored() {
        assert!(extract_forbidden_price_tokens("size 2 fits most").is_empty());
        assert_eq!(extract_forbidden_price_tokens("P299"), vec!["299"]);
    }

    #[test]
    fn test_separator_variants_cleaned() {
        assert_eq!(extract_forbidden_price_tokens("₱1,299.00"), vec!["1299"]);
        assert_eq!(
            extract_forbidden_price_tokens("299 - 1,499 depende sa variant"),
            vec!["299", "1499"]
        );
    }

    #[test]
    fn test_tokens_deduplicated_first_seen() {
        assert_eq!(
            extract_forbidden_price_tokens("₱499 (orig 999, now 499)"),
            vec!["499", "999"]
        );
    }

    #[test]
    fn test_value_threshold() {
        // Two digits but value >= 10 stays a token.
        assert_eq!(extract_forbidden_price_tokens("85 pesos"), vec!["85"]);
        assert!(extract_forbidden_price_tokens("9.5 rating").is_empty());
    }

    #[test]
    fn test_token_pattern_matches_variants() {
        let pattern = token_pattern("1299");
        for text in ["1299", "1,299", "1 299", "1.299", "₱1299", "php 1,299", "only1299", "1299+"] {
            assert!(pattern.is_match(text), "no match for {:?}", text);
        }
        assert!(!pattern.is_match("129"));
    }

    #[test]
    fn test_token_does_not_match_inside_longer_numbers() {
        let pattern = token_pattern("299");
        assert!(!pattern.is_match("2990"));
        assert!(!pattern.is_match("₱2990"));
        assert!(!pattern.is_match("12990 sold"));
        assert!(pattern.is_match("299 pesos"));
    }

    #[test]
    fn test_short_token_has_no_grouped_variants() {
        assert_eq!(token_variants("299"), vec!["299"]);
        assert_eq!(
            token_variants("12990"),
            vec!["12990", "12,990", "12 990", "12.990"]
        );
    }

    #[test]
    fn test_price_context_buckets() {
        let budget = build_price_context("₱299");
        assert!(budget.contains("budget-friendly"));
        assert!(!budget.contains("299"));

        assert!(build_price_context("1,500").contains("affordable midrange"));
        assert!(build_price_context("₱4,200").contains("upper midrange"));
        assert!(build_price_context("PHP 9,999").contains("premium"));
        assert!(build_price_context("25,000").contains("high-ticket"));
    }

    #[test]
    fn test_price_context_range_uses_max() {
        // 299 - 2,500: anchor is the max, so the label is the upper bucket.
        assert!(build_price_context("299 - 2,500").contains("upper midrange"));
    }

    #[test]
    fn test_price_context_without_numbers() {
        let context = build_price_context("depende sa seller");
        assert!(context.contains("not provided"));
    }
}
