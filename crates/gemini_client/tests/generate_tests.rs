//! Integration tests for the generation operations against a mock backend.

use gemini_client::{GenerateError, GeminiClient};
use serde_json::json;
use strategy_core::types::{FeedbackExample, LiveSellingBrief, ProductBrief};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn product_brief() -> ProductBrief {
    ProductBrief {
        product_name: "Hair Straightener Brush".to_string(),
        niche: "Beauty".to_string(),
        product_description: "Ceramic brush for fast styling.".to_string(),
        features: "Heats up fast, dual voltage".to_string(),
        price: "₱299".to_string(),
        target_audience: "Busy moms".to_string(),
        goal: "Get viral reach and sales on TikTok Shop".to_string(),
        offer_details: String::new(),
        objections: String::new(),
    }
}

fn live_brief() -> LiveSellingBrief {
    LiveSellingBrief {
        product_name: "Hair Straightener Brush".to_string(),
        product_info: "Ceramic brush for fast styling.".to_string(),
    }
}

fn envelope_with_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{"text": text}]
            }
        }]
    })
}

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key").with_base_url(server.uri())
}

#[tokio::test]
async fn test_guided_end_to_end_sanitizes_and_notes() {
    let server = MockServer::start().await;
    let model_json = json!({
        "strategySummary": "We sell the #1 best straightener, results in just 299!",
        "hooks": ["Grabe ang bilis, perfect for mornings!"],
        "videoScripts": [
            {"title": "Script 1", "durationSec": 30, "script": "Quick demo ng brush."}
        ],
        "captions": ["Styling in minutes, only ₱299!"],
        "hashtagSets": [["#hairgoals", "#deal299"]]
    });

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope_with_text(&model_json.to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap();

    let summary = output.strategy_summary.to_lowercase();
    assert!(!summary.contains("we sell"));
    assert!(!summary.contains("#1"));
    assert!(!summary.contains("best"));
    assert!(!summary.contains("299"));

    // The user's own price token is also scrubbed from captions.
    assert!(!output.captions[0].contains("299"));
    // Price-bearing hashtag dropped, safe one kept.
    assert_eq!(output.hashtag_sets[0], vec!["#hairgoals"]);
    // Hook with a claim word got softened.
    assert!(!output.hooks[0].to_lowercase().contains("perfect"));

    assert!(output.compliance_notes.len() >= 3);
    let joined = output.compliance_notes.join(" | ").to_lowercase();
    assert!(joined.contains("affiliate-safe phrasing"));
    assert!(joined.contains("superlative"));
    assert!(joined.contains("price"));
}

#[tokio::test]
async fn test_response_json_embedded_in_text_is_parsed() {
    let server = MockServer::start().await;
    let text = "Sure! Here is the plan:\n{\"strategySummary\": \"Plain summary.\"}\nEnjoy!";

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text(text)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap();
    assert_eq!(output.strategy_summary, "Plain summary.");
}

#[tokio::test]
async fn test_blocked_prompt_surfaces_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap_err();
    assert!(matches!(&err, GenerateError::Blocked(reason) if reason == "SAFETY"));
    assert_eq!(err.to_string(), "Gemini blocked this request: SAFETY");
}

#[tokio::test]
async fn test_http_error_uses_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Resource exhausted: quota exceeded"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Resource exhausted: quota exceeded");
    assert!(gemini_client::is_quota_error(&err.to_string()));
}

#[tokio::test]
async fn test_http_error_without_message_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Gemini API request failed with status 500.");
}

#[tokio::test]
async fn test_empty_response_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::EmptyResponse));
}

#[tokio::test]
async fn test_unparseable_text_is_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope_with_text("sorry, I can only answer in prose")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_guided_strategy(&product_brief(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::MalformedJson));
}

#[tokio::test]
async fn test_live_plan_coerces_empty_object_to_safe_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text("{}")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .generate_live_selling_plan(&live_brief(), &[])
        .await
        .unwrap();

    assert!(output.live_title.chars().count() >= 15);
    assert!(output.about_me.chars().count() >= 30);
    assert!(!output.opening_lines.is_empty());
    assert!(!output.faqs.is_empty());
    assert_eq!(output.compliance_notes.len(), 4);
}

#[tokio::test]
async fn test_feedback_context_reaches_the_prompt() {
    let server = MockServer::start().await;
    let feedback = vec![FeedbackExample {
        id: "fb_1".to_string(),
        created_at: "2026-08-20T00:00:00Z".to_string(),
        rating: 5,
        what_worked: "Short punchy hooks".to_string(),
        what_to_improve: "Less jargon".to_string(),
        product_name: "Hair Straightener Brush".to_string(),
        output_snapshot: String::new(),
    }];

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(wiremock::matchers::body_string_contains("Short punchy hooks"))
        .and(wiremock::matchers::body_string_contains("budget-friendly segment"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope_with_text("{\"strategySummary\": \"ok\"}")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .generate_guided_strategy(&product_brief(), &feedback)
        .await
        .unwrap();
}
