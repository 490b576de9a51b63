//! Prompt templates for the four generation modes.
//!
//! Templates are data: they interpolate the brief, the feedback context and
//! directives, and the coarse price-context label. The user's literal price
//! never reaches a prompt; only the bucket label does.

use strategy_core::feedback::{build_feedback_context, build_feedback_directives};
use strategy_core::price::build_price_context;
use strategy_core::types::{
    AutomationBrief, FeedbackExample, LiveSellingBrief, LiveSellingOutput, ProductBrief,
};

pub const SHARED_OUTPUT_SHAPE: &str = r##"{
  "strategySummary": "string",
  "positioning": {
    "audience": "string",
    "painPoint": "string",
    "offerAngle": "string"
  },
  "assumptions": ["string", "string"],
  "hooks": ["string", "string", "string", "string", "string", "string"],
  "videoScripts": [
    {"title":"Script 1","durationSec":35,"script":"string"},
    {"title":"Script 2","durationSec":35,"script":"string"},
    {"title":"Script 3","durationSec":35,"script":"string"}
  ],
  "scriptPostPackages": [
    {
      "scriptTitle":"Script 1",
      "postTitle":"string",
      "postDescription":"string",
      "hashtags":["#tag1","#tag2","#tag3","#tag4","#tag5"]
    },
    {
      "scriptTitle":"Script 2",
      "postTitle":"string",
      "postDescription":"string",
      "hashtags":["#tag1","#tag2","#tag3","#tag4","#tag5"]
    },
    {
      "scriptTitle":"Script 3",
      "postTitle":"string",
      "postDescription":"string",
      "hashtags":["#tag1","#tag2","#tag3","#tag4","#tag5"]
    }
  ],
  "ctaOptions": ["string", "string", "string", "string"],
  "captions": ["string", "string", "string"],
  "hashtagSets": [
    ["#tag1","#tag2","#tag3","#tag4","#tag5"],
    ["#tag1","#tag2","#tag3","#tag4","#tag5"],
    ["#tag1","#tag2","#tag3","#tag4","#tag5"]
  ],
  "postingPlan14Days": ["Day 1 - ...", "Day 2 - ..."],
  "livePlan": ["string", "string", "string", "string"],
  "abTests": ["string", "string", "string", "string"],
  "kpiFocus": ["string", "string", "string", "string"],
  "nextActions24h": ["string", "string", "string", "string"],
  "complianceNotes": ["string", "string", "string"]
}"##;

pub const LIVE_OUTPUT_SHAPE: &str = r##"{
  "liveTitle": "string, minimum 15 characters",
  "aboutMe": "string, minimum 30 characters",
  "openingLines": ["string", "string", "string"],
  "productPitchLines": ["string", "string", "string", "string"],
  "lowViewerRepeatLines": ["string", "string", "string"],
  "highViewerRepeatLines": ["string", "string", "string"],
  "engagementPrompts": ["string", "string", "string"],
  "closingLines": ["string", "string"],
  "faqs": [
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"},
    {"question":"string","answer":"string"}
  ],
  "randomQuestionFramework": ["string", "string", "string"],
  "complianceNotes": ["string", "string", "string", "string"]
}"##;

pub const FOLLOW_UP_OUTPUT_SHAPE: &str = r##"{
  "question": "string",
  "answer": "string",
  "fallbackIfUnsure": "string",
  "complianceNotes": ["string", "string", "string"]
}"##;

const SHARED_OUTPUT_RULES: &str = "\
Output rules:
- Respond ONLY in valid JSON.
- No markdown, no code fence.
- Language: Taglish (Filipino + English), practical and direct.
- Keep recommendations compliant and non-deceptive.
- Never quote exact prices; say to check the shop/basket instead.
- For \"scriptPostPackages\", generate one package per script.
- postTitle should be scroll-stopping and concise.
- postDescription should be posting-ready with clear CTA.
- hashtags should be relevant and non-spammy.";

pub fn build_guided_prompt(product: &ProductBrief, feedback: &[FeedbackExample]) -> String {
    format!(
        "You are a senior TikTok Shop affiliate strategist focused on Philippines market.

Goal:
- Create a highly practical Taglish strategy that increases viral reach and conversion/sales.
- Keep output realistic for a solo creator.

Product input:
- Product name: {name}
- Niche: {niche}
- Description: {description}
- Features: {features}
- {price_context}
- Target audience: {audience}
- Goal: {goal}
- Offer details: {offer}
- Common objections: {objections}

Learning examples from previous outputs and user feedback:
{feedback_context}

{directives}

{rules}
- For \"assumptions\", only include assumptions if needed, else return [].

Return JSON with this exact shape:
{shape}",
        name = product.product_name,
        niche = product.niche,
        description = product.product_description,
        features = product.features,
        price_context = build_price_context(&product.price),
        audience = product.target_audience,
        goal = product.goal,
        offer = product.offer_details,
        objections = product.objections,
        feedback_context = build_feedback_context(feedback),
        directives = build_feedback_directives(feedback),
        rules = SHARED_OUTPUT_RULES,
        shape = SHARED_OUTPUT_SHAPE,
    )
}

pub fn build_automation_prompt(input: &AutomationBrief, feedback: &[FeedbackExample]) -> String {
    format!(
        "You are an automation strategist for TikTok Shop affiliates in the Philippines.

Task:
- The user gives minimal product information.
- You infer the missing marketing strategy details safely and clearly.
- Build conversion-focused but ethical Taglish content.

Minimal product input:
- Product name: {name}
- Product info: {info}
- Product details and specs: {details}
- {price_context}
- Brand tone preference: {tone}

Learning examples from previous outputs and user feedback:
{feedback_context}

{directives}

{rules}
- Fill \"assumptions\" with the inferred audience/pain/offer assumptions.
- Focus on script-ready output, no long theory.

Return JSON with this exact shape:
{shape}",
        name = input.product_name,
        info = input.product_info,
        details = input.product_details,
        price_context = build_price_context(&input.price),
        tone = input.brand_tone,
        feedback_context = build_feedback_context(feedback),
        directives = build_feedback_directives(feedback),
        rules = SHARED_OUTPUT_RULES,
        shape = SHARED_OUTPUT_SHAPE,
    )
}

pub fn build_live_selling_prompt(input: &LiveSellingBrief, feedback: &[FeedbackExample]) -> String {
    format!(
        "You are a live-selling coach for TikTok Shop affiliates in the Philippines.

Task:
- Build a complete live session playbook the host can read line-by-line on stream.
- Lines must work when repeated many times across a long live session.

Product input:
- Product name: {name}
- Product info: {info}

Learning examples from previous outputs and user feedback:
{feedback_context}

{directives}

Output rules:
- Respond ONLY in valid JSON.
- No markdown, no code fence.
- Language: Taglish (Filipino + English), natural spoken style.
- Never quote exact prices; direct viewers to the basket for pricing.
- Provide at least 8 FAQ entries with compliant suggested answers.
- liveTitle must be at least 15 characters; aboutMe at least 30 characters.

Return JSON with this exact shape:
{shape}",
        name = input.product_name,
        info = input.product_info,
        feedback_context = build_feedback_context(feedback),
        directives = build_feedback_directives(feedback),
        shape = LIVE_OUTPUT_SHAPE,
    )
}

pub fn build_live_follow_up_prompt(
    input: &LiveSellingBrief,
    live_output: &LiveSellingOutput,
    question: &str,
    feedback: &[FeedbackExample],
) -> String {
    format!(
        "You are a live-selling co-host for a TikTok Shop affiliate in the Philippines.

Task:
- A viewer asked a question that is not covered by the prepared FAQ.
- Write one compliant, natural Taglish answer the host can read out loud now.

Product input:
- Product name: {name}
- Product info: {info}

Current live session context:
- Live title: {live_title}
- Prepared FAQ topics: {faq_topics}

Viewer question:
{question}

{directives}

Output rules:
- Respond ONLY in valid JSON.
- No markdown, no code fence.
- Never quote exact prices; direct viewers to the basket for pricing.
- No medical, curative, or guaranteed-result claims.
- Include a safe fallback line in \"fallbackIfUnsure\" for when the host is not certain.

Return JSON with this exact shape:
{shape}",
        name = input.product_name,
        info = input.product_info,
        live_title = live_output.live_title,
        faq_topics = live_output
            .faqs
            .iter()
            .map(|faq| faq.question.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
        question = question,
        directives = build_feedback_directives(feedback),
        shape = FOLLOW_UP_OUTPUT_SHAPE,
    )
}
