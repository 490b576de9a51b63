//! The four generation operations.
//!
//! Each operation validates its brief, checks the credential, issues one
//! request, and coerces the parsed response. Operations share no mutable
//! state, so a caller may run them concurrently.

use serde_json::Value;

use strategy_core::coerce::{coerce_live_follow_up, coerce_live_selling, coerce_strategy};
use strategy_core::price::extract_forbidden_price_tokens;
use strategy_core::types::{
    AutomationBrief, FeedbackExample, LiveFollowUpOutput, LiveSellingBrief, LiveSellingOutput,
    ProductBrief, StrategyOutput,
};

use crate::client::GeminiClient;
use crate::error::{GenerateError, Result};
use crate::prompts::{
    build_automation_prompt, build_guided_prompt, build_live_follow_up_prompt,
    build_live_selling_prompt,
};

fn require_field(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GenerateError::MissingField(message.to_string()));
    }
    Ok(())
}

impl GeminiClient {
    /// Full guided strategy from a complete product brief.
    pub async fn generate_guided_strategy(
        &self,
        product: &ProductBrief,
        feedback: &[FeedbackExample],
    ) -> Result<StrategyOutput> {
        require_field(&product.product_name, "Product name is required for Guided mode.")?;
        require_field(
            &product.product_description,
            "Product description is required for Guided mode.",
        )?;
        require_field(
            &product.target_audience,
            "Target audience is required for Guided mode.",
        )?;
        self.require_api_key()?;

        let prompt = build_guided_prompt(product, feedback);
        let raw = self.execute_prompt(&prompt).await?;
        Ok(self.coerce_strategy_response(&raw, &product.price))
    }

    /// Strategy inferred from a minimal brief.
    pub async fn generate_automation_strategy(
        &self,
        input: &AutomationBrief,
        feedback: &[FeedbackExample],
    ) -> Result<StrategyOutput> {
        require_field(&input.product_name, "Product name is required for AutoPilot mode.")?;
        if input.product_info.trim().is_empty() && input.product_details.trim().is_empty() {
            return Err(GenerateError::MissingField(
                "Add product info or details in AutoPilot mode.".to_string(),
            ));
        }
        self.require_api_key()?;

        let prompt = build_automation_prompt(input, feedback);
        let raw = self.execute_prompt(&prompt).await?;
        Ok(self.coerce_strategy_response(&raw, &input.price))
    }

    /// Line-by-line live session playbook.
    pub async fn generate_live_selling_plan(
        &self,
        input: &LiveSellingBrief,
        feedback: &[FeedbackExample],
    ) -> Result<LiveSellingOutput> {
        require_field(&input.product_name, "Product name is required for Live Selling mode.")?;
        require_field(
            &input.product_info,
            "Product info/description is required for Live Selling mode.",
        )?;
        self.require_api_key()?;

        let prompt = build_live_selling_prompt(input, feedback);
        let raw = self.execute_prompt(&prompt).await?;
        // Live briefs carry no price field; token scrubbing relies on the
        // generic price rules alone.
        Ok(coerce_live_selling(&raw, &[]))
    }

    /// One compliant answer for an ad-hoc viewer question during a live.
    pub async fn generate_live_follow_up_answer(
        &self,
        input: &LiveSellingBrief,
        live_output: &LiveSellingOutput,
        question: &str,
        feedback: &[FeedbackExample],
    ) -> Result<LiveFollowUpOutput> {
        require_field(question, "Type a live viewer question first.")?;
        self.require_api_key()?;

        let prompt = build_live_follow_up_prompt(input, live_output, question, feedback);
        let raw = self.execute_prompt(&prompt).await?;
        Ok(coerce_live_follow_up(&raw, question.trim(), &[]))
    }

    fn coerce_strategy_response(&self, raw: &Value, price_input: &str) -> StrategyOutput {
        let tokens = extract_forbidden_price_tokens(price_input);
        coerce_strategy(raw, &tokens)
    }
}
