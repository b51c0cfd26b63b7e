use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fixed analysis prompt; the rendered dependency report is appended verbatim.
const ADVICE_PROMPT: &str = "\
You are an expert software architect reviewing a Java codebase. Below is its \
internal dependency graph: for each type, the types it depends on and the types \
that use it. Identify coupling hotspots, cyclic dependencies, and types with \
too many dependents, and suggest concrete, incremental refactorings. Be \
specific about which types to change and why.\n\nDependency report:\n\n";

/// Response from an LLM provider with refactoring advice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResponse {
    /// The advice text
    pub content: String,

    /// Total tokens consumed, when the provider reports usage
    pub tokens_used: Option<u32>,

    /// Provider-specific metadata (provider, model, ...)
    pub metadata: HashMap<String, String>,
}

/// Trait for LLM providers that can review a dependency report
#[async_trait::async_trait]
pub trait RefactorAdvisor: Send + Sync {
    /// Send the rendered report for review and return the advice
    async fn advise(&self, report: &str) -> Result<AdviceResponse>;

    /// Provider name (e.g., "OpenAI", "Ollama")
    fn provider_name(&self) -> &str;

    /// Model name being used
    fn model_name(&self) -> &str;
}

/// Build the full prompt for a rendered report
pub fn build_prompt(report: &str) -> String {
    format!("{}{}", ADVICE_PROMPT, report)
}

/// Rough token estimate: about four characters per token for English text
/// and code-like identifiers. Good enough for cost preview, not billing.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as u32).div_ceil(4)
}

/// Estimated cost in USD for a prompt/completion pair, from a fixed per-model
/// price table (USD per million tokens). Unknown models return None.
pub fn estimate_cost_usd(model: &str, prompt_tokens: u32, completion_tokens: u32) -> Option<f64> {
    let (input_per_million, output_per_million) = match model {
        "gpt-4o" => (2.50, 10.00),
        "gpt-4o-mini" => (0.15, 0.60),
        "gpt-4" => (30.00, 60.00),
        "gpt-3.5-turbo" => (0.50, 1.50),
        _ => return None,
    };

    Some(
        prompt_tokens as f64 / 1_000_000.0 * input_per_million
            + completion_tokens as f64 / 1_000_000.0 * output_per_million,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_report() {
        let prompt = build_prompt("com.example.A\n  depends on: none\n");
        assert!(prompt.contains("com.example.A"));
        assert!(prompt.starts_with("You are an expert software architect"));
    }

    #[test]
    fn test_token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_cost_estimate_known_and_unknown_models() {
        let cost = estimate_cost_usd("gpt-4o", 1_000_000, 0).unwrap();
        assert!((cost - 2.50).abs() < f64::EPSILON);
        assert!(estimate_cost_usd("llama3", 1000, 1000).is_none());
    }
}
