use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token accounting for a single LLM invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    /// Subset of `prompt_tokens` served from the provider's prompt cache.
    pub cached_prompt_tokens: Option<u64>,
    pub reasoning_tokens: Option<u64>,
    /// Cost some providers (OpenRouter) return with the response.
    pub provider_reported_cost: Option<Decimal>,
}

impl UsageSnapshot {
    pub fn has_token_counts(&self) -> bool {
        self.prompt_tokens.is_some() || self.completion_tokens.is_some()
    }

    pub fn is_thinking(&self) -> bool {
        self.reasoning_tokens.is_some_and(|tokens| tokens > 0)
    }
}
