//! Log-step and log-trace payloads in their snake_case wire shape.
//!
//! Fields the billing engine does not use (inputs, outputs, tags, step types) are
//! accepted and ignored.

use aitrace_core::{Provider, TraceSpan, UsageSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::util::time::parse_trace_timestamp;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PromptTokensDetails {
    pub cached_tokens: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompletionTokensDetails {
    pub reasoning_tokens: Option<u64>,
}

/// OpenAI-style usage block; `cost` is what OpenRouter reports alongside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UsagePayload {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
}

impl UsagePayload {
    pub fn to_snapshot(&self) -> Result<UsageSnapshot> {
        if let Some(cost) = self.cost
            && cost < Decimal::ZERO
        {
            return Err(AppError::InvalidInput(format!(
                "usage cost must not be negative, got {cost}"
            )));
        }
        Ok(UsageSnapshot {
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            total_tokens: self.total_tokens,
            cached_prompt_tokens: self
                .prompt_tokens_details
                .as_ref()
                .and_then(|details| details.cached_tokens),
            reasoning_tokens: self
                .completion_tokens_details
                .as_ref()
                .and_then(|details| details.reasoning_tokens),
            provider_reported_cost: self.cost,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LogStepRequest {
    pub project_name: String,
    pub step_id: String,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub step_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub usage: Option<UsagePayload>,
}

impl LogStepRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("project_name", &self.project_name)?;
        require_non_empty("step_id", &self.step_id)?;
        Ok(())
    }

    /// Unknown or missing provider strings resolve to no provider, which prices at zero.
    pub fn provider(&self) -> Option<Provider> {
        self.llm_provider.as_deref().and_then(Provider::parse)
    }

    pub fn usage_snapshot(&self) -> Result<Option<UsageSnapshot>> {
        self.usage.as_ref().map(UsagePayload::to_snapshot).transpose()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LogTraceRequest {
    pub project_name: String,
    pub trace_id: String,
    #[serde(default)]
    pub trace_name: Option<String>,
    pub start_time: String,
    pub last_update_timestamp: String,
}

impl LogTraceRequest {
    pub fn to_span(&self) -> Result<TraceSpan> {
        require_non_empty("project_name", &self.project_name)?;
        require_non_empty("trace_id", &self.trace_id)?;
        let start_time = parse_trace_timestamp(&self.start_time)?;
        let last_update_time = parse_trace_timestamp(&self.last_update_timestamp)?;
        if last_update_time < start_time {
            return Err(AppError::InvalidInput(format!(
                "trace {} ends before it starts",
                self.trace_id
            )));
        }
        Ok(TraceSpan {
            trace_id: self.trace_id.clone(),
            start_time,
            last_update_time,
        })
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
