use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalog::{PriceCatalog, PriceTier};
use crate::provider::Provider;
use crate::usage::UsageSnapshot;

/// Fractional digits kept on computed costs.
pub const COST_SCALE: u32 = 10;

const ONE_MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CostBreakdown {
    pub prompt_cost: Decimal,
    pub cached_prompt_cost: Decimal,
    pub completion_cost: Decimal,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    /// No usage, or usage without prompt/completion counts and no reported cost.
    NoUsage,
    ProviderReported,
    Priced,
    /// Provider or model missing from the catalog.
    Unpriced,
}

impl CostSource {
    pub fn is_billable(self) -> bool {
        matches!(self, CostSource::ProviderReported | CostSource::Priced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostQuote {
    pub cost: Decimal,
    pub source: CostSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
}

impl CostQuote {
    fn zero(source: CostSource) -> Self {
        Self {
            cost: Decimal::ZERO,
            source,
            breakdown: None,
        }
    }
}

fn token_cost(tokens: u64, price_per_million: Decimal) -> Decimal {
    if tokens == 0 {
        return Decimal::ZERO;
    }
    let cost = Decimal::from(tokens)
        .checked_mul(price_per_million)
        .and_then(|value| value.checked_div(ONE_MILLION));
    match cost {
        Some(cost) => cost,
        None => {
            tracing::warn!(tokens, %price_per_million, "token cost overflowed; billing zero");
            Decimal::ZERO
        }
    }
}

/// Prices a usage snapshot against one tier. Rounding happens once, on the total.
pub fn compute_cost_breakdown(usage: &UsageSnapshot, tier: &PriceTier) -> CostBreakdown {
    let prompt_tokens = usage.prompt_tokens.unwrap_or(0);
    let (prompt_cost, cached_prompt_cost) = match usage.cached_prompt_tokens {
        Some(cached) => {
            let cached_price = tier.cached_input_price.unwrap_or(tier.input_price);
            (
                token_cost(prompt_tokens.saturating_sub(cached), tier.input_price),
                token_cost(cached, cached_price),
            )
        }
        None => (token_cost(prompt_tokens, tier.input_price), Decimal::ZERO),
    };

    let completion_tokens = usage.completion_tokens.unwrap_or(0);
    let completion_price = if usage.is_thinking() {
        tier.thinking_output_price.unwrap_or(tier.output_price)
    } else {
        tier.output_price
    };
    let completion_cost = token_cost(completion_tokens, completion_price);

    let total_cost = prompt_cost
        .checked_add(cached_prompt_cost)
        .and_then(|sum| sum.checked_add(completion_cost))
        .unwrap_or_else(|| {
            tracing::warn!("cost sum overflowed; billing zero");
            Decimal::ZERO
        })
        .round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero);

    CostBreakdown {
        prompt_cost,
        cached_prompt_cost,
        completion_cost,
        total_cost,
    }
}

/// Full cost decision for one invocation, including why the result is what it is.
pub fn quote_cost(
    catalog: &PriceCatalog,
    provider: Option<Provider>,
    model: Option<&str>,
    usage: Option<&UsageSnapshot>,
) -> CostQuote {
    // A reported cost stands on its own, even without token counts.
    if let Some(reported) = usage.and_then(|usage| usage.provider_reported_cost) {
        return CostQuote {
            cost: reported,
            source: CostSource::ProviderReported,
            breakdown: None,
        };
    }
    let Some(usage) = usage.filter(|usage| usage.has_token_counts()) else {
        return CostQuote::zero(CostSource::NoUsage);
    };
    let Some(tier) = catalog.resolve(provider, model, usage.prompt_tokens) else {
        return CostQuote::zero(CostSource::Unpriced);
    };
    let breakdown = compute_cost_breakdown(usage, tier);
    CostQuote {
        cost: breakdown.total_cost,
        source: CostSource::Priced,
        breakdown: Some(breakdown),
    }
}

pub fn compute_cost(
    catalog: &PriceCatalog,
    provider: Option<Provider>,
    model: Option<&str>,
    usage: Option<&UsageSnapshot>,
) -> Decimal {
    quote_cost(catalog, provider, model, usage).cost
}
