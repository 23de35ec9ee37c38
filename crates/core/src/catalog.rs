use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::provider::Provider;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse price catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("price catalog must be a JSON object keyed by provider")]
    NotAnObject,
}

/// One context-window bracket of a model's price list. Prices are per million tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Largest prompt this tier covers; `None` is the catch-all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_tokens: Option<u64>,
    #[serde(rename = "input_price_per_million")]
    pub input_price: Decimal,
    #[serde(
        rename = "cached_input_price_per_million",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cached_input_price: Option<Decimal>,
    #[serde(rename = "output_price_per_million")]
    pub output_price: Decimal,
    #[serde(
        rename = "thinking_output_price_per_million",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thinking_output_price: Option<Decimal>,
}

impl PriceTier {
    fn validate(&self) -> Result<(), String> {
        let prices = [
            ("input", Some(self.input_price)),
            ("cached input", self.cached_input_price),
            ("output", Some(self.output_price)),
            ("thinking output", self.thinking_output_price),
        ];
        for (label, price) in prices {
            if let Some(price) = price
                && price.is_sign_negative()
                && !price.is_zero()
            {
                return Err(format!("{label} price is negative ({price})"));
            }
        }
        Ok(())
    }
}

/// All tiers configured for a single (provider, model) key, ascending by threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPricing {
    pub provider: Provider,
    pub model: String,
    pub tiers: Vec<PriceTier>,
}

impl ModelPricing {
    pub fn new(provider: Provider, model: impl Into<String>, tiers: Vec<PriceTier>) -> Self {
        Self {
            provider,
            model: model.into(),
            tiers,
        }
    }

    /// First tier whose threshold admits `context_tokens`, falling back to the last tier.
    /// Without a context size the first tier applies.
    pub fn select_tier(&self, context_tokens: Option<u64>) -> Option<&PriceTier> {
        let Some(context_tokens) = context_tokens else {
            return self.tiers.first();
        };
        self.tiers
            .iter()
            .find(|tier| {
                tier.max_context_tokens
                    .is_none_or(|max| context_tokens <= max)
            })
            .or_else(|| self.tiers.last())
    }

    fn is_pattern(&self) -> bool {
        self.model.contains('*')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelEntry {
    tiers: Vec<PriceTier>,
}

/// Immutable price table keyed by (provider, model).
#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    models: Vec<ModelPricing>,
    exact: HashMap<(Provider, String), usize>,
    patterns: Vec<usize>,
}

impl PriceCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let providers = raw.as_object().ok_or(CatalogError::NotAnObject)?;

        let mut models = Vec::new();
        for (provider_key, entries) in providers {
            if provider_key.starts_with('_') {
                continue;
            }
            let Some(provider) = Provider::parse(provider_key) else {
                tracing::warn!(provider = %provider_key, "skipping pricing for unknown provider");
                continue;
            };
            let Some(entries) = entries.as_object() else {
                tracing::warn!(provider = %provider_key, "skipping non-object provider entry");
                continue;
            };
            for (model, value) in entries {
                // Keys like `_comment_qwen` carry notes for humans.
                if model.starts_with('_') {
                    continue;
                }
                let entry: ModelEntry = match serde_json::from_value(value.clone()) {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!(
                            provider = %provider_key,
                            model = %model,
                            error = %err,
                            "skipping malformed pricing entry"
                        );
                        continue;
                    }
                };
                models.push(ModelPricing::new(provider, model.clone(), entry.tiers));
            }
        }
        Self::from_models(models)
    }

    pub fn from_models(models: Vec<ModelPricing>) -> Result<Self, CatalogError> {
        let mut catalog = PriceCatalog::default();
        for mut pricing in models {
            if pricing.tiers.is_empty() {
                tracing::warn!(
                    provider = %pricing.provider,
                    model = %pricing.model,
                    "skipping model without price tiers"
                );
                continue;
            }
            if let Err(message) = pricing.tiers.iter().try_for_each(PriceTier::validate) {
                tracing::warn!(
                    provider = %pricing.provider,
                    model = %pricing.model,
                    %message,
                    "skipping invalid pricing"
                );
                continue;
            }
            let before = pricing.tiers.clone();
            pricing
                .tiers
                .sort_by_key(|tier| tier.max_context_tokens.unwrap_or(u64::MAX));
            if before != pricing.tiers {
                tracing::warn!(
                    provider = %pricing.provider,
                    model = %pricing.model,
                    "price tiers were not ascending; reordered"
                );
            }

            let index = catalog.models.len();
            if pricing.is_pattern() {
                catalog.patterns.push(index);
            } else {
                let key = (pricing.provider, pricing.model.to_ascii_lowercase());
                if catalog.exact.contains_key(&key) {
                    tracing::warn!(
                        provider = %pricing.provider,
                        model = %pricing.model,
                        "duplicate pricing entry; keeping the first"
                    );
                    continue;
                }
                catalog.exact.insert(key, index);
            }
            catalog.models.push(pricing);
        }
        catalog
            .patterns
            .sort_by(|a, b| catalog.models[*a].model.cmp(&catalog.models[*b].model));
        tracing::debug!(models = catalog.models.len(), "price catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelPricing> {
        self.models.iter()
    }

    /// Exact model keys win over wildcard keys; matching ignores ASCII case.
    pub fn model_pricing(&self, provider: Provider, model: &str) -> Option<&ModelPricing> {
        let key = (provider, model.to_ascii_lowercase());
        if let Some(pricing) = self.exact.get(&key).and_then(|&index| self.models.get(index)) {
            return Some(pricing);
        }
        self.patterns
            .iter()
            .filter_map(|&index| self.models.get(index))
            .find(|pricing| {
                pricing.provider == provider && model_matches_pattern(model, &pricing.model)
            })
    }

    pub fn resolve(
        &self,
        provider: Option<Provider>,
        model: Option<&str>,
        context_tokens: Option<u64>,
    ) -> Option<&PriceTier> {
        self.model_pricing(provider?, model?)?
            .select_tier(context_tokens)
    }

    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        let mut out: BTreeMap<&str, BTreeMap<&str, ModelEntry>> = BTreeMap::new();
        for pricing in &self.models {
            out.entry(pricing.provider.as_str()).or_default().insert(
                pricing.model.as_str(),
                ModelEntry {
                    tiers: pricing.tiers.clone(),
                },
            );
        }
        Ok(serde_json::to_string_pretty(&out)?)
    }
}

/// `*` matches any run of characters; comparison ignores ASCII case.
pub fn model_matches_pattern(model: &str, pattern: &str) -> bool {
    let model = model.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();
    if !pattern.contains('*') {
        return model == pattern;
    }
    let mut parts = pattern.split('*');
    let prefix = parts.next().unwrap_or_default();
    let Some(mut remainder) = model.strip_prefix(prefix) else {
        return false;
    };
    let rest: Vec<&str> = parts.collect();
    let Some((suffix, middle)) = rest.split_last() else {
        return remainder.is_empty();
    };
    for part in middle.iter().filter(|part| !part.is_empty()) {
        match remainder.find(part) {
            Some(index) => remainder = &remainder[index + part.len()..],
            None => return false,
        }
    }
    remainder.ends_with(suffix)
}
