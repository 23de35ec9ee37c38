use aitrace_core::{CostQuote, PriceTier, Provider, UsageSnapshot, quote_cost};
use serde::Serialize;

use crate::services::SharedCatalog;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub provider: Provider,
    pub model: String,
    pub tiers: Vec<PriceTier>,
}

#[derive(Clone)]
pub struct PricingService {
    catalog: SharedCatalog,
}

impl PricingService {
    pub(super) fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    /// Cost of one invocation without recording anything.
    pub fn quote(
        &self,
        provider: Option<&str>,
        model: Option<&str>,
        usage: Option<&UsageSnapshot>,
    ) -> CostQuote {
        let provider = provider.and_then(Provider::parse);
        quote_cost(&self.catalog, provider, model, usage)
    }

    pub fn resolve_tier(
        &self,
        provider: &str,
        model: &str,
        context_tokens: Option<u64>,
    ) -> Option<PriceTier> {
        self.catalog
            .resolve(Provider::parse(provider), Some(model), context_tokens)
            .cloned()
    }

    pub fn catalog_summary(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .catalog
            .models()
            .map(|pricing| CatalogEntry {
                provider: pricing.provider,
                model: pricing.model.clone(),
                tiers: pricing.tiers.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.provider
                .as_str()
                .cmp(b.provider.as_str())
                .then_with(|| a.model.cmp(&b.model))
        });
        entries
    }
}
