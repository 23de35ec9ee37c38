mod aggregate;
mod catalog;
mod cost;
mod ledger;
mod provider;
mod store;
mod trace;
mod usage;

pub use aggregate::{Project, ProjectAggregate, apply_cost_delta, next_average_duration};
pub use catalog::{CatalogError, ModelPricing, PriceCatalog, PriceTier, model_matches_pattern};
pub use cost::{
    COST_SCALE, CostBreakdown, CostQuote, CostSource, compute_cost, compute_cost_breakdown,
    quote_cost,
};
pub use ledger::{StepCostRecord, StepCostUpdate, merge_step_cost};
pub use provider::Provider;
pub use store::{
    LedgerStore, StepCostOutcome, StepLog, TraceDurationOutcome, record_step_cost,
    record_trace_duration,
};
pub use trace::{TIMESTAMP_FORMAT, TraceSpan};
pub use usage::UsageSnapshot;
