use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{ProjectAggregate, apply_cost_delta, next_average_duration};
use crate::catalog::PriceCatalog;
use crate::cost::{CostQuote, quote_cost};
use crate::ledger::{StepCostRecord, StepCostUpdate, merge_step_cost};
use crate::provider::Provider;
use crate::trace::TraceSpan;
use crate::usage::UsageSnapshot;

/// Persistence the ledger and aggregate updates read from and write to.
///
/// Callers must run each `record_*` call against a store scoped to a single atomic unit
/// (for example one database transaction); the functions below perform a plain
/// read-modify-write.
pub trait LedgerStore {
    type Error;

    fn step_cost(&self, step_id: &str) -> Result<Option<StepCostRecord>, Self::Error>;
    fn save_step_cost(&self, project_id: i64, record: &StepCostRecord) -> Result<(), Self::Error>;
    fn project_aggregate(&self, project_id: i64) -> Result<ProjectAggregate, Self::Error>;
    fn save_project_aggregate(
        &self,
        project_id: i64,
        total_cost: Decimal,
        average_duration_ms: i64,
    ) -> Result<(), Self::Error>;
    fn trace_duration(&self, trace_id: &str) -> Result<Option<i64>, Self::Error>;
    fn save_trace(&self, project_id: i64, span: &TraceSpan) -> Result<(), Self::Error>;
    fn trace_count(&self, project_id: i64) -> Result<u64, Self::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StepLog<'a> {
    pub step_id: &'a str,
    pub description: Option<&'a str>,
    pub provider: Option<Provider>,
    pub model: Option<&'a str>,
    pub usage: Option<&'a UsageSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCostOutcome {
    pub quote: CostQuote,
    pub update: StepCostUpdate,
    pub project_total_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceDurationOutcome {
    pub new_trace: bool,
    pub duration_ms: i64,
    pub previous_duration_ms: Option<i64>,
    pub trace_count: u64,
    pub average_duration_ms: i64,
}

pub fn record_step_cost<S: LedgerStore>(
    store: &S,
    catalog: &PriceCatalog,
    project_id: i64,
    step: &StepLog<'_>,
) -> Result<StepCostOutcome, S::Error> {
    let quote = quote_cost(catalog, step.provider, step.model, step.usage);
    let existing = store.step_cost(step.step_id)?;
    let update = merge_step_cost(existing, step.step_id, step.description, quote.cost);
    store.save_step_cost(project_id, &update.record)?;

    let aggregate = store.project_aggregate(project_id)?;
    let project_total_cost = apply_cost_delta(aggregate.total_cost, update.delta());
    store.save_project_aggregate(project_id, project_total_cost, aggregate.average_duration_ms)?;

    Ok(StepCostOutcome {
        quote,
        update,
        project_total_cost,
    })
}

pub fn record_trace_duration<S: LedgerStore>(
    store: &S,
    project_id: i64,
    span: &TraceSpan,
) -> Result<TraceDurationOutcome, S::Error> {
    let previous_duration_ms = store.trace_duration(&span.trace_id)?;
    let aggregate = store.project_aggregate(project_id)?;
    store.save_trace(project_id, span)?;
    let trace_count = store.trace_count(project_id)?;

    let duration_ms = span.duration_ms();
    let prior = previous_duration_ms.unwrap_or(aggregate.average_duration_ms);
    let average_duration_ms =
        next_average_duration(aggregate.average_duration_ms, prior, duration_ms, trace_count);
    store.save_project_aggregate(project_id, aggregate.total_cost, average_duration_ms)?;

    Ok(TraceDurationOutcome {
        new_trace: previous_duration_ms.is_none(),
        duration_ms,
        previous_duration_ms,
        trace_count,
        average_duration_ms,
    })
}
