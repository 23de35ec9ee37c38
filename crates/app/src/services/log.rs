use std::thread;
use std::time::Duration;

use aitrace_core::{CostSource, StepLog};
use aitrace_db::Db;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::requests::{LogStepRequest, LogTraceRequest};
use crate::services::{SharedCatalog, SharedConfig, open_db};

const RETRY_BACKOFF_MS: u64 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepLogOutcome {
    pub project_id: i64,
    pub step_id: String,
    pub description: Option<String>,
    pub cost: Decimal,
    pub previous_cost: Decimal,
    pub delta: Decimal,
    pub cost_source: CostSource,
    pub project_total_cost: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceLogOutcome {
    pub project_id: i64,
    pub trace_id: String,
    pub new_trace: bool,
    pub duration_ms: i64,
    pub trace_count: u64,
    pub average_duration_ms: i64,
}

#[derive(Clone)]
pub struct LogService {
    config: SharedConfig,
    catalog: SharedCatalog,
}

impl LogService {
    pub(super) fn new(config: SharedConfig, catalog: SharedCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn log_step(&self, request: &LogStepRequest) -> Result<StepLogOutcome> {
        request.validate()?;
        let usage = request.usage_snapshot()?;
        let provider = request.provider();
        if provider.is_none()
            && let Some(raw) = request.llm_provider.as_deref()
        {
            tracing::info!(provider = raw, step_id = %request.step_id, "unrecognized provider");
        }
        let step = StepLog {
            step_id: &request.step_id,
            description: request.description.as_deref(),
            provider,
            model: request.model.as_deref(),
            usage: usage.as_ref(),
        };

        let logged = self.with_conflict_retry("log_step", |db| {
            let project = db.get_or_create_project(&request.project_name)?;
            db.log_step_cost(&self.catalog, project.id, &step)
        })?;

        let outcome = logged.outcome;
        if usage.is_some() && !outcome.quote.source.is_billable() {
            tracing::info!(
                step_id = %request.step_id,
                provider = ?provider,
                model = ?request.model,
                source = ?outcome.quote.source,
                "usage not billable; step billed at zero"
            );
        }
        tracing::debug!(
            step_id = %request.step_id,
            project_id = logged.project_id,
            source = ?outcome.quote.source,
            total = %outcome.project_total_cost,
            "step logged"
        );
        let delta = outcome.update.delta();
        Ok(StepLogOutcome {
            project_id: logged.project_id,
            step_id: outcome.update.record.step_id,
            description: outcome.update.record.description,
            cost: outcome.update.record.cost,
            previous_cost: outcome.update.previous_cost,
            delta,
            cost_source: outcome.quote.source,
            project_total_cost: outcome.project_total_cost,
        })
    }

    pub fn log_trace(&self, request: &LogTraceRequest) -> Result<TraceLogOutcome> {
        let span = request.to_span()?;
        let logged = self.with_conflict_retry("log_trace", |db| {
            let project = db.get_or_create_project(&request.project_name)?;
            db.log_trace(project.id, &span)
        })?;
        let outcome = logged.outcome;
        tracing::debug!(
            trace_id = %span.trace_id,
            project_id = logged.project_id,
            new_trace = outcome.new_trace,
            average_duration_ms = outcome.average_duration_ms,
            "trace logged"
        );
        Ok(TraceLogOutcome {
            project_id: logged.project_id,
            trace_id: span.trace_id,
            new_trace: outcome.new_trace,
            duration_ms: outcome.duration_ms,
            trace_count: outcome.trace_count,
            average_duration_ms: outcome.average_duration_ms,
        })
    }

    /// Reruns the whole unit of work while the database reports a write conflict.
    fn with_conflict_retry<T>(
        &self,
        operation: &str,
        mut run: impl FnMut(&mut Db) -> aitrace_db::Result<T>,
    ) -> Result<T> {
        let mut db = open_db(&self.config)?;
        let mut attempt: u32 = 0;
        loop {
            match run(&mut db) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_conflict() && attempt < self.config.conflict_retries => {
                    attempt += 1;
                    tracing::warn!(operation, attempt, error = %err, "write conflict; retrying");
                    thread::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
