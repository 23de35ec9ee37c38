use aitrace_core::{
    LedgerStore, PriceCatalog, ProjectAggregate, StepCostOutcome, StepCostRecord, StepLog,
    TraceDurationOutcome, TraceSpan, record_step_cost, record_trace_duration,
};
use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::Db;
use crate::error::{DbError, Result};
use crate::projects::{load_aggregate, store_aggregate};
use crate::steps::{load_step_cost, step_project, store_step_cost};
use crate::traces::{count_traces, load_trace, store_trace, trace_project};

/// Outcome of a logged step or trace together with the project it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Logged<T> {
    pub project_id: i64,
    pub outcome: T,
}

/// [`LedgerStore`] over a borrowed connection, normally an open transaction.
pub struct SqliteLedger<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl LedgerStore for SqliteLedger<'_> {
    type Error = DbError;

    fn step_cost(&self, step_id: &str) -> Result<Option<StepCostRecord>> {
        load_step_cost(self.conn, step_id)
    }

    fn save_step_cost(&self, project_id: i64, record: &StepCostRecord) -> Result<()> {
        store_step_cost(self.conn, project_id, record)
    }

    fn project_aggregate(&self, project_id: i64) -> Result<ProjectAggregate> {
        load_aggregate(self.conn, project_id)
    }

    fn save_project_aggregate(
        &self,
        project_id: i64,
        total_cost: Decimal,
        average_duration_ms: i64,
    ) -> Result<()> {
        store_aggregate(self.conn, project_id, total_cost, average_duration_ms)
    }

    fn trace_duration(&self, trace_id: &str) -> Result<Option<i64>> {
        Ok(load_trace(self.conn, trace_id)?.map(|span| span.duration_ms()))
    }

    fn save_trace(&self, project_id: i64, span: &TraceSpan) -> Result<()> {
        store_trace(self.conn, project_id, span)
    }

    fn trace_count(&self, project_id: i64) -> Result<u64> {
        count_traces(self.conn, project_id)
    }
}

impl Db {
    /// Prices the step, merges it into the ledger and moves the project total by the
    /// delta, all inside one immediate transaction.
    pub fn log_step_cost(
        &mut self,
        catalog: &PriceCatalog,
        project_id: i64,
        step: &StepLog<'_>,
    ) -> Result<Logged<StepCostOutcome>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let project_id = step_project(&tx, step.step_id)?.unwrap_or(project_id);
        let outcome = record_step_cost(&SqliteLedger::new(&tx), catalog, project_id, step)?;
        tx.commit()?;
        tracing::debug!(
            step_id = step.step_id,
            project_id,
            cost = %outcome.update.record.cost,
            delta = %outcome.update.delta(),
            "step cost committed"
        );
        Ok(Logged {
            project_id,
            outcome,
        })
    }

    /// Upserts the trace and folds its duration into the project average in one
    /// immediate transaction.
    pub fn log_trace(
        &mut self,
        project_id: i64,
        span: &TraceSpan,
    ) -> Result<Logged<TraceDurationOutcome>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let project_id = trace_project(&tx, &span.trace_id)?.unwrap_or(project_id);
        let outcome = record_trace_duration(&SqliteLedger::new(&tx), project_id, span)?;
        tx.commit()?;
        tracing::debug!(
            trace_id = %span.trace_id,
            project_id,
            duration_ms = outcome.duration_ms,
            average_duration_ms = outcome.average_duration_ms,
            "trace committed"
        );
        Ok(Logged {
            project_id,
            outcome,
        })
    }
}
