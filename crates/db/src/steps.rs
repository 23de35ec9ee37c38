use aitrace_core::StepCostRecord;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_decimal, now_rfc3339, parse_decimal};

impl Db {
    pub fn get_step_cost(&self, step_id: &str) -> Result<Option<StepCostRecord>> {
        load_step_cost(&self.conn, step_id)
    }

    /// Records for the ids that have one, in input order.
    pub fn step_costs_for_ids(&self, step_ids: &[&str]) -> Result<Vec<StepCostRecord>> {
        let mut records = Vec::with_capacity(step_ids.len());
        for step_id in step_ids {
            if let Some(record) = load_step_cost(&self.conn, step_id)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

pub(crate) fn load_step_cost(conn: &Connection, step_id: &str) -> Result<Option<StepCostRecord>> {
    let row: Option<(String, Option<String>, String)> = conn
        .query_row(
            "SELECT step_id, description, cost FROM step_cost WHERE step_id = ?1",
            params![step_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((step_id, description, cost)) = row else {
        return Ok(None);
    };
    Ok(Some(StepCostRecord {
        step_id,
        description,
        cost: parse_decimal(&cost)?,
    }))
}

pub(crate) fn step_project(conn: &Connection, step_id: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT project_id FROM step_cost WHERE step_id = ?1",
            params![step_id],
            |row| row.get(0),
        )
        .optional()?)
}

pub(crate) fn store_step_cost(
    conn: &Connection,
    project_id: i64,
    record: &StepCostRecord,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO step_cost (step_id, project_id, description, cost, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (step_id) DO UPDATE SET
          description = excluded.description,
          cost = excluded.cost,
          updated_at = excluded.updated_at
        "#,
        params![
            record.step_id,
            project_id,
            record.description,
            format_decimal(record.cost),
            now_rfc3339()
        ],
    )?;
    Ok(())
}
