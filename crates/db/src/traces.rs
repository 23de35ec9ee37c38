use aitrace_core::TraceSpan;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_trace_time, now_rfc3339, parse_trace_time};

impl Db {
    pub fn get_trace(&self, trace_id: &str) -> Result<Option<TraceSpan>> {
        load_trace(&self.conn, trace_id)
    }

    pub fn trace_count_for_project(&self, project_id: i64) -> Result<u64> {
        count_traces(&self.conn, project_id)
    }
}

pub(crate) fn load_trace(conn: &Connection, trace_id: &str) -> Result<Option<TraceSpan>> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT trace_id, start_time, last_update_time FROM trace WHERE trace_id = ?1",
            params![trace_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((trace_id, start_time, last_update_time)) = row else {
        return Ok(None);
    };
    Ok(Some(TraceSpan {
        trace_id,
        start_time: parse_trace_time(&start_time)?,
        last_update_time: parse_trace_time(&last_update_time)?,
    }))
}

pub(crate) fn trace_project(conn: &Connection, trace_id: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT project_id FROM trace WHERE trace_id = ?1",
            params![trace_id],
            |row| row.get(0),
        )
        .optional()?)
}

pub(crate) fn count_traces(conn: &Connection, project_id: i64) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM trace WHERE project_id = ?1",
        params![project_id],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Inserts the trace or refreshes its times; the owning project never changes.
pub(crate) fn store_trace(conn: &Connection, project_id: i64, span: &TraceSpan) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO trace (trace_id, project_id, start_time, last_update_time, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (trace_id) DO UPDATE SET
          start_time = excluded.start_time,
          last_update_time = excluded.last_update_time,
          updated_at = excluded.updated_at
        "#,
        params![
            span.trace_id,
            project_id,
            format_trace_time(span.start_time),
            format_trace_time(span.last_update_time),
            now_rfc3339()
        ],
    )?;
    Ok(())
}
