use std::str::FromStr;

use aitrace_core::{Project, TIMESTAMP_FORMAT};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use rust_decimal::Decimal;

use crate::error::Result;

pub(crate) const PROJECT_COLUMNS: &str = r#"
    p.id, p.name, p.total_cost, p.avg_duration_ms,
    (SELECT COUNT(*) FROM trace t WHERE t.project_id = p.id),
    p.created_at, p.updated_at
"#;

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub(crate) fn parse_decimal(value: &str) -> Result<Decimal> {
    Ok(Decimal::from_str(value.trim())?)
}

pub(crate) fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn format_trace_time(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_trace_time(value: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")?)
}

/// Project columns as stored, before decimal and timestamp parsing.
pub(crate) struct ProjectRow {
    id: i64,
    name: String,
    total_cost: String,
    avg_duration_ms: i64,
    trace_count: i64,
    created_at: String,
    updated_at: String,
}

pub(crate) fn row_to_project(row: &Row<'_>) -> std::result::Result<ProjectRow, rusqlite::Error> {
    Ok(ProjectRow {
        id: row.get(0)?,
        name: row.get(1)?,
        total_cost: row.get(2)?,
        avg_duration_ms: row.get(3)?,
        trace_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl ProjectRow {
    pub(crate) fn into_project(self) -> Result<Project> {
        Ok(Project {
            id: self.id,
            name: self.name,
            total_cost: parse_decimal(&self.total_cost)?,
            average_duration_ms: self.avg_duration_ms,
            trace_count: u64::try_from(self.trace_count).unwrap_or(0),
            created_at: parse_rfc3339(&self.created_at)?,
            updated_at: parse_rfc3339(&self.updated_at)?,
        })
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_text_is_normalized() {
        assert_eq!(format_decimal(Decimal::new(8000, 6)), "0.008");
        assert_eq!(format_decimal(Decimal::ZERO), "0");
        assert_eq!(parse_decimal(" 0.0050 ").expect("parse"), Decimal::new(5, 3));
    }

    #[test]
    fn trace_times_accept_optional_fraction() {
        let whole = parse_trace_time("2025-03-01 10:00:00").expect("whole");
        let fraction = parse_trace_time("2025-03-01 10:00:00.250000").expect("fraction");
        assert_eq!((fraction - whole).num_milliseconds(), 250);
        assert_eq!(format_trace_time(fraction), "2025-03-01 10:00:00.250000");
    }
}
