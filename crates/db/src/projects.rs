use aitrace_core::{Project, ProjectAggregate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{
    PROJECT_COLUMNS, format_decimal, now_rfc3339, parse_decimal, row_to_project,
};

impl Db {
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project p ORDER BY p.name ASC, p.id ASC"
        ))?;
        let rows = stmt
            .query_map([], row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| row.into_project()).collect()
    }

    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM project p WHERE p.id = ?1"),
                params![id],
                row_to_project,
            )
            .optional()?;
        row.map(|row| row.into_project()).transpose()
    }

    pub fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM project p WHERE p.name = ?1"),
                params![name],
                row_to_project,
            )
            .optional()?;
        row.map(|row| row.into_project()).transpose()
    }

    pub fn get_or_create_project(&self, name: &str) -> Result<Project> {
        if let Some(project) = self.get_project_by_name(name)? {
            return Ok(project);
        }
        let now = now_rfc3339();
        let inserted = self.conn.execute(
            r#"
            INSERT INTO project (name, total_cost, avg_duration_ms, created_at, updated_at)
            VALUES (?1, '0', 0, ?2, ?3)
            ON CONFLICT (name) DO NOTHING
            "#,
            params![name, now, now],
        )?;
        if inserted > 0 {
            tracing::info!(project = name, "created project");
        }
        self.get_project_by_name(name)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

pub(crate) fn load_aggregate(conn: &Connection, project_id: i64) -> Result<ProjectAggregate> {
    let row: Option<(String, i64, i64)> = conn
        .query_row(
            r#"
            SELECT total_cost, avg_duration_ms,
                   (SELECT COUNT(*) FROM trace WHERE project_id = ?1)
            FROM project
            WHERE id = ?1
            "#,
            params![project_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((total_cost, average_duration_ms, trace_count)) = row else {
        return Err(DbError::MissingProject(project_id));
    };
    Ok(ProjectAggregate {
        total_cost: parse_decimal(&total_cost)?,
        average_duration_ms,
        trace_count: u64::try_from(trace_count).unwrap_or(0),
    })
}

pub(crate) fn store_aggregate(
    conn: &Connection,
    project_id: i64,
    total_cost: Decimal,
    average_duration_ms: i64,
) -> Result<()> {
    let updated = conn.execute(
        r#"
        UPDATE project
        SET total_cost = ?1, avg_duration_ms = ?2, updated_at = ?3
        WHERE id = ?4
        "#,
        params![
            format_decimal(total_cost),
            average_duration_ms,
            now_rfc3339(),
            project_id
        ],
    )?;
    if updated == 0 {
        return Err(DbError::MissingProject(project_id));
    }
    Ok(())
}
