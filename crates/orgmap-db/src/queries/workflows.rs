//! Workflow queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Workflow row from database.
#[derive(Debug, Clone)]
pub struct WorkflowRow {
    pub id: String,
    pub org: String,
    pub name: String,
    pub description: Option<String>,
}

/// List workflows, optionally scoped to one org.
pub fn list_workflows(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<WorkflowRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, name, description
             FROM workflows
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(WorkflowRow {
                id: row.get(0)?,
                org: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
