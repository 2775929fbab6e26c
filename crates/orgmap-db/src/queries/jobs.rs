//! Job-to-be-done queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Job-to-be-done row from database.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: String,
    pub org: String,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// List jobs to be done, optionally scoped to one org.
pub fn list_jobs(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<JobRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, name, slug, description, category
             FROM jobs_to_be_done
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(JobRow {
                id: row.get(0)?,
                org: row.get(1)?,
                name: row.get(2)?,
                slug: row.get(3)?,
                description: row.get(4)?,
                category: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
