//! Role queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Role row from database.
#[derive(Debug, Clone)]
pub struct RoleRow {
    pub id: String,
    pub org: String,
    pub department_id: String,
    pub title: String,
    pub description: Option<String>,
}

/// List roles, optionally scoped to one org.
pub fn list_roles(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<RoleRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, department_id, title, description
             FROM roles
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY title LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(RoleRow {
                id: row.get(0)?,
                org: row.get(1)?,
                department_id: row.get(2)?,
                title: row.get(3)?,
                description: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
