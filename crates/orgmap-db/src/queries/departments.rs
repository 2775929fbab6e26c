//! Department queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Department row from database.
#[derive(Debug, Clone)]
pub struct DepartmentRow {
    pub id: String,
    pub org: String,
    pub function_id: String,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// List departments, optionally scoped to one org.
pub fn list_departments(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<DepartmentRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, function_id, name, code, description
             FROM departments
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(DepartmentRow {
                id: row.get(0)?,
                org: row.get(1)?,
                function_id: row.get(2)?,
                name: row.get(3)?,
                code: row.get(4)?,
                description: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
