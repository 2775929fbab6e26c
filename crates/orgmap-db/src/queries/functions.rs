//! Business function queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Business function row from database.
#[derive(Debug, Clone)]
pub struct FunctionRow {
    pub id: String,
    pub org: String,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// List business functions, optionally scoped to one org.
pub fn list_functions(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<FunctionRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, name, code, description
             FROM business_functions
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(FunctionRow {
                id: row.get(0)?,
                org: row.get(1)?,
                name: row.get(2)?,
                code: row.get(3)?,
                description: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
