//! Value category and value driver queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Value category row from database.
#[derive(Debug, Clone)]
pub struct ValueCategoryRow {
    pub id: String,
    pub org: String,
    pub name: String,
    pub description: Option<String>,
}

/// Value driver row from database.
#[derive(Debug, Clone)]
pub struct ValueDriverRow {
    pub id: String,
    pub org: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// List value categories, optionally scoped to one org.
pub fn list_categories(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<ValueCategoryRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, name, description
             FROM value_categories
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(ValueCategoryRow {
                id: row.get(0)?,
                org: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// List value drivers, optionally scoped to one org.
pub fn list_drivers(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<ValueDriverRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, category_id, name, description
             FROM value_drivers
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(ValueDriverRow {
                id: row.get(0)?,
                org: row.get(1)?,
                category_id: row.get(2)?,
                name: row.get(3)?,
                description: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
