//! Persona queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Persona row from database.
#[derive(Debug, Clone)]
pub struct PersonaRow {
    pub id: String,
    pub org: String,
    pub role_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// List personas, optionally scoped to one org.
pub fn list_personas(pool: &DbPool, scope: Option<&str>, limit: i64) -> DbResult<Vec<PersonaRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, org, role_id, name, description
             FROM personas
             WHERE (?1 IS NULL OR org = ?1)
             ORDER BY name LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![scope, limit], |row| {
            Ok(PersonaRow {
                id: row.get(0)?,
                org: row.get(1)?,
                role_id: row.get(2)?,
                name: row.get(3)?,
                description: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
