//! Association-table queries.
//!
//! These tables carry no payload beyond the id pair; the adapter turns
//! each pair into an edge, provided both endpoints made it into the
//! snapshot.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// An (owner, member) id pair from an association table.
#[derive(Debug, Clone)]
pub struct AssocRow {
    pub owner_id: String,
    pub member_id: String,
}

fn list_pairs(pool: &DbPool, sql: &str, limit: i64) -> DbResult<Vec<AssocRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(AssocRow {
                owner_id: row.get(0)?,
                member_id: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// role → job assignments.
pub fn list_role_jobs(pool: &DbPool, limit: i64) -> DbResult<Vec<AssocRow>> {
    list_pairs(pool, "SELECT role_id, job_id FROM role_jobs LIMIT ?1", limit)
}

/// job → value driver deliveries.
pub fn list_job_drivers(pool: &DbPool, limit: i64) -> DbResult<Vec<AssocRow>> {
    list_pairs(pool, "SELECT job_id, driver_id FROM job_value_drivers LIMIT ?1", limit)
}

/// agent → job automations.
pub fn list_agent_jobs(pool: &DbPool, limit: i64) -> DbResult<Vec<AssocRow>> {
    list_pairs(pool, "SELECT agent_id, job_id FROM agent_jobs LIMIT ?1", limit)
}

/// workflow → job memberships.
pub fn list_workflow_jobs(pool: &DbPool, limit: i64) -> DbResult<Vec<AssocRow>> {
    list_pairs(pool, "SELECT workflow_id, job_id FROM workflow_jobs LIMIT ?1", limit)
}
