//! # Orgmap DB
//!
//! Relational adapter over SQLite: the organizational ontology schema,
//! per-entity query modules, and the two-pass node/edge assembly that
//! turns rows and foreign keys into a graph payload.

pub mod adapter;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use adapter::RelationalAdapter;
pub use pool::{DbError, DbPool, DbResult};
