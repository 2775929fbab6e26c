//! SQLite connection handling.
//!
//! A single bundled-SQLite connection behind a mutex is plenty for this
//! read-mostly workload; callers go through `with_conn` so connection
//! management stays in one place.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

/// Environment variable naming the SQLite database file.
pub const DB_PATH_ENV: &str = "ORGMAP_DB_PATH";

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database lock poisoned")]
    Lock,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the SQLite database.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<Mutex<Connection>>,
}

impl DbPool {
    /// Open (or create) a database file and run migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let pool = Self::wrap(conn);
        crate::migrations::run_migrations(&pool)?;
        Ok(pool)
    }

    /// In-memory database with the full schema. Used by tests.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let pool = Self::wrap(conn);
        crate::migrations::run_migrations(&pool)?;
        Ok(pool)
    }

    /// Open the database named by `ORGMAP_DB_PATH`.
    ///
    /// Fails fast with a configuration error when the variable is unset,
    /// before any query is attempted.
    pub fn from_env() -> DbResult<Self> {
        let path = std::env::var(DB_PATH_ENV)
            .map_err(|_| DbError::Config(format!("{} is not set", DB_PATH_ENV)))?;
        Self::open(path)
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run a closure with shared access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let conn = self.conn.lock().map_err(|_| DbError::Lock)?;
        f(&conn)
    }

    /// Run a closure with exclusive access to the connection.
    pub fn with_conn_mut<T>(&self, f: impl FnOnce(&mut Connection) -> DbResult<T>) -> DbResult<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Lock)?;
        f(&mut conn)
    }
}
