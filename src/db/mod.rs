//! Database operations for diary entries.
//!
//! This module provides SQLite storage for diary entries. It uses connection
//! pooling via r2d2; the application itself drives every call from a single
//! control flow.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry insert, delete and queries
//! - `ordering`: Chronological sort key over `dd.mm.yyyy` dates
//!
//! # Example
//!
//! ```no_run
//! use pawprint::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/diary.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod ordering;
pub mod schema;

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_MAX_SIZE};
use crate::errors::{AppResult, StorageError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
///
/// After the store file is replaced on disk (see [`crate::ops::backup::import_store`])
/// this handle is stale; the process must be restarted to see the new data.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl Database {
    /// Opens or creates the SQLite entry store.
    ///
    /// If the database file doesn't exist, it will be created. The schema is not
    /// touched; call [`Database::initialize_schema`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageUnavailable` if:
    /// - Database file cannot be opened or created
    /// - The file is not a SQLite database
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        // Probe without the pool so a bad path or a non-database fails fast
        let probe = Connection::open(db_path).map_err(StorageError::Sqlite)?;
        probe
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(StorageError::Sqlite)?;
        drop(probe);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(DB_POOL_MAX_SIZE)
            .connection_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS))
            .connection_customizer(Box::new(ConnectionConfig))
            .build(manager)
            .map_err(StorageError::Pool)?;

        info!("Database opened successfully");
        Ok(Database {
            pool,
            path: db_path.to_path_buf(),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| StorageError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Puts the store in rollback-journal (`DELETE`) mode so it is always one
    /// self-contained file that can be byte-copied for export, then creates
    /// all necessary tables if they don't exist.
    /// This is idempotent and never erases existing rows.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        // A restored file may carry WAL mode; keep the store a single file
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "DELETE", |row| row.get(0))
            .map_err(StorageError::Sqlite)?;
        debug!("Journal mode: {}", mode);
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }

    /// Path of the store file this handle was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Connection customizer applied to every pooled connection.
#[derive(Debug)]
struct ConnectionConfig;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionConfig {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS))?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
