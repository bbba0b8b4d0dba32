use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::StorageError;
use crate::migrations;

type SqlitePool = Pool<SqliteConnectionManager>;

/// Pooled handle to the CareCall database. Cheap to clone.
///
/// Every operation runs on tokio's blocking pool; each call checks out a
/// connection for its own duration only.
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Open (creating if needed) the database file at `path` and apply
    /// pending migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!(path = %path.display(), "opening database");
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )
        });
        let pool = Pool::builder().max_size(8).build(manager)?;

        Self::initialize(pool)
    }

    /// A private in-memory database. The pool holds exactly one connection
    /// for the lifetime of the handle, since each SQLite memory connection
    /// is its own database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        Self::initialize(pool)
    }

    fn initialize(pool: SqlitePool) -> Result<Self, StorageError> {
        {
            let mut conn = pool.get()?;
            migrations::run(&mut conn)?;
        }
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Check out a connection directly. Blocks; prefer the async operations.
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        Ok(self.pool.get()?)
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    pub(crate) async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await?
    }
}

/// Timestamps are stored as integer Unix microseconds so that ordering by
/// column is chronological.
pub(crate) fn timestamp_to_sql(ts: jiff::Timestamp) -> i64 {
    ts.as_microsecond()
}

pub(crate) fn timestamp_from_sql(idx: usize, micros: i64) -> rusqlite::Result<jiff::Timestamp> {
    jiff::Timestamp::from_microsecond(micros).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}
