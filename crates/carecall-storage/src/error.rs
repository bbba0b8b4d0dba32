use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
