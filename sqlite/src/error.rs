//! Error types for session operations.
//!
//! Only structural failures are represented here. A statement the engine
//! rejects is not an error at this layer: it is reported as
//! [`QueryResult::Error`](litestudio_core::QueryResult::Error).

use std::path::PathBuf;

use litestudio_core::DdlError;
use thiserror::Error;

/// Errors that can occur while managing sessions or reading their schema.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `open` was called on a path with no file behind it.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The path has no registered session.
    #[error("database not open: {}", .0.display())]
    DatabaseNotOpen(PathBuf),

    /// Exporting the in-memory image to disk failed.
    ///
    /// Returned by `create`, whose contract is that the file exists.
    /// Everywhere else the registry logs it and carries on.
    #[error("failed to persist {}: {source}", path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: Box<SessionError>,
    },

    /// The image could not be copied because a lock is held on it.
    #[error("database image is locked")]
    ImageLocked,

    /// DDL generation rejected the operation or payload.
    #[error(transparent)]
    Ddl(#[from] DdlError),

    /// SQLite operation failure outside statement execution.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
