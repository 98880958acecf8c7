//! Open-database sessions and the registry that owns them.
//!
//! Each session keeps its database entirely in memory. The file on disk is a
//! whole-image export written only by this module: when a database is
//! created, when it is closed, and after every statement that changes data
//! or schema.
//!
//! # Example
//!
//! ```no_run
//! use litestudio_sqlite::SessionRegistry;
//!
//! let mut registry = SessionRegistry::new();
//! let info = registry.create("data/new.db").unwrap();
//! assert!(info.tables.is_empty());
//!
//! registry.open("data/existing.db").unwrap();
//! println!("open: {:?}", registry.list_open());
//!
//! registry.close_all();
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use litestudio_core::DatabaseInfo;
use rusqlite::backup::{Backup, StepResult};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::introspect;

/// Pages copied per backup step when moving an image between handles.
const BACKUP_PAGES_PER_STEP: i32 = 1024;

/// One open database: its path and the in-memory engine handle.
///
/// Sessions are owned by a [`SessionRegistry`]; other components only
/// borrow one for the duration of a single call.
pub struct Session {
    path: PathBuf,
    conn: Connection,
}

impl Session {
    /// Creates an empty in-memory session for `path` without touching disk.
    fn empty(path: PathBuf) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { path, conn })
    }

    /// Copies the image stored at `path` into a new in-memory session.
    fn load(path: PathBuf) -> Result<Self> {
        let source = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let mut conn = Connection::open_in_memory()?;

        // An in-memory backup target must share the source's page size.
        let page_size: i64 = source.query_row("PRAGMA page_size", [], |row| row.get(0))?;
        conn.execute_batch(&format!("PRAGMA page_size = {page_size};"))?;

        copy_image(&source, &mut conn)?;
        drop(source);

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { path, conn })
    }

    /// The path this session was opened or created with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live engine handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Writes the in-memory image over the file at [`path`](Self::path).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PersistenceFailure`] wrapping the underlying
    /// cause.
    pub fn export(&self) -> Result<()> {
        let write = || -> Result<()> {
            let mut target = Connection::open(&self.path)?;
            copy_image(&self.conn, &mut target)?;
            Ok(())
        };
        write().map_err(|source| SessionError::PersistenceFailure {
            path: self.path.clone(),
            source: Box::new(source),
        })
    }

    /// Exports the image, logging and discarding any failure.
    ///
    /// The in-memory state stays authoritative, so a failed export leaves
    /// the session fully usable; unflushed changes are lost only if the
    /// process ends before the next successful export.
    ///
    /// Skipped while an explicit transaction is open; the statement that
    /// ends it (`COMMIT` or `ROLLBACK`) triggers the next export.
    pub fn persist(&self) {
        if !self.conn.is_autocommit() {
            debug!(path = %self.path.display(), "transaction open, export deferred");
            return;
        }
        match self.export() {
            Ok(()) => debug!(path = %self.path.display(), "persisted database image"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "persist failed"),
        }
    }

    /// Rebuilds the structural snapshot for this session.
    pub fn info(&self) -> Result<DatabaseInfo> {
        introspect::introspect(self)
    }

    fn release(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| SessionError::Database(err))
    }
}

/// Copies the whole image of `from` into `to`.
///
/// A busy or locked step is reported instead of retried.
fn copy_image(from: &Connection, to: &mut Connection) -> Result<()> {
    let backup = Backup::new(from, to)?;
    loop {
        match backup.step(BACKUP_PAGES_PER_STEP)? {
            StepResult::Done => return Ok(()),
            StepResult::More => {}
            _ => return Err(SessionError::ImageLocked),
        }
    }
}

/// Maps database paths to their open [`Session`]s.
///
/// At most one session exists per path. The registry is a plain owned value
/// with `&mut self` mutators; hosts that open and close from several threads
/// wrap it in their own lock.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<PathBuf, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the database file at `path`.
    ///
    /// Re-opening a path that is already open leaves storage untouched and
    /// returns a fresh snapshot of the existing session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::FileNotFound`] if no file exists at `path`, or
    /// [`SessionError::Database`] if the file cannot be read as a database.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        let path = path.as_ref();
        if let Some(session) = self.sessions.get(path) {
            return session.info();
        }
        if !path.is_file() {
            return Err(SessionError::FileNotFound(path.to_path_buf()));
        }

        let session = Session::load(path.to_path_buf())?;
        info!(path = %path.display(), "opened database");
        self.register(session).info()
    }

    /// Creates a new empty database at `path` and opens it.
    ///
    /// Missing parent directories are created, and the empty image is written
    /// before this returns so the file exists even if no statement ever runs.
    /// An existing session for `path` is replaced after being closed.
    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.close(path)?;

        let session = Session::empty(path.to_path_buf())?;
        session.export()?;
        info!(path = %path.display(), "created database");
        self.register(session).info()
    }

    /// Persists and releases the session for `path`. No-op if it is not open.
    ///
    /// A failed export is logged, not returned. The session is removed even
    /// if releasing the handle fails.
    pub fn close(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let Some(session) = self.sessions.remove(path) else {
            return Ok(());
        };
        session.persist();
        session.release()?;
        info!(path = %path.display(), "closed database");
        Ok(())
    }

    /// Closes every open session, continuing past individual failures.
    ///
    /// Intended for shutdown, so failures are logged and otherwise ignored.
    pub fn close_all(&mut self) {
        for (path, session) in self.sessions.drain() {
            session.persist();
            if let Err(err) = session.release() {
                warn!(path = %path.display(), error = %err, "failed to release database handle");
            }
        }
    }

    /// Paths of all open sessions, sorted.
    pub fn list_open(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.sessions.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn is_open(&self, path: impl AsRef<Path>) -> bool {
        self.sessions.contains_key(path.as_ref())
    }

    /// Looks up the session for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DatabaseNotOpen`] if no session exists.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<&Session> {
        let path = path.as_ref();
        self.sessions
            .get(path)
            .ok_or_else(|| SessionError::DatabaseNotOpen(path.to_path_buf()))
    }

    /// Rebuilds the structural snapshot for an open database.
    pub fn info(&self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        self.get(path)?.info()
    }

    fn register(&mut self, session: Session) -> &Session {
        self.sessions.entry(session.path.clone()).or_insert(session)
    }
}

impl Drop for SessionRegistry {
    fn drop(&mut self) {
        self.close_all();
    }
}
