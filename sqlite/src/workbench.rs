//! The boundary surface offered to a UI or command-line host.
//!
//! [`Workbench`] owns one [`SessionRegistry`] and exposes every operation a
//! host needs: session lifecycle, snapshots, statement execution, DDL
//! previews, and the convenience wrappers that generate DDL and run it.
//!
//! # Example
//!
//! ```no_run
//! use litestudio_core::{ColumnDefinition, CreateTablePayload, QueryResult};
//! use litestudio_sqlite::Workbench;
//!
//! let mut bench = Workbench::new();
//! bench.create("shop.db").unwrap();
//!
//! bench
//!     .create_table(
//!         "shop.db",
//!         &CreateTablePayload {
//!             name: "items".into(),
//!             columns: vec![
//!                 ColumnDefinition::new("id", "INTEGER").primary_key(),
//!                 ColumnDefinition::new("label", "TEXT").not_null(),
//!             ],
//!         },
//!     )
//!     .unwrap();
//!
//! let result = bench.run_buffer("shop.db", "INSERT INTO items (label) VALUES ('pen'); SELECT * FROM items").unwrap();
//! assert!(matches!(result, QueryResult::Select { .. }));
//! ```

use std::path::{Path, PathBuf};

use litestudio_core::{
    AddColumnPayload, CreateIndexPayload, CreateTablePayload, DatabaseInfo, QueryResult,
    add_column_sql, create_index_sql, create_table_sql, drop_index_sql, drop_table_sql,
    generate_ddl, select_page_sql,
};

use crate::error::Result;
use crate::executor;
use crate::session::SessionRegistry;

/// Message of the result returned by [`Workbench::run_buffer`] for a buffer
/// that holds no statements.
pub const NO_STATEMENTS_MESSAGE: &str = "No statements to execute";

/// Host-facing facade over a [`SessionRegistry`].
///
/// Hard failures (unknown path, missing file, bad DDL tag) come back as
/// `Err`; anything the engine rejects while running SQL comes back as
/// `Ok(QueryResult::Error { .. })`.
#[derive(Default)]
pub struct Workbench {
    registry: SessionRegistry,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// See [`SessionRegistry::open`].
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        self.registry.open(path)
    }

    /// See [`SessionRegistry::create`].
    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        self.registry.create(path)
    }

    /// See [`SessionRegistry::close`].
    pub fn close(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.registry.close(path)
    }

    /// See [`SessionRegistry::close_all`].
    pub fn close_all(&mut self) {
        self.registry.close_all();
    }

    pub fn list_open(&self) -> Vec<PathBuf> {
        self.registry.list_open()
    }

    /// Fresh structural snapshot of an open database.
    pub fn info(&self, path: impl AsRef<Path>) -> Result<DatabaseInfo> {
        self.registry.info(path)
    }

    /// Executes `sql` as one unit. Read-only text holding several statements
    /// runs them all and returns the first result set; see [`crate::execute`].
    pub fn execute_query(&self, path: impl AsRef<Path>, sql: &str) -> Result<QueryResult> {
        let session = self.registry.get(path)?;
        Ok(executor::execute(session, sql))
    }

    /// Splits `sql` and executes every statement in order.
    pub fn execute_batch(&self, path: impl AsRef<Path>, sql: &str) -> Result<Vec<QueryResult>> {
        let session = self.registry.get(path)?;
        Ok(executor::execute_batch(session, sql))
    }

    /// Executes an editor buffer and returns its "current" result: the last
    /// statement's result, or an error result when the buffer is empty.
    pub fn run_buffer(&self, path: impl AsRef<Path>, sql: &str) -> Result<QueryResult> {
        let mut results = self.execute_batch(path, sql)?;
        Ok(results.pop().unwrap_or_else(|| QueryResult::Error {
            error: NO_STATEMENTS_MESSAGE.to_string(),
            execution_time: 0.0,
        }))
    }

    /// Preview text for a tagged DDL operation. Never executed.
    pub fn generate_ddl(&self, operation: &str, payload: serde_json::Value) -> Result<String> {
        Ok(generate_ddl(operation, payload)?)
    }

    pub fn create_table(
        &self,
        path: impl AsRef<Path>,
        payload: &CreateTablePayload,
    ) -> Result<QueryResult> {
        self.execute_query(path, &create_table_sql(payload))
    }

    pub fn add_column(
        &self,
        path: impl AsRef<Path>,
        payload: &AddColumnPayload,
    ) -> Result<QueryResult> {
        self.execute_query(path, &add_column_sql(payload))
    }

    pub fn create_index(
        &self,
        path: impl AsRef<Path>,
        payload: &CreateIndexPayload,
    ) -> Result<QueryResult> {
        self.execute_query(path, &create_index_sql(payload))
    }

    pub fn drop_table(&self, path: impl AsRef<Path>, table: &str) -> Result<QueryResult> {
        self.execute_query(path, &drop_table_sql(table))
    }

    pub fn drop_index(&self, path: impl AsRef<Path>, index: &str) -> Result<QueryResult> {
        self.execute_query(path, &drop_index_sql(index))
    }

    /// One page of a table's rows.
    pub fn table_data(
        &self,
        path: impl AsRef<Path>,
        table: &str,
        limit: u64,
        offset: u64,
    ) -> Result<QueryResult> {
        self.execute_query(path, &select_page_sql(table, limit, offset))
    }
}
