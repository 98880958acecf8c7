//! Engine-independent building blocks for browsing and editing SQLite files.
//!
//! This crate knows nothing about a live database. It provides:
//!
//! - the snapshot model ([`DatabaseInfo`], [`TableInfo`], [`ColumnInfo`],
//!   [`IndexInfo`], [`ForeignKeyInfo`], [`ViewInfo`]) and the per-statement
//!   outcome [`QueryResult`];
//! - [`split_statements`], a quote- and comment-aware splitter that turns an
//!   editor buffer into an ordered statement batch;
//! - [`classify_statement`], which tags a statement as read-only,
//!   schema-defining, or mutating from its leading keyword;
//! - the DDL generator ([`create_table_sql`], [`add_column_sql`],
//!   [`create_index_sql`], [`drop_table_sql`], [`drop_index_sql`], and the
//!   tag-driven [`generate_ddl`]) built on [`quote_identifier`];
//! - [`StudioConfig`], the YAML host configuration.
//!
//! The engine-bound session layer lives in `litestudio-sqlite`.
//!
//! # Example
//!
//! ```
//! use litestudio_core::*;
//!
//! let buffer = "CREATE TABLE t (x); INSERT INTO t VALUES ('a;b'); SELECT * FROM t";
//! let kinds: Vec<StatementKind> = split_statements(buffer)
//!     .iter()
//!     .map(|s| classify_statement(s))
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [StatementKind::SchemaDefining, StatementKind::Mutating, StatementKind::ReadOnly]
//! );
//! ```

mod classify;
mod config;
mod ddl;
mod split;
mod types;

pub use classify::{StatementKind, classify_statement};
pub use config::{BrowseConfig, ConfigError, LogConfig, OutputConfig, OutputFormat, StudioConfig};
pub use ddl::{
    AddColumnPayload, ColumnDefinition, CreateIndexPayload, CreateTablePayload, DdlError,
    DdlOperation, DdlRequest, NewColumn, add_column_sql, create_index_sql, create_table_sql,
    drop_index_sql, drop_table_sql, generate_ddl, quote_identifier, select_page_sql,
};
pub use split::split_statements;
pub use types::*;
