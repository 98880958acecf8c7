//! Value types describing an open database and the outcome of a statement.
//!
//! Everything here is a detached snapshot: nothing holds a reference back to
//! a live engine handle, so a [`DatabaseInfo`] goes stale the moment the
//! underlying data changes and must be rebuilt by the caller.

use serde::{Deserialize, Serialize};

/// A single result row keyed by column name, in column order.
///
/// When a query repeats a column name the key keeps its first position and
/// holds the last value written for it.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Structural snapshot of one open database file.
///
/// # Examples
///
/// ```
/// use litestudio_core::DatabaseInfo;
///
/// let info = DatabaseInfo::empty("/tmp/shop.db");
/// assert_eq!(info.name, "shop.db");
/// assert_eq!(info.size, 0);
/// assert!(info.tables.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Path the session was opened or created with.
    pub path: String,
    /// Final path component of [`path`](Self::path).
    pub name: String,
    /// Size of the on-disk image in bytes, `0` if the file does not exist yet.
    pub size: u64,
    /// User tables, alphabetically by name.
    pub tables: Vec<TableInfo>,
    /// Views, alphabetically by name.
    pub views: Vec<ViewInfo>,
}

impl DatabaseInfo {
    /// Creates a snapshot with no tables or views and a size of zero.
    pub fn empty(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = basename(&path);
        Self {
            path,
            name,
            size: 0,
            tables: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Looks up a table by exact name.
    pub fn find_table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Looks up a view by exact name.
    pub fn find_view(&self, name: &str) -> Option<&ViewInfo> {
        self.views.iter().find(|v| v.name == name)
    }
}

/// Returns the final component of a `/` or `\` separated path.
pub fn basename(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Structure and size of one user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnInfo>,
    /// Named indexes; engine-generated constraint indexes are left out.
    pub indexes: Vec<IndexInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
    pub row_count: u64,
}

impl TableInfo {
    /// Looks up a column by exact name.
    pub fn find_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// One column of a table as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Zero-based declaration position.
    pub cid: i64,
    pub name: String,
    /// Declared type, `"TEXT"` when the declaration carries none.
    #[serde(rename = "type")]
    pub data_type: String,
    pub not_null: bool,
    /// Default value as the literal SQL text of the declaration.
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
    /// Whether a unique index covers exactly this one column.
    pub unique: bool,
}

/// A named index on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub unique: bool,
    /// Indexed column names in key order.
    pub columns: Vec<String>,
}

/// One column mapping of a foreign-key constraint.
///
/// Mirrors the engine's `foreign_key_list` catalog row; a multi-column
/// constraint shows up as several entries sharing an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Constraint identifier within the table.
    pub id: i64,
    /// Position of this mapping within the constraint.
    pub seq: i64,
    /// Referenced (parent) table.
    pub table: String,
    /// Local (child) column.
    pub from: String,
    /// Referenced column; `None` when the constraint targets the parent's
    /// primary key implicitly.
    pub to: Option<String>,
    pub on_update: String,
    pub on_delete: String,
}

/// A view and the SQL that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub name: String,
    pub sql: Option<String>,
}

/// Outcome of executing one statement.
///
/// Exactly one shape is produced per statement and every shape carries the
/// elapsed wall time in milliseconds, including failures.
///
/// # Examples
///
/// ```
/// use litestudio_core::QueryResult;
///
/// let result = QueryResult::Mutation { affected_rows: 3, execution_time: 0.4 };
/// assert!(!result.is_error());
/// assert_eq!(result.execution_time(), 0.4);
///
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["type"], "mutation");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryResult {
    /// Rows produced by a read-only statement.
    Select {
        columns: Vec<String>,
        rows: Vec<Row>,
        execution_time: f64,
    },
    /// Rows changed by a data-modifying statement.
    Mutation {
        affected_rows: u64,
        execution_time: f64,
    },
    /// A schema-defining statement completed.
    Ddl { execution_time: f64 },
    /// The engine rejected the statement.
    Error { error: String, execution_time: f64 },
}

impl QueryResult {
    /// Builds an empty [`Select`](Self::Select) result.
    pub fn empty_select(execution_time: f64) -> Self {
        Self::Select {
            columns: Vec::new(),
            rows: Vec::new(),
            execution_time,
        }
    }

    /// Elapsed time in milliseconds.
    pub fn execution_time(&self) -> f64 {
        match self {
            Self::Select { execution_time, .. }
            | Self::Mutation { execution_time, .. }
            | Self::Ddl { execution_time }
            | Self::Error { execution_time, .. } => *execution_time,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The engine's message for an [`Error`](Self::Error) result.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Mutation { .. } => "mutation",
            Self::Ddl { .. } => "ddl",
            Self::Error { .. } => "error",
        }
    }
}
