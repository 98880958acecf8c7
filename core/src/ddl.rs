//! Canonical DDL text generation from structured payloads.
//!
//! Every function here is pure: it builds SQL text and never touches an
//! engine. Names are always passed through [`quote_identifier`]; column types
//! and default literals are passed through verbatim and left for the engine
//! to validate.
//!
//! # Examples
//!
//! ```
//! use litestudio_core::{ColumnDefinition, CreateTablePayload, create_table_sql};
//!
//! let payload = CreateTablePayload {
//!     name: "users".into(),
//!     columns: vec![
//!         ColumnDefinition::new("id", "INTEGER").primary_key(),
//!         ColumnDefinition::new("email", "TEXT").not_null().unique(),
//!     ],
//! };
//! assert_eq!(
//!     create_table_sql(&payload),
//!     "CREATE TABLE \"users\" (\n  \"id\" INTEGER PRIMARY KEY,\n  \"email\" TEXT NOT NULL UNIQUE\n)"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the tag-driven DDL entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DdlError {
    /// The operation tag is not one of the supported operations.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The payload does not match the shape the operation expects.
    #[error("invalid payload for {operation}: {message}")]
    InvalidPayload {
        operation: DdlOperation,
        message: String,
    },
}

/// Wraps `name` in double quotes, doubling any embedded double quote.
///
/// # Examples
///
/// ```
/// use litestudio_core::quote_identifier;
///
/// assert_eq!(quote_identifier("users"), "\"users\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Supported generator operations, identified by their camelCase tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DdlOperation {
    CreateTable,
    AddColumn,
    CreateIndex,
    DropTable,
    DropIndex,
}

impl DdlOperation {
    pub const ALL: [DdlOperation; 5] = [
        Self::CreateTable,
        Self::AddColumn,
        Self::CreateIndex,
        Self::DropTable,
        Self::DropIndex,
    ];

    /// The tag this operation is addressed by.
    pub fn tag(self) -> &'static str {
        match self {
            Self::CreateTable => "createTable",
            Self::AddColumn => "addColumn",
            Self::CreateIndex => "createIndex",
            Self::DropTable => "dropTable",
            Self::DropIndex => "dropIndex",
        }
    }
}

impl fmt::Display for DdlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DdlOperation {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.tag() == s)
            .ok_or_else(|| DdlError::UnknownOperation(s.to_string()))
    }
}

/// One column of a new table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefinition {
    pub name: String,
    /// Declared type, emitted as given.
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(alias = "primaryKey")]
    pub primary_key: bool,
    #[serde(alias = "notNull")]
    pub not_null: bool,
    pub unique: bool,
    /// Default value as a SQL literal (`'x'`, `0`, `CURRENT_TIMESTAMP`).
    #[serde(alias = "defaultValue")]
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }
}

/// Payload for [`create_table_sql`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTablePayload {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

/// Column part of an [`AddColumnPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(alias = "notNull")]
    pub not_null: bool,
    #[serde(alias = "defaultValue")]
    pub default_value: Option<String>,
}

/// Payload for [`add_column_sql`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddColumnPayload {
    #[serde(alias = "tableName")]
    pub table_name: String,
    pub column: NewColumn,
}

/// Payload for [`create_index_sql`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexPayload {
    #[serde(alias = "tableName")]
    pub table_name: String,
    #[serde(alias = "indexName")]
    pub index_name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

/// A decoded generator request: an operation together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdlRequest {
    CreateTable(CreateTablePayload),
    AddColumn(AddColumnPayload),
    CreateIndex(CreateIndexPayload),
    DropTable(String),
    DropIndex(String),
}

impl DdlRequest {
    /// Decodes `payload` according to the operation named by `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnknownOperation`] for an unsupported tag and
    /// [`DdlError::InvalidPayload`] when the payload has the wrong shape.
    pub fn decode(tag: &str, payload: serde_json::Value) -> Result<Self, DdlError> {
        let operation: DdlOperation = tag.parse()?;
        let invalid = |e: serde_json::Error| DdlError::InvalidPayload {
            operation,
            message: e.to_string(),
        };
        let request = match operation {
            DdlOperation::CreateTable => {
                Self::CreateTable(serde_json::from_value(payload).map_err(invalid)?)
            }
            DdlOperation::AddColumn => {
                Self::AddColumn(serde_json::from_value(payload).map_err(invalid)?)
            }
            DdlOperation::CreateIndex => {
                Self::CreateIndex(serde_json::from_value(payload).map_err(invalid)?)
            }
            DdlOperation::DropTable => {
                Self::DropTable(serde_json::from_value(payload).map_err(invalid)?)
            }
            DdlOperation::DropIndex => {
                Self::DropIndex(serde_json::from_value(payload).map_err(invalid)?)
            }
        };
        Ok(request)
    }

    pub fn operation(&self) -> DdlOperation {
        match self {
            Self::CreateTable(_) => DdlOperation::CreateTable,
            Self::AddColumn(_) => DdlOperation::AddColumn,
            Self::CreateIndex(_) => DdlOperation::CreateIndex,
            Self::DropTable(_) => DdlOperation::DropTable,
            Self::DropIndex(_) => DdlOperation::DropIndex,
        }
    }

    /// Builds the unterminated statement for this request.
    pub fn to_sql(&self) -> String {
        match self {
            Self::CreateTable(p) => create_table_sql(p),
            Self::AddColumn(p) => add_column_sql(p),
            Self::CreateIndex(p) => create_index_sql(p),
            Self::DropTable(name) => drop_table_sql(name),
            Self::DropIndex(name) => drop_index_sql(name),
        }
    }
}

/// Generates preview text for the operation named by `tag`, terminated
/// with `;`. The text is advisory and never executed by this crate.
///
/// # Examples
///
/// ```
/// use litestudio_core::{DdlError, generate_ddl};
///
/// let sql = generate_ddl("dropTable", serde_json::json!("old")).unwrap();
/// assert_eq!(sql, "DROP TABLE IF EXISTS \"old\";");
///
/// let err = generate_ddl("renameTable", serde_json::json!("old")).unwrap_err();
/// assert!(matches!(err, DdlError::UnknownOperation(_)));
/// ```
pub fn generate_ddl(tag: &str, payload: serde_json::Value) -> Result<String, DdlError> {
    let request = DdlRequest::decode(tag, payload)?;
    Ok(format!("{};", request.to_sql()))
}

/// `CREATE TABLE` with one clause per column, in payload order.
pub fn create_table_sql(payload: &CreateTablePayload) -> String {
    let columns: Vec<String> = payload.columns.iter().map(column_clause).collect();
    format!(
        "CREATE TABLE {} (\n  {}\n)",
        quote_identifier(&payload.name),
        columns.join(",\n  ")
    )
}

/// Name, type, then `PRIMARY KEY`, `NOT NULL`, `UNIQUE`, `DEFAULT` in that order.
fn column_clause(col: &ColumnDefinition) -> String {
    let mut parts = vec![quote_identifier(&col.name)];
    push_type(&mut parts, &col.data_type);
    if col.primary_key {
        parts.push("PRIMARY KEY".to_string());
    }
    if col.not_null {
        parts.push("NOT NULL".to_string());
    }
    if col.unique {
        parts.push("UNIQUE".to_string());
    }
    if let Some(literal) = default_literal(col.default_value.as_deref()) {
        parts.push(format!("DEFAULT {literal}"));
    }
    parts.join(" ")
}

/// `ALTER TABLE ... ADD COLUMN`.
///
/// `NOT NULL DEFAULT <literal>` is emitted only when both are requested. A
/// not-null column without a default is added unconstrained: the engine
/// cannot backfill existing rows without a default, and supplying one is the
/// caller's job.
pub fn add_column_sql(payload: &AddColumnPayload) -> String {
    let column = &payload.column;
    let mut parts = vec![
        format!("ALTER TABLE {}", quote_identifier(&payload.table_name)),
        format!("ADD COLUMN {}", quote_identifier(&column.name)),
    ];
    push_type(&mut parts, &column.data_type);
    if let (true, Some(literal)) = (
        column.not_null,
        default_literal(column.default_value.as_deref()),
    ) {
        parts.push(format!("NOT NULL DEFAULT {literal}"));
    }
    parts.join(" ")
}

/// `CREATE [UNIQUE] INDEX <name> ON <table> (<columns>)`.
pub fn create_index_sql(payload: &CreateIndexPayload) -> String {
    let columns: Vec<String> = payload.columns.iter().map(|c| quote_identifier(c)).collect();
    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if payload.unique { "UNIQUE " } else { "" },
        quote_identifier(&payload.index_name),
        quote_identifier(&payload.table_name),
        columns.join(", ")
    )
}

pub fn drop_table_sql(name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(name))
}

pub fn drop_index_sql(name: &str) -> String {
    format!("DROP INDEX IF EXISTS {}", quote_identifier(name))
}

/// `SELECT * FROM <table> LIMIT <limit> OFFSET <offset>`.
pub fn select_page_sql(table: &str, limit: u64, offset: u64) -> String {
    format!(
        "SELECT * FROM {} LIMIT {limit} OFFSET {offset}",
        quote_identifier(table)
    )
}

fn push_type(parts: &mut Vec<String>, data_type: &str) {
    let data_type = data_type.trim();
    if !data_type.is_empty() {
        parts.push(data_type.to_string());
    }
}

fn default_literal(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_identifier_doubles_quotes() {
        assert_eq!(quote_identifier("t"), "\"t\"");
        assert_eq!(quote_identifier("a\"b\"c"), "\"a\"\"b\"\"c\"");
        assert_eq!(quote_identifier(""), "\"\"");
    }

    #[test]
    fn test_column_modifiers_fixed_order() {
        let col = ColumnDefinition::new("c", "TEXT")
            .with_default("'x'")
            .unique()
            .not_null()
            .primary_key();
        assert_eq!(column_clause(&col), "\"c\" TEXT PRIMARY KEY NOT NULL UNIQUE DEFAULT 'x'");
    }

    #[test]
    fn test_empty_default_and_type_are_omitted() {
        let col = ColumnDefinition::new("c", "").with_default("");
        assert_eq!(column_clause(&col), "\"c\"");
    }

    #[test]
    fn test_add_column_not_null_requires_default() {
        let mut payload = AddColumnPayload {
            table_name: "t".into(),
            column: NewColumn {
                name: "flag".into(),
                data_type: "INTEGER".into(),
                not_null: true,
                default_value: None,
            },
        };
        assert_eq!(add_column_sql(&payload), "ALTER TABLE \"t\" ADD COLUMN \"flag\" INTEGER");

        payload.column.default_value = Some("0".into());
        assert_eq!(
            add_column_sql(&payload),
            "ALTER TABLE \"t\" ADD COLUMN \"flag\" INTEGER NOT NULL DEFAULT 0"
        );

        payload.column.not_null = false;
        assert_eq!(add_column_sql(&payload), "ALTER TABLE \"t\" ADD COLUMN \"flag\" INTEGER");
    }

    #[test]
    fn test_create_index_sql() {
        let payload = CreateIndexPayload {
            table_name: "t".into(),
            index_name: "ix".into(),
            columns: vec!["a".into(), "b".into()],
            unique: true,
        };
        assert_eq!(create_index_sql(&payload), "CREATE UNIQUE INDEX \"ix\" ON \"t\" (\"a\", \"b\")");

        let plain = CreateIndexPayload { unique: false, ..payload };
        assert_eq!(create_index_sql(&plain), "CREATE INDEX \"ix\" ON \"t\" (\"a\", \"b\")");
    }

    #[test]
    fn test_drop_statements_are_idempotent_form() {
        assert_eq!(drop_table_sql("t"), "DROP TABLE IF EXISTS \"t\"");
        assert_eq!(drop_index_sql("i"), "DROP INDEX IF EXISTS \"i\"");
    }

    #[test]
    fn test_operation_tags_round_trip() {
        for op in DdlOperation::ALL {
            assert_eq!(op.tag().parse::<DdlOperation>().unwrap(), op);
        }
        assert_eq!(
            "CreateTable".parse::<DdlOperation>().unwrap_err(),
            DdlError::UnknownOperation("CreateTable".into())
        );
    }

    #[test]
    fn test_decode_accepts_camel_case_payload() {
        let request = DdlRequest::decode(
            "createTable",
            json!({
                "name": "items",
                "columns": [
                    { "name": "id", "type": "INTEGER", "primaryKey": true, "notNull": false, "unique": false, "defaultValue": null },
                    { "name": "qty", "type": "INTEGER", "notNull": true, "defaultValue": "1" }
                ]
            }),
        )
        .unwrap();
        assert_eq!(request.operation(), DdlOperation::CreateTable);
        assert_eq!(
            request.to_sql(),
            "CREATE TABLE \"items\" (\n  \"id\" INTEGER PRIMARY KEY,\n  \"qty\" INTEGER NOT NULL DEFAULT 1\n)"
        );
    }

    #[test]
    fn test_decode_rejects_wrong_payload_shape() {
        let err = DdlRequest::decode("createIndex", json!("not an object")).unwrap_err();
        assert!(matches!(
            err,
            DdlError::InvalidPayload { operation: DdlOperation::CreateIndex, .. }
        ));
    }

    #[test]
    fn test_generate_ddl_terminates_preview() {
        let sql = generate_ddl(
            "addColumn",
            json!({ "tableName": "t", "column": { "name": "c", "type": "TEXT" } }),
        )
        .unwrap();
        assert_eq!(sql, "ALTER TABLE \"t\" ADD COLUMN \"c\" TEXT;");
    }

    #[test]
    fn test_select_page_sql() {
        assert_eq!(select_page_sql("my t", 50, 100), "SELECT * FROM \"my t\" LIMIT 50 OFFSET 100");
    }
}
