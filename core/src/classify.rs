//! Coarse statement classification by leading keyword.
//!
//! The kind decides how a statement is executed and shaped, and whether the
//! session image is exported to disk afterwards.

use serde::{Deserialize, Serialize};

/// What a statement does to the database, judged from its first keyword.
///
/// # Examples
///
/// ```
/// use litestudio_core::{StatementKind, classify_statement};
///
/// assert_eq!(classify_statement("  select * from t"), StatementKind::ReadOnly);
/// assert_eq!(classify_statement("DROP TABLE t"), StatementKind::SchemaDefining);
/// assert_eq!(classify_statement("insert into t values (1)"), StatementKind::Mutating);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// `SELECT`, `PRAGMA`, `EXPLAIN`: produces rows, changes nothing.
    ReadOnly,
    /// `CREATE`, `ALTER`, `DROP`: changes the schema.
    SchemaDefining,
    /// Everything else, e.g. `INSERT`, `UPDATE`, `DELETE`.
    Mutating,
}

impl StatementKind {
    /// Whether executing a statement of this kind must be followed by an
    /// export of the in-memory image.
    pub fn persists(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

const READ_ONLY_KEYWORDS: &[&str] = &["SELECT", "PRAGMA", "EXPLAIN"];
const SCHEMA_KEYWORDS: &[&str] = &["CREATE", "ALTER", "DROP"];

/// Classifies `statement` by its leading keyword, case-insensitively and
/// ignoring leading whitespace.
///
/// Matching is by prefix, so `SELECTED` counts as `SELECT`; the engine will
/// reject such text anyway.
pub fn classify_statement(statement: &str) -> StatementKind {
    let trimmed = statement.trim_start();
    if READ_ONLY_KEYWORDS.iter().any(|kw| starts_with_keyword(trimmed, kw)) {
        StatementKind::ReadOnly
    } else if SCHEMA_KEYWORDS.iter().any(|kw| starts_with_keyword(trimmed, kw)) {
        StatementKind::SchemaDefining
    } else {
        StatementKind::Mutating
    }
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_keywords() {
        assert_eq!(classify_statement("  select * from t"), StatementKind::ReadOnly);
        assert_eq!(classify_statement("PRAGMA table_info(t)"), StatementKind::ReadOnly);
        assert_eq!(classify_statement("explain query plan select 1"), StatementKind::ReadOnly);
    }

    #[test]
    fn test_schema_keywords() {
        assert_eq!(classify_statement("DROP TABLE t"), StatementKind::SchemaDefining);
        assert_eq!(classify_statement("create index i on t(a)"), StatementKind::SchemaDefining);
        assert_eq!(classify_statement("\n\tAlter table t add column b"), StatementKind::SchemaDefining);
    }

    #[test]
    fn test_everything_else_is_mutating() {
        assert_eq!(classify_statement("insert into t values (1)"), StatementKind::Mutating);
        assert_eq!(classify_statement("UPDATE t SET a = 1"), StatementKind::Mutating);
        assert_eq!(classify_statement("delete from t"), StatementKind::Mutating);
        assert_eq!(classify_statement("WITH x AS (SELECT 1) SELECT * FROM x"), StatementKind::Mutating);
        assert_eq!(classify_statement(""), StatementKind::Mutating);
    }

    #[test]
    fn test_multibyte_prefix_does_not_panic() {
        assert_eq!(classify_statement("éé"), StatementKind::Mutating);
        assert_eq!(classify_statement("sélect"), StatementKind::Mutating);
    }

    #[test]
    fn test_persists() {
        assert!(!StatementKind::ReadOnly.persists());
        assert!(StatementKind::SchemaDefining.persists());
        assert!(StatementKind::Mutating.persists());
    }
}
