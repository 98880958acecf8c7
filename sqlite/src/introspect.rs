//! Schema introspection through the engine's catalog and PRAGMA queries.
//!
//! [`introspect`] always rebuilds the whole [`DatabaseInfo`]; nothing is
//! cached or patched incrementally. Catalog failures are not contained here:
//! they propagate to the caller, and the session stays open regardless.

use std::collections::HashSet;

use litestudio_core::{
    ColumnInfo, DatabaseInfo, ForeignKeyInfo, IndexInfo, TableInfo, ViewInfo, basename,
    quote_identifier,
};
use rusqlite::Connection;

use crate::error::Result;
use crate::session::Session;

/// Declared type reported for columns declared without one.
const DEFAULT_COLUMN_TYPE: &str = "TEXT";

/// Builds a complete structural snapshot of `session`.
pub fn introspect(session: &Session) -> Result<DatabaseInfo> {
    let conn = session.connection();
    let path = session.path().to_string_lossy().into_owned();

    let tables = table_names(conn)?
        .into_iter()
        .map(|name| load_table(conn, name))
        .collect::<Result<Vec<_>>>()?;
    let views = load_views(conn)?;

    // The file may not exist yet for a session that has never been flushed.
    let size = std::fs::metadata(session.path()).map_or(0, |m| m.len());

    Ok(DatabaseInfo {
        name: basename(&path),
        path,
        size,
        tables,
        views,
    })
}

/// User table names in alphabetical order, excluding `sqlite_` internals.
fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

fn load_table(conn: &Connection, name: String) -> Result<TableInfo> {
    let index_list = index_list(conn, &name)?;

    // A column is unique when some unique index has it as its only key.
    let mut unique_columns = HashSet::new();
    for (index_name, unique) in &index_list {
        if *unique {
            if let [Some(only)] = index_keys(conn, index_name)?.as_slice() {
                unique_columns.insert(only.clone());
            }
        }
    }

    let columns = load_columns(conn, &name, &unique_columns)?;

    let mut indexes = Vec::new();
    for (index_name, unique) in index_list {
        if index_name.starts_with("sqlite_") {
            continue;
        }
        let columns = index_keys(conn, &index_name)?.into_iter().flatten().collect();
        indexes.push(IndexInfo {
            name: index_name,
            unique,
            columns,
        });
    }

    let foreign_keys = load_foreign_keys(conn, &name)?;
    let row_count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(&name)),
        [],
        |row| row.get(0),
    )?;

    Ok(TableInfo {
        name,
        columns,
        indexes,
        foreign_keys,
        row_count: row_count.max(0) as u64,
    })
}

fn load_columns(
    conn: &Connection,
    table: &str,
    unique_columns: &HashSet<String>,
) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get("name")?;
            let data_type: String = row.get::<_, Option<String>>("type")?.unwrap_or_default();
            Ok(ColumnInfo {
                cid: row.get("cid")?,
                unique: unique_columns.contains(&name),
                name,
                data_type: if data_type.is_empty() {
                    DEFAULT_COLUMN_TYPE.to_string()
                } else {
                    data_type
                },
                not_null: row.get::<_, i64>("notnull")? == 1,
                default_value: row.get("dflt_value")?,
                primary_key: row.get::<_, i64>("pk")? > 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// `(name, unique)` for every index on `table`, in engine order.
fn index_list(conn: &Connection, table: &str) -> Result<Vec<(String, bool)>> {
    let mut stmt = conn.prepare(&format!("PRAGMA index_list({})", quote_identifier(table)))?;
    let indexes = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>("name")?, row.get::<_, i64>("unique")? == 1))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(indexes)
}

/// Every key of an index in order. Expression keys have no column name.
fn index_keys(conn: &Connection, index: &str) -> Result<Vec<Option<String>>> {
    let mut stmt = conn.prepare(&format!("PRAGMA index_info({})", quote_identifier(index)))?;
    let keys = stmt
        .query_map([], |row| row.get::<_, Option<String>>("name"))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(keys)
}

fn load_foreign_keys(conn: &Connection, table: &str) -> Result<Vec<ForeignKeyInfo>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_identifier(table)
    ))?;
    let keys = stmt
        .query_map([], |row| {
            Ok(ForeignKeyInfo {
                id: row.get("id")?,
                seq: row.get("seq")?,
                table: row.get("table")?,
                from: row.get("from")?,
                to: row.get("to")?,
                on_update: row.get("on_update")?,
                on_delete: row.get("on_delete")?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(keys)
}

fn load_views(conn: &Connection) -> Result<Vec<ViewInfo>> {
    let mut stmt =
        conn.prepare("SELECT name, sql FROM sqlite_master WHERE type = 'view' ORDER BY name")?;
    let views = stmt
        .query_map([], |row| {
            Ok(ViewInfo {
                name: row.get(0)?,
                sql: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn_with(sql: &str) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(sql).unwrap();
        conn
    }

    #[test]
    fn test_table_names_sorted_and_filtered() {
        let conn = conn_with(
            "CREATE TABLE zebra (x); CREATE TABLE apple (id INTEGER PRIMARY KEY AUTOINCREMENT);",
        );
        // AUTOINCREMENT creates sqlite_sequence, which must not be listed.
        assert_eq!(table_names(&conn).unwrap(), ["apple", "zebra"]);
    }

    #[test]
    fn test_untyped_column_reports_text() {
        let conn = conn_with("CREATE TABLE t (loose, typed INTEGER NOT NULL DEFAULT 5)");
        let columns = load_columns(&conn, "t", &HashSet::new()).unwrap();
        assert_eq!(columns[0].data_type, "TEXT");
        assert!(!columns[0].not_null);
        assert_eq!(columns[0].default_value, None);
        assert_eq!(columns[1].cid, 1);
        assert_eq!(columns[1].data_type, "INTEGER");
        assert!(columns[1].not_null);
        assert_eq!(columns[1].default_value.as_deref(), Some("5"));
    }

    #[test]
    fn test_unique_constraint_marks_column_but_hides_autoindex() {
        let conn = conn_with("CREATE TABLE t (id INTEGER PRIMARY KEY, email TEXT UNIQUE)");
        let table = load_table(&conn, "t".to_string()).unwrap();
        assert!(table.find_column("email").unwrap().unique);
        assert!(table.find_column("id").unwrap().primary_key);
        assert!(table.indexes.is_empty());
    }

    #[test]
    fn test_expression_index_keys_have_no_name() {
        let conn = conn_with("CREATE TABLE t (a TEXT); CREATE INDEX ix ON t (lower(a), a)");
        assert_eq!(index_keys(&conn, "ix").unwrap(), [None, Some("a".to_string())]);

        let table = load_table(&conn, "t".to_string()).unwrap();
        assert_eq!(table.indexes[0].columns, ["a"]);
    }

    #[test]
    fn test_unique_expression_plus_column_index_is_not_column_unique() {
        let conn = conn_with("CREATE TABLE t (a TEXT); CREATE UNIQUE INDEX ux ON t (lower(a), a)");
        let table = load_table(&conn, "t".to_string()).unwrap();
        assert!(!table.find_column("a").unwrap().unique);
        assert!(table.indexes[0].unique);
        assert_eq!(table.indexes[0].columns, ["a"]);
    }

    #[test]
    fn test_quoted_table_names_are_escaped() {
        let conn = conn_with(r#"CREATE TABLE "we""ird" (x); INSERT INTO "we""ird" VALUES (1), (2);"#);
        let table = load_table(&conn, "we\"ird".to_string()).unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.column_names(), ["x"]);
    }
}
