//! Statement execution and result shaping.
//!
//! Every failure raised by the engine while running caller-supplied SQL is
//! folded into [`QueryResult::Error`]; nothing here returns `Err`. That lets
//! a batch keep reporting one result per statement after an earlier one
//! fails.

use std::time::Instant;

use litestudio_core::{QueryResult, StatementKind, classify_statement, split_statements};
use rusqlite::Connection;
use tracing::debug;

use crate::convert::row_to_object;
use crate::session::Session;

/// Executes one statement against `session`.
///
/// Read-only text returns its first result set; when it holds several
/// statements, all of them run. Schema-defining and mutating statements run
/// for effect and are followed by an export of the session image; mutating
/// statements also report the engine's change count.
///
/// The elapsed time covers classification, execution, and the export, and
/// is measured up to the point of failure for [`QueryResult::Error`].
pub fn execute(session: &Session, statement: &str) -> QueryResult {
    let start = Instant::now();
    let statement = statement.trim();
    let kind = classify_statement(statement);

    let outcome = match kind {
        StatementKind::ReadOnly => run_query(session.connection(), statement),
        StatementKind::SchemaDefining => session
            .connection()
            .execute_batch(statement)
            .map(|()| Shape::Ddl),
        StatementKind::Mutating => run_mutation(session.connection(), statement),
    };
    if outcome.is_ok() && kind.persists() {
        session.persist();
    }

    let execution_time = elapsed_ms(start);
    let result = match outcome {
        Ok(Shape::Select { columns, rows }) => QueryResult::Select {
            columns,
            rows,
            execution_time,
        },
        Ok(Shape::Mutation { affected_rows }) => QueryResult::Mutation {
            affected_rows,
            execution_time,
        },
        Ok(Shape::Ddl) => QueryResult::Ddl { execution_time },
        Err(err) => QueryResult::Error {
            error: err.to_string(),
            execution_time,
        },
    };
    debug!(
        kind = ?kind,
        result = result.kind(),
        elapsed_ms = execution_time,
        "executed statement"
    );
    result
}

/// Splits `sql` and executes each statement in order.
///
/// Statement `k + 1` starts only after statement `k`, including its export,
/// has finished, so later statements observe earlier effects. A failing
/// statement yields an error entry and execution continues.
pub fn execute_batch(session: &Session, sql: &str) -> Vec<QueryResult> {
    split_statements(sql)
        .iter()
        .map(|statement| execute(session, statement))
        .collect()
}

/// Successful outcome before timing is attached.
enum Shape {
    Select {
        columns: Vec<String>,
        rows: Vec<litestudio_core::Row>,
    },
    Mutation {
        affected_rows: u64,
    },
    Ddl,
}

/// Runs every statement in `text` and keeps the first result set.
///
/// Statements that yield no rows produce no result set, so a buffer whose
/// statements all come back empty is an empty select.
fn run_query(conn: &Connection, text: &str) -> rusqlite::Result<Shape> {
    let mut first = None;
    for statement in split_statements(text) {
        let (columns, rows) = query_rows(conn, &statement)?;
        if first.is_none() && !rows.is_empty() {
            first = Some(Shape::Select { columns, rows });
        }
    }
    // An empty result keeps no column names; see DESIGN.md, decision 2.
    Ok(first.unwrap_or(Shape::Select {
        columns: Vec::new(),
        rows: Vec::new(),
    }))
}

fn query_rows(
    conn: &Connection,
    statement: &str,
) -> rusqlite::Result<(Vec<String>, Vec<litestudio_core::Row>)> {
    let mut stmt = conn.prepare(statement)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        rows.push(row_to_object(&columns, row)?);
    }
    Ok((columns, rows))
}

fn run_mutation(conn: &Connection, statement: &str) -> rusqlite::Result<Shape> {
    conn.execute_batch(statement)?;
    let affected_rows = conn
        .query_row("SELECT changes()", [], |row| row.get::<_, i64>(0))
        .map_or(0, |n| n.max(0) as u64);
    Ok(Shape::Mutation { affected_rows })
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
