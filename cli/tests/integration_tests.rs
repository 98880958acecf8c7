use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn litestudio(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_litestudio"))
        .args(args)
        .output()
        .expect("failed to run litestudio")
}

fn litestudio_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_litestudio"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn litestudio");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for litestudio")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

/// Creates `name` in `dir` with a small seeded table.
fn seeded_db(dir: &Path, name: &str) -> std::path::PathBuf {
    let db = dir.join(name);
    let out = litestudio(&["create", path_str(&db)]);
    assert!(out.status.success());
    let out = litestudio(&[
        "exec",
        path_str(&db),
        "--sql",
        "CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT NOT NULL);
         INSERT INTO items (label) VALUES ('a'), ('b'), ('c');",
    ]);
    assert!(out.status.success());
    db
}

// ---------------------------------------------------------------------------
// create / info
// ---------------------------------------------------------------------------

#[test]
fn create_writes_file_and_prints_info() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fresh.db");

    let info = stdout_json(&litestudio(&["create", path_str(&db)]));

    assert!(db.exists());
    assert_eq!(info["name"], "fresh.db");
    assert_eq!(info["tables"], serde_json::json!([]));
    assert_eq!(info["views"], serde_json::json!([]));
}

#[test]
fn info_on_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = litestudio(&["info", path_str(&dir.path().join("absent.db"))]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn info_reports_tables_and_columns() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "info.db");

    let info = stdout_json(&litestudio(&["info", path_str(&db)]));
    let table = &info["tables"][0];
    assert_eq!(table["name"], "items");
    assert_eq!(table["row_count"], 3);
    assert_eq!(table["columns"][0]["name"], "id");
    assert_eq!(table["columns"][0]["primary_key"], true);
    assert_eq!(table["columns"][1]["type"], "TEXT");
    assert_eq!(table["columns"][1]["not_null"], true);
}

#[test]
fn info_table_format() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "table.db");

    let out = litestudio(&["info", path_str(&db), "--format", "table"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("table items (3 rows)"), "stdout: {stdout}");
    assert!(stdout.contains("label TEXT NOT NULL"), "stdout: {stdout}");
}

// ---------------------------------------------------------------------------
// exec
// ---------------------------------------------------------------------------

#[test]
fn exec_prints_one_result_per_statement() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "exec.db");

    let results = stdout_json(&litestudio(&[
        "exec",
        path_str(&db),
        "--sql",
        "UPDATE items SET label = 'z' WHERE id > 1; SELECT label FROM items ORDER BY id; SELECT * FROM nope",
    ]));

    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["type"], "mutation");
    assert_eq!(results[0]["affected_rows"], 2);
    assert_eq!(results[1]["type"], "select");
    assert_eq!(results[1]["columns"], serde_json::json!(["label"]));
    assert_eq!(results[1]["rows"][2]["label"], "z");
    // Engine errors are results, not process failures.
    assert_eq!(results[2]["type"], "error");
    assert!(results[2]["error"].as_str().unwrap().contains("nope"));
}

#[test]
fn exec_last_prints_current_result() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "last.db");

    let result = stdout_json(&litestudio(&[
        "exec",
        path_str(&db),
        "--last",
        "--sql",
        "DELETE FROM items WHERE id = 1; SELECT COUNT(*) AS n FROM items",
    ]));
    assert_eq!(result["type"], "select");
    assert_eq!(result["rows"][0]["n"], 2);

    let empty = stdout_json(&litestudio(&["exec", path_str(&db), "--last", "--sql", " ; "]));
    assert_eq!(empty["type"], "error");
    assert_eq!(empty["error"], "No statements to execute");
}

#[test]
fn exec_reads_file_and_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "sources.db");

    let script = dir.path().join("script.sql");
    fs::write(&script, "-- add one\nINSERT INTO items (label) VALUES ('d');\n").unwrap();
    let from_file = stdout_json(&litestudio(&[
        "exec",
        path_str(&db),
        "--file",
        path_str(&script),
    ]));
    assert_eq!(from_file[0]["affected_rows"], 1);

    let from_stdin = stdout_json(&litestudio_with_stdin(
        &["exec", path_str(&db)],
        "SELECT COUNT(*) AS n FROM items;",
    ));
    assert_eq!(from_stdin[0]["rows"][0]["n"], 4);
}

#[test]
fn exec_changes_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "persist.db");

    let out = litestudio(&["exec", path_str(&db), "--sql", "CREATE VIEW labels AS SELECT label FROM items"]);
    assert!(out.status.success());

    let info = stdout_json(&litestudio(&["info", path_str(&db)]));
    assert_eq!(info["views"][0]["name"], "labels");
}

// ---------------------------------------------------------------------------
// data
// ---------------------------------------------------------------------------

#[test]
fn data_paginates_with_limit_and_offset() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "data.db");

    let page = stdout_json(&litestudio(&[
        "data",
        path_str(&db),
        "items",
        "--limit",
        "1",
        "--offset",
        "1",
    ]));
    assert_eq!(page["type"], "select");
    assert_eq!(page["rows"].as_array().unwrap().len(), 1);
    assert_eq!(page["rows"][0]["label"], "b");
}

#[test]
fn data_uses_configured_page_size() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(dir.path(), "config.db");
    let config = dir.path().join("litestudio.yaml");
    fs::write(&config, "version: \"1.0\"\nbrowse:\n  page_size: 2\n").unwrap();

    let page = stdout_json(&litestudio(&[
        "--config",
        path_str(&config),
        "data",
        path_str(&db),
        "items",
    ]));
    assert_eq!(page["rows"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "browse:\n  page_size: 0\n").unwrap();

    let out = litestudio(&["--config", path_str(&config), "ddl", "dropTable", "--payload", "\"t\""]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("page_size"));
}

// ---------------------------------------------------------------------------
// ddl
// ---------------------------------------------------------------------------

#[test]
fn ddl_prints_create_table_preview() {
    let payload = r#"{"name":"users","columns":[
        {"name":"id","type":"INTEGER","primaryKey":true},
        {"name":"email","type":"TEXT","notNull":true,"unique":true}
    ]}"#;
    let out = litestudio(&["ddl", "createTable", "--payload", payload]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("CREATE TABLE \"users\" ("), "stdout: {stdout}");
    assert!(stdout.contains("\"id\" INTEGER PRIMARY KEY"), "stdout: {stdout}");
    assert!(stdout.contains("\"email\" TEXT NOT NULL UNIQUE"), "stdout: {stdout}");
    assert!(stdout.trim_end().ends_with(");"), "stdout: {stdout}");
}

#[test]
fn ddl_unknown_operation_fails() {
    let out = litestudio(&["ddl", "renameTable", "--payload", "\"t\""]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("renameTable"));
}
