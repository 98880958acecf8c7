use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use litestudio_core::{DatabaseInfo, OutputFormat, QueryResult, StudioConfig, TableInfo};
use litestudio_sqlite::Workbench;
use serde_json::Value;
use tracing::debug;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "litestudio")]
#[command(about = "Browse, query, and edit SQLite database files")]
#[command(version)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format (overrides the configured one).
    #[arg(long, global = true)]
    format: Option<CliOutputFormat>,
    /// Log debug diagnostics to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty database file and print its structure.
    Create(DatabaseArgs),
    /// Print the structure of a database file.
    Info(DatabaseArgs),
    /// Execute SQL statements against a database file.
    Exec(ExecArgs),
    /// Print one page of a table's rows.
    Data(DataArgs),
    /// Print the SQL generated for a DDL operation without executing it.
    Ddl(DdlArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// Path to the database file.
    database: PathBuf,
}

#[derive(Debug, Args)]
struct ExecArgs {
    /// Path to the database file.
    database: PathBuf,
    /// SQL text to execute.
    #[arg(long, conflicts_with = "file")]
    sql: Option<String>,
    /// File containing the SQL to execute. Reads stdin when neither is given.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Print only the result of the last statement.
    #[arg(long)]
    last: bool,
}

#[derive(Debug, Args)]
struct DataArgs {
    /// Path to the database file.
    database: PathBuf,
    /// Table to read.
    table: String,
    /// Maximum rows to return (default: browse.page_size from config).
    #[arg(long)]
    limit: Option<u64>,
    /// Rows to skip.
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

#[derive(Debug, Args)]
struct DdlArgs {
    /// Operation tag: createTable, addColumn, createIndex, dropTable, dropIndex.
    operation: String,
    /// Operation payload as JSON.
    #[arg(long)]
    payload: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => StudioConfig::load(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => StudioConfig::default(),
    };
    init_logging(&config, cli.verbose)?;

    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    match cli.command {
        Command::Create(args) => run_create(args, format),
        Command::Info(args) => run_info(args, format),
        Command::Exec(args) => run_exec(args, format),
        Command::Data(args) => run_data(args, &config, format),
        Command::Ddl(args) => run_ddl(args),
    }
}

fn init_logging(config: &StudioConfig, verbose: bool) -> Result<(), String> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        config.log.max_level().map_err(|e| e.to_string())?
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn run_create(args: DatabaseArgs, format: OutputFormat) -> Result<(), String> {
    let mut bench = Workbench::new();
    let info = bench
        .create(&args.database)
        .map_err(|e| format!("failed to create {}: {e}", args.database.display()))?;
    print_info(&info, format)
}

fn run_info(args: DatabaseArgs, format: OutputFormat) -> Result<(), String> {
    let mut bench = Workbench::new();
    let info = bench
        .open(&args.database)
        .map_err(|e| format!("failed to open {}: {e}", args.database.display()))?;
    print_info(&info, format)
}

fn run_exec(args: ExecArgs, format: OutputFormat) -> Result<(), String> {
    let sql = match (args.sql, &args.file) {
        (Some(sql), _) => sql,
        (None, Some(file)) => fs::read_to_string(file)
            .map_err(|e| format!("failed to read {}: {e}", file.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buffer
        }
    };

    let mut bench = Workbench::new();
    bench
        .open(&args.database)
        .map_err(|e| format!("failed to open {}: {e}", args.database.display()))?;

    if args.last {
        let result = bench.run_buffer(&args.database, &sql).map_err(|e| e.to_string())?;
        return print_results(std::slice::from_ref(&result), false, format);
    }

    let results = bench
        .execute_batch(&args.database, &sql)
        .map_err(|e| e.to_string())?;
    debug!(statements = results.len(), "batch finished");
    print_results(&results, true, format)
}

fn run_data(args: DataArgs, config: &StudioConfig, format: OutputFormat) -> Result<(), String> {
    let limit = args.limit.unwrap_or(config.browse.page_size);

    let mut bench = Workbench::new();
    bench
        .open(&args.database)
        .map_err(|e| format!("failed to open {}: {e}", args.database.display()))?;
    let result = bench
        .table_data(&args.database, &args.table, limit, args.offset)
        .map_err(|e| e.to_string())?;
    print_results(std::slice::from_ref(&result), false, format)
}

fn run_ddl(args: DdlArgs) -> Result<(), String> {
    let payload: Value = serde_json::from_str(&args.payload)
        .map_err(|e| format!("invalid --payload JSON: {e}"))?;
    let sql = litestudio_core::generate_ddl(&args.operation, payload).map_err(|e| e.to_string())?;
    println!("{sql}");
    Ok(())
}

fn print_info(info: &DatabaseInfo, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Json => print_json(info),
        OutputFormat::Table => {
            print!("{}", render_info(info));
            Ok(())
        }
    }
}

/// Prints results as a JSON array (`as_list`) or a single object, or as text
/// blocks separated by blank lines.
fn print_results(results: &[QueryResult], as_list: bool, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Json if as_list => print_json(results),
        OutputFormat::Json => match results.first() {
            Some(result) => print_json(result),
            None => Ok(()),
        },
        OutputFormat::Table => {
            let blocks: Vec<String> = results.iter().map(render_result).collect();
            print!("{}", blocks.join("\n"));
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn render_info(info: &DatabaseInfo) -> String {
    let mut out = format!("{} ({} bytes)\n", info.path, info.size);
    if info.tables.is_empty() && info.views.is_empty() {
        out.push_str("  (empty)\n");
    }
    for table in &info.tables {
        out.push_str(&render_table(table));
    }
    for view in &info.views {
        out.push_str(&format!("\nview {}\n", view.name));
        if let Some(sql) = &view.sql {
            out.push_str(&format!("  {sql}\n"));
        }
    }
    out
}

fn render_table(table: &TableInfo) -> String {
    let mut out = format!("\ntable {} ({} rows)\n", table.name, table.row_count);
    for column in &table.columns {
        let mut line = format!("  {} {}", column.name, column.data_type);
        if column.primary_key {
            line.push_str(" PRIMARY KEY");
        }
        if column.not_null {
            line.push_str(" NOT NULL");
        }
        if column.unique {
            line.push_str(" UNIQUE");
        }
        if let Some(default) = &column.default_value {
            line.push_str(&format!(" DEFAULT {default}"));
        }
        out.push_str(&line);
        out.push('\n');
    }
    for index in &table.indexes {
        let kind = if index.unique { "unique index" } else { "index" };
        out.push_str(&format!("  {kind} {} ({})\n", index.name, index.columns.join(", ")));
    }
    for fk in &table.foreign_keys {
        out.push_str(&format!(
            "  foreign key {} -> {}({}) on update {} on delete {}\n",
            fk.from,
            fk.table,
            fk.to.as_deref().unwrap_or("?"),
            fk.on_update,
            fk.on_delete
        ));
    }
    out
}

fn render_result(result: &QueryResult) -> String {
    let elapsed = result.execution_time();
    match result {
        QueryResult::Select { columns, rows, .. } => {
            let mut out = render_grid(columns, rows);
            out.push_str(&format!("({} rows, {elapsed:.2} ms)\n", rows.len()));
            out
        }
        QueryResult::Mutation { affected_rows, .. } => {
            format!("{affected_rows} rows affected ({elapsed:.2} ms)\n")
        }
        QueryResult::Ddl { .. } => format!("OK ({elapsed:.2} ms)\n"),
        QueryResult::Error { error, .. } => format!("error: {error} ({elapsed:.2} ms)\n"),
    }
}

/// Left-aligned text grid with a header rule.
fn render_grid(columns: &[String], rows: &[litestudio_core::Row]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).map_or_else(String::new, render_cell))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |values: &[String]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = format_line(columns);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("-+-")));
    for line in &cells {
        out.push_str(&format_line(line.as_slice()));
    }
    out
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litestudio_core::Row;

    #[test]
    fn render_grid_pads_columns() {
        let columns = vec!["id".to_string(), "label".to_string()];
        let mut row = Row::new();
        row.insert("id".into(), Value::from(1));
        row.insert("label".into(), Value::Null);
        let grid = render_grid(&columns, &[row]);
        assert_eq!(grid, "id | label\n---+------\n1  | NULL\n");
    }

    #[test]
    fn render_grid_empty_columns_is_blank() {
        assert_eq!(render_grid(&[], &[]), "");
    }

    #[test]
    fn render_result_variants() {
        let mutation = QueryResult::Mutation {
            affected_rows: 3,
            execution_time: 1.0,
        };
        assert_eq!(render_result(&mutation), "3 rows affected (1.00 ms)\n");

        let error = QueryResult::Error {
            error: "no such table: t".into(),
            execution_time: 0.5,
        };
        assert_eq!(render_result(&error), "error: no such table: t (0.50 ms)\n");
    }

    #[test]
    fn cli_format_maps_to_output_format() {
        assert_eq!(OutputFormat::from(CliOutputFormat::Table), OutputFormat::Table);
        assert_eq!(OutputFormat::from(CliOutputFormat::Json), OutputFormat::Json);
    }
}
