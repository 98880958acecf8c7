//! SQLite session layer for litestudio.
//!
//! Owns open-database handles and runs SQL against them, turning every
//! outcome into a uniform [`QueryResult`](litestudio_core::QueryResult) and
//! rebuilding a structural [`DatabaseInfo`](litestudio_core::DatabaseInfo)
//! on demand.
//!
//! # Architecture
//!
//! - **`session`**: [`SessionRegistry`] with open/create/close, one in-memory
//!   handle per path, and whole-image export to disk
//! - **`executor`**: classify, execute, time, and shape single statements
//!   and split batches
//! - **`introspect`**: rebuild tables, columns, indexes, foreign keys, and
//!   views from the catalog
//! - **`convert`**: SQLite values to JSON row objects
//! - **`workbench`**: [`Workbench`], the facade a host talks to
//!
//! # Persistence
//!
//! The live database is held in memory. The file is rewritten on `create`,
//! on `close`, and after every successful schema-defining or mutating
//! statement. A failed write is logged through `tracing` and otherwise
//! ignored; the in-memory state stays authoritative.
//!
//! # Quick start
//!
//! ```no_run
//! use litestudio_sqlite::Workbench;
//!
//! let mut bench = Workbench::new();
//! let info = bench.open("app.db").unwrap();
//! for table in &info.tables {
//!     println!("{} ({} rows)", table.name, table.row_count);
//! }
//!
//! for result in bench.execute_batch("app.db", "SELECT 1; SELECT 2").unwrap() {
//!     println!("{} in {:.2} ms", result.kind(), result.execution_time());
//! }
//! ```

mod convert;
mod error;
mod executor;
mod introspect;
mod session;
mod workbench;

pub use error::{Result, SessionError};
pub use executor::{execute, execute_batch};
pub use introspect::introspect;
pub use session::{Session, SessionRegistry};
pub use workbench::{NO_STATEMENTS_MESSAGE, Workbench};
