//! Generate and apply `CREATE TABLE` statements from spreadsheet-like table
//! descriptions.
//!
//! `oxide-ddl` is the database-facing half of the workspace:
//!
//! - **Executor** - the [`SqlExecutor`](executor::SqlExecutor) trait and its
//!   SQLite implementation; injected wherever SQL is run
//! - **Runner** - validates, generates, orders and applies a batch
//! - **Reflect** - reads the catalog back as column descriptors
//! - **Input** - loads descriptor batches from delimited or JSON files
//!
//! Statement generation itself lives in [`oxide_ddl_core`] and never touches
//! a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_ddl::prelude::*;
//!
//! let executor = SqliteExecutor::connect("sqlite:app.db").await?;
//! let runner = DdlRunner::new(executor);
//!
//! runner
//!     .apply(&[
//!         ColumnDescriptor::new("users", "id", "INTEGER").primary_key(),
//!         ColumnDescriptor::new("users", "name", "VARCHAR"),
//!         ColumnDescriptor::new("addresses", "user_id", "INTEGER").references("users.id"),
//!     ])
//!     .await?;
//!
//! let tables = reflect_tables(runner.executor()).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the statements for a descriptor file
//! oxide-ddl generate tables.csv
//!
//! # Create the tables
//! oxide-ddl --database sqlite:app.db apply tables.csv
//!
//! # Show what the database contains
//! oxide-ddl --database sqlite:app.db inspect
//! ```

pub mod error;
pub mod executor;
pub mod input;
pub mod reflect;
pub mod runner;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::executor::{
        DatabaseError, ExecutionResult, Row, SqlExecutor, SqlValue, SqliteExecutor,
    };
    pub use crate::input::{read_batch, Batch};
    pub use crate::reflect::{reflect_table, reflect_tables};
    pub use crate::runner::{ApplyReport, BatchOutcome, DdlRunner, PlannedTable};
    pub use oxide_ddl_core::{
        format_row, generate_ddl, BoolEncoding, ColumnDescriptor, DdlGenerator, FormatMode,
        InputFormat, TableSpec, ValidationError,
    };
}
