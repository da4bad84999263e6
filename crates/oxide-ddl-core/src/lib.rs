//! # oxide-ddl-core
//!
//! Validated `CREATE TABLE` generation from spreadsheet-like table
//! descriptions.
//!
//! Each input row is a [`ColumnDescriptor`]: table name, column name,
//! primary-key flag, type name, not-null flag. Rows are grouped per table in
//! first-appearance order and rendered into one statement per table:
//!
//! ```rust
//! use oxide_ddl_core::{read_delimited, DdlGenerator, FormatMode, InputFormat};
//!
//! let text = "test,column1,TRUE,SERIAL,TRUE\n\
//!             test,column2,FALSE,INTEGER,TRUE\n\
//!             test,column3,FALSE,VARCHAR,FALSE";
//!
//! let descriptors = read_delimited(text, &InputFormat::new()).unwrap();
//! let ddl = DdlGenerator::new()
//!     .mode(FormatMode::Legacy)
//!     .generate(&descriptors)
//!     .unwrap();
//!
//! assert_eq!(
//!     ddl[0],
//!     "CREATE TABLE test(column1 SERIAL PRIMARY KEY NOT NULL,column2 INTEGER NOT NULL,column3 VARCHAR )"
//! );
//! ```
//!
//! Generation is pure: nothing here touches a database. Invalid input is
//! rejected as a whole with a [`ValidationError`] before any statement is
//! produced.

pub mod descriptor;
pub mod error;
pub mod flags;
pub mod generator;
pub mod ordering;
pub mod reader;
pub mod table;
pub mod validate;

pub use descriptor::{ColumnDescriptor, ForeignKeyRef};
pub use error::{Result, ValidationError};
pub use flags::BoolEncoding;
pub use generator::{generate_ddl, ColumnClause, CreateTable, DdlGenerator, FormatMode};
pub use ordering::order_for_creation;
pub use reader::{format_row, read_delimited, read_json, InputFormat};
pub use table::{group_by_table, TableSpec};
pub use validate::validate;
