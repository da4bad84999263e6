//! `CREATE TABLE` generation.
//!
//! Statements are assembled from structured column clauses and joined at the
//! end, never spliced piecemeal:
//!
//! ```text
//! CREATE TABLE <name>(<col> <type>[ PRIMARY KEY][ NOT NULL][ REFERENCES t(c)][,...])
//! ```
//!
//! No terminator and no trailing newline are emitted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ColumnDescriptor, ForeignKeyRef};
use crate::error::Result;
use crate::table::{group_by_table, TableSpec};
use crate::validate::validate;

/// Output formatting flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatMode {
    /// Column clauses joined with `,`, closed directly by `)`.
    #[default]
    Standard,
    /// Like `Standard`, with one space before the closing `)`.
    ///
    /// Kept for byte-for-byte compatibility with existing expected output.
    Legacy,
}

/// One column clause of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClause {
    /// Column name.
    pub name: String,
    /// Type name, emitted verbatim.
    pub data_type: String,
    /// Emits `PRIMARY KEY`.
    pub primary_key: bool,
    /// Emits `NOT NULL`.
    pub not_null: bool,
    /// Emits `REFERENCES table(column)`.
    pub references: Option<ForeignKeyRef>,
}

impl ColumnClause {
    /// Builds the clause for a descriptor.
    ///
    /// A malformed reference is dropped here; [`validate`] rejects it
    /// before generation.
    #[must_use]
    pub fn from_descriptor(descriptor: &ColumnDescriptor) -> Self {
        Self {
            name: descriptor.column_name.clone(),
            data_type: descriptor.data_type.clone(),
            primary_key: descriptor.is_primary_key,
            not_null: descriptor.not_null,
            references: descriptor.reference().and_then(ForeignKeyRef::parse),
        }
    }

    /// Renders the clause.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut parts = vec![self.name.clone(), self.data_type.clone()];
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if self.not_null {
            parts.push("NOT NULL".to_string());
        }
        if let Some(ref target) = self.references {
            parts.push(target.to_sql());
        }
        parts.join(" ")
    }
}

/// A `CREATE TABLE` statement ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTable {
    /// Table name.
    pub name: String,
    /// Column clauses, in input order.
    pub columns: Vec<ColumnClause>,
}

impl CreateTable {
    /// Builds the statement for a grouped table.
    #[must_use]
    pub fn from_spec(table: &TableSpec) -> Self {
        Self {
            name: table.name.clone(),
            columns: table.columns.iter().map(ColumnClause::from_descriptor).collect(),
        }
    }

    /// Renders the statement in the given mode.
    #[must_use]
    pub fn to_sql(&self, mode: FormatMode) -> String {
        let clauses: Vec<String> = self.columns.iter().map(ColumnClause::to_sql).collect();
        let tail = match mode {
            FormatMode::Standard => "",
            FormatMode::Legacy => " ",
        };
        format!("CREATE TABLE {}({}{})", self.name, clauses.join(","), tail)
    }
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql(FormatMode::Standard))
    }
}

/// Turns column descriptors into `CREATE TABLE` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlGenerator {
    mode: FormatMode,
}

impl DdlGenerator {
    /// Creates a generator in [`FormatMode::Standard`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output formatting mode.
    #[must_use]
    pub fn mode(mut self, mode: FormatMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the formatting mode.
    #[must_use]
    pub fn format_mode(&self) -> FormatMode {
        self.mode
    }

    /// Validates the descriptors and builds one statement per table.
    ///
    /// Tables come out in the order their name first appears.
    pub fn plan(&self, descriptors: &[ColumnDescriptor]) -> Result<Vec<CreateTable>> {
        validate(descriptors)?;
        Ok(group_by_table(descriptors)
            .iter()
            .map(CreateTable::from_spec)
            .collect())
    }

    /// Validates the descriptors and renders one statement per table.
    pub fn generate(&self, descriptors: &[ColumnDescriptor]) -> Result<Vec<String>> {
        Ok(self
            .plan(descriptors)?
            .iter()
            .map(|table| table.to_sql(self.mode))
            .collect())
    }
}

/// Generates `CREATE TABLE` statements in [`FormatMode::Standard`].
///
/// # Example
///
/// ```rust
/// use oxide_ddl_core::{generate_ddl, ColumnDescriptor};
///
/// let ddl = generate_ddl(&[
///     ColumnDescriptor::new("users", "id", "INTEGER").primary_key(),
///     ColumnDescriptor::new("users", "name", "VARCHAR").not_null(),
/// ])
/// .unwrap();
///
/// assert_eq!(ddl, vec!["CREATE TABLE users(id INTEGER PRIMARY KEY,name VARCHAR NOT NULL)"]);
/// ```
pub fn generate_ddl(descriptors: &[ColumnDescriptor]) -> Result<Vec<String>> {
    DdlGenerator::new().generate(descriptors)
}
