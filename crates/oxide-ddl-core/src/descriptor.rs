//! Column descriptors.
//!
//! A [`ColumnDescriptor`] is one row of the tabular table description: it
//! names the owning table, the column, its type and its constraint flags.

use serde::{Deserialize, Serialize};

use crate::flags::deserialize_flag;

/// One column of one table, as described by a single input row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Name of the owning table.
    pub table_name: String,
    /// Column name, unique within its table.
    pub column_name: String,
    /// Whether the column is the table's primary key.
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_primary_key: bool,
    /// Backend type name, emitted verbatim (e.g. `INTEGER`, `VARCHAR(40)`).
    pub data_type: String,
    /// Whether the column is declared `NOT NULL`.
    #[serde(deserialize_with = "deserialize_flag")]
    pub not_null: bool,
    /// Foreign-key target written as `table.column`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a nullable, non-key column descriptor.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            is_primary_key: false,
            data_type: data_type.into(),
            not_null: false,
            references: None,
        }
    }

    /// Marks the column as primary key.
    ///
    /// Unlike a schema-level primary key this does not imply `NOT NULL`;
    /// the two flags are emitted independently.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Marks the column as `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Adds a foreign-key reference (`table.column`).
    #[must_use]
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.references = Some(target.into());
        self
    }

    /// Returns the reference text, treating a blank cell as no reference.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.references
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns a copy with surrounding whitespace stripped from the names,
    /// the type and the reference. A blank reference becomes `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            table_name: self.table_name.trim().to_string(),
            column_name: self.column_name.trim().to_string(),
            is_primary_key: self.is_primary_key,
            data_type: self.data_type.trim().to_string(),
            not_null: self.not_null,
            references: self.reference().map(str::to_string),
        }
    }
}

/// A parsed `table.column` foreign-key target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table, possibly schema-qualified.
    pub table: String,
    /// Referenced column.
    pub column: String,
}

impl ForeignKeyRef {
    /// Parses `table.column`, splitting on the last dot.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (table, column) = text.trim().rsplit_once('.')?;
        let (table, column) = (table.trim(), column.trim());
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    /// Renders the `REFERENCES` fragment.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("REFERENCES {}({})", self.table, self.column)
    }
}
