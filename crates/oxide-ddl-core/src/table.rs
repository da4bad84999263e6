//! Grouping descriptors into tables.

use serde::{Deserialize, Serialize};

use crate::descriptor::{ColumnDescriptor, ForeignKeyRef};

/// All descriptors of one table, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name.
    pub name: String,
    /// Column descriptors, in the order they appeared in the input.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSpec {
    /// Creates an empty table spec.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Returns the primary key columns, in input order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Returns the names of other tables this table references.
    ///
    /// Self-references and malformed references are skipped. Each name is
    /// listed once, in column order.
    #[must_use]
    pub fn referenced_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for target in self
            .columns
            .iter()
            .filter_map(ColumnDescriptor::reference)
            .filter_map(ForeignKeyRef::parse)
        {
            if target.table != self.name && !tables.contains(&target.table) {
                tables.push(target.table);
            }
        }
        tables
    }
}

/// Partitions descriptors by table name.
///
/// Tables appear in the order their name is first seen; columns keep their
/// relative input order. Descriptors are [normalized] first, so names that
/// differ only in surrounding whitespace land in the same table.
///
/// [normalized]: ColumnDescriptor::normalized
#[must_use]
pub fn group_by_table(descriptors: &[ColumnDescriptor]) -> Vec<TableSpec> {
    let mut tables: Vec<TableSpec> = Vec::new();
    for descriptor in descriptors.iter().map(ColumnDescriptor::normalized) {
        match tables
            .iter_mut()
            .find(|t| t.name == descriptor.table_name)
        {
            Some(table) => table.columns.push(descriptor),
            None => {
                let mut table = TableSpec::new(descriptor.table_name.clone());
                table.columns.push(descriptor);
                tables.push(table);
            }
        }
    }
    tables
}
