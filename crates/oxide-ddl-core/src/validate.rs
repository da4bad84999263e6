//! Descriptor validation.
//!
//! Validation runs over the whole input before anything is generated and
//! reports every problem it finds, not just the first.

use std::collections::HashSet;

use crate::descriptor::{ColumnDescriptor, ForeignKeyRef};
use crate::error::{Result, ValidationError};
use crate::table::group_by_table;

/// Checks a batch of descriptors.
///
/// Fails when the batch is empty, when a required field is blank, when a
/// column name repeats within a table, when a table has more than one
/// primary key column, or when a reference is not `table.column`.
pub fn validate(descriptors: &[ColumnDescriptor]) -> Result<()> {
    if descriptors.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let mut errors = Vec::new();

    for (index, descriptor) in descriptors.iter().enumerate() {
        let required = [
            ("table_name", &descriptor.table_name),
            ("column_name", &descriptor.column_name),
            ("data_type", &descriptor.data_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField { index, field });
            }
        }

        if let Some(reference) = descriptor.reference() {
            if ForeignKeyRef::parse(reference).is_none() {
                errors.push(ValidationError::InvalidReference {
                    table: descriptor.table_name.clone(),
                    column: descriptor.column_name.clone(),
                    value: reference.to_string(),
                });
            }
        }
    }

    for table in group_by_table(descriptors) {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut reported: HashSet<&str> = HashSet::new();
        for column in &table.columns {
            let name = column.column_name.as_str();
            if name.trim().is_empty() {
                continue;
            }
            if !seen.insert(name) && reported.insert(name) {
                errors.push(ValidationError::DuplicateColumn {
                    table: table.name.clone(),
                    column: name.to_string(),
                });
            }
        }

        let keys: Vec<String> = table
            .primary_key_columns()
            .map(|c| c.column_name.clone())
            .collect();
        if keys.len() > 1 {
            errors.push(ValidationError::MultiplePrimaryKeys {
                table: table.name.clone(),
                columns: keys,
            });
        }
    }

    match ValidationError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
