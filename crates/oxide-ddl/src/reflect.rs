//! Schema reflection.
//!
//! Reads the table catalog back from SQLite and expresses it as column
//! descriptors, the same shape the generator consumes. The catalog queries
//! are answered by the engine; nothing here parses SQL.

use oxide_ddl_core::{ColumnDescriptor, TableSpec};
use tracing::debug;

use crate::error::Result;
use crate::executor::{Row, SqlExecutor};

/// Lists user tables, skipping SQLite's internal `sqlite_*` tables.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
     ORDER BY name";

/// Reads every user table and its columns, in table-name order.
///
/// Foreign keys are reported through [`ColumnDescriptor::references`] when
/// the referenced column is named explicitly.
pub async fn reflect_tables<E>(executor: &E) -> Result<Vec<TableSpec>>
where
    E: SqlExecutor + ?Sized,
{
    let names: Vec<String> = executor
        .fetch_all(LIST_TABLES_SQL)
        .await?
        .iter()
        .filter_map(|row| row.get_str("name").map(str::to_string))
        .collect();

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        tables.push(reflect_table(executor, &name).await?);
    }
    Ok(tables)
}

/// Reads one table's columns in declaration order.
pub async fn reflect_table<E>(executor: &E, name: &str) -> Result<TableSpec>
where
    E: SqlExecutor + ?Sized,
{
    let quoted = quote_identifier(name);
    let columns = executor
        .fetch_all(&format!("PRAGMA table_info({quoted})"))
        .await?;
    let foreign_keys = executor
        .fetch_all(&format!("PRAGMA foreign_key_list({quoted})"))
        .await?;

    debug!(
        table = %name,
        columns = columns.len(),
        foreign_keys = foreign_keys.len(),
        "Reflected table"
    );

    let mut table = TableSpec::new(name);
    for row in &columns {
        let column_name = row.get_str("name").unwrap_or_default().to_string();
        table.columns.push(ColumnDescriptor {
            table_name: name.to_string(),
            references: reference_for(&foreign_keys, &column_name),
            is_primary_key: row.get_i64("pk").unwrap_or(0) > 0,
            not_null: row.get_i64("notnull").unwrap_or(0) != 0,
            data_type: row.get_str("type").unwrap_or_default().to_string(),
            column_name,
        });
    }
    Ok(table)
}

fn reference_for(foreign_keys: &[Row], column: &str) -> Option<String> {
    foreign_keys
        .iter()
        .find(|fk| fk.get_str("from") == Some(column))
        .and_then(|fk| Some(format!("{}.{}", fk.get_str("table")?, fk.get_str("to")?)))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
