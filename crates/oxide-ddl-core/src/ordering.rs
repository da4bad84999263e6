//! Foreign-key dependency ordering.

use std::collections::{HashMap, VecDeque};

use crate::error::{Result, ValidationError};
use crate::table::TableSpec;

/// Orders tables so that every referenced table is created first.
///
/// Among tables with no ordering constraint between them the input order is
/// kept. References to tables outside `tables` and self-references impose no
/// constraint.
///
/// Returns `Err` if the tables reference each other in a cycle.
pub fn order_for_creation(tables: &[TableSpec]) -> Result<Vec<&TableSpec>> {
    let position: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; tables.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tables.len()];

    for (i, table) in tables.iter().enumerate() {
        for target in table.referenced_tables() {
            if let Some(&dep) = position.get(target.as_str()) {
                in_degree[i] += 1;
                dependents[dep].push(i);
            }
        }
    }

    // Kahn's algorithm, always releasing the earliest ready table
    let mut ready: VecDeque<usize> = (0..tables.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut result = Vec::with_capacity(tables.len());

    while let Some(i) = ready.pop_front() {
        result.push(&tables[i]);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                let at = ready.partition_point(|&r| r < dependent);
                ready.insert(at, dependent);
            }
        }
    }

    if result.len() != tables.len() {
        let stuck = tables
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, t)| t.name.clone())
            .collect();
        return Err(ValidationError::CircularReference(stuck));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ColumnDescriptor;
    use crate::table::group_by_table;

    fn names<'a>(tables: &[&'a TableSpec]) -> Vec<&'a str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_referenced_table_first() {
        let tables = group_by_table(&[
            ColumnDescriptor::new("addresses", "id", "INTEGER").primary_key(),
            ColumnDescriptor::new("addresses", "user_id", "INTEGER").references("users.id"),
            ColumnDescriptor::new("users", "id", "INTEGER").primary_key(),
        ]);

        let ordered = order_for_creation(&tables).unwrap();
        assert_eq!(names(&ordered), vec!["users", "addresses"]);
    }

    #[test]
    fn test_independent_tables_keep_input_order() {
        let tables = group_by_table(&[
            ColumnDescriptor::new("c", "id", "INTEGER"),
            ColumnDescriptor::new("a", "id", "INTEGER"),
            ColumnDescriptor::new("b", "id", "INTEGER"),
        ]);
        let ordered = order_for_creation(&tables).unwrap();
        assert_eq!(names(&ordered), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_chain() {
        let tables = group_by_table(&[
            ColumnDescriptor::new("lines", "order_id", "INTEGER").references("orders.id"),
            ColumnDescriptor::new("misc", "id", "INTEGER"),
            ColumnDescriptor::new("orders", "customer_id", "INTEGER").references("customers.id"),
            ColumnDescriptor::new("customers", "id", "INTEGER"),
        ]);
        let ordered = order_for_creation(&tables).unwrap();
        assert_eq!(names(&ordered), vec!["misc", "customers", "orders", "lines"]);
    }

    #[test]
    fn test_external_and_self_references_ignored() {
        let tables = group_by_table(&[
            ColumnDescriptor::new("nodes", "parent_id", "INTEGER").references("nodes.id"),
            ColumnDescriptor::new("nodes", "owner_id", "INTEGER").references("accounts.id"),
        ]);
        let ordered = order_for_creation(&tables).unwrap();
        assert_eq!(names(&ordered), vec!["nodes"]);
    }

    #[test]
    fn test_cycle() {
        let tables = group_by_table(&[
            ColumnDescriptor::new("a", "b_id", "INTEGER").references("b.id"),
            ColumnDescriptor::new("b", "a_id", "INTEGER").references("a.id"),
            ColumnDescriptor::new("c", "id", "INTEGER"),
        ]);
        assert_eq!(
            order_for_creation(&tables),
            Err(ValidationError::CircularReference(vec![
                "a".to_string(),
                "b".to_string()
            ]))
        );
    }
}
