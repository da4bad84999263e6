//! Applying generated DDL.
//!
//! The runner validates a batch, generates its statements, orders them so
//! referenced tables come first, and hands them to a [`SqlExecutor`].

use serde::Serialize;
use tracing::{debug, error, info};

use oxide_ddl_core::{
    group_by_table, order_for_creation, ColumnDescriptor, DdlGenerator, FormatMode,
};

use crate::error::Result;
use crate::executor::SqlExecutor;
use crate::input::Batch;

/// A generated statement for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTable {
    /// Table name.
    pub name: String,
    /// The `CREATE TABLE` statement.
    pub sql: String,
}

/// What an apply run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Tables in the order their statements were run.
    pub tables: Vec<String>,
    /// Whether the statements reached the database (false in dry-run mode).
    pub executed: bool,
}

/// The outcome of one batch in [`DdlRunner::apply_batches`].
#[derive(Debug)]
pub struct BatchOutcome {
    /// The batch's source label.
    pub source: String,
    /// The batch result.
    pub result: Result<ApplyReport>,
}

/// Generates and runs `CREATE TABLE` statements through an executor.
pub struct DdlRunner<E: SqlExecutor> {
    executor: E,
    generator: DdlGenerator,
    dry_run: bool,
}

impl<E: SqlExecutor> DdlRunner<E> {
    /// Creates a runner that generates in [`FormatMode::Standard`].
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            generator: DdlGenerator::new(),
            dry_run: false,
        }
    }

    /// Sets the output formatting mode.
    #[must_use]
    pub fn mode(mut self, mode: FormatMode) -> Self {
        self.generator = self.generator.mode(mode);
        self
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Validates and generates statements in creation order.
    ///
    /// Nothing is executed. Fails if the descriptors are invalid or the
    /// tables reference each other in a cycle.
    pub fn plan(&self, descriptors: &[ColumnDescriptor]) -> Result<Vec<PlannedTable>> {
        let statements = self.generator.plan(descriptors)?;
        let tables = group_by_table(descriptors);
        let ordered = order_for_creation(&tables)?;

        let mode = self.generator.format_mode();
        Ok(ordered
            .iter()
            .filter_map(|spec| statements.iter().find(|s| s.name == spec.name))
            .map(|statement| PlannedTable {
                name: statement.name.clone(),
                sql: statement.to_sql(mode),
            })
            .collect())
    }

    /// Plans the descriptors and runs every statement as one unit of work.
    ///
    /// Database errors are returned unchanged; statements after the failing
    /// one are not run.
    pub async fn apply(&self, descriptors: &[ColumnDescriptor]) -> Result<ApplyReport> {
        let planned = self.plan(descriptors)?;
        let tables: Vec<String> = planned.iter().map(|p| p.name.clone()).collect();

        if self.dry_run {
            info!(tables = planned.len(), "Dry run - SQL will be printed but not executed");
            for table in &planned {
                println!("{};", table.sql);
            }
            return Ok(ApplyReport {
                tables,
                executed: false,
            });
        }

        info!(
            backend = self.executor.backend(),
            tables = planned.len(),
            "Creating tables"
        );
        let statements: Vec<String> = planned.into_iter().map(|p| p.sql).collect();
        self.executor.execute_all(&statements).await?;

        for name in &tables {
            debug!(table = %name, "Table created");
        }
        info!(tables = tables.len(), "Tables created successfully");

        Ok(ApplyReport {
            tables,
            executed: true,
        })
    }

    /// Applies independent batches, continuing past failures.
    ///
    /// Each batch gets its own outcome, in input order.
    pub async fn apply_batches(&self, batches: &[Batch]) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(batches.len());
        for batch in batches {
            let result = self.apply(&batch.descriptors).await;
            if let Err(ref err) = result {
                error!(source = %batch.source, error = %err, "Batch failed");
            }
            outcomes.push(BatchOutcome {
                source: batch.source.clone(),
                result,
            });
        }
        outcomes
    }
}
