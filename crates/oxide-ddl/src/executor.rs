//! SQL execution.
//!
//! The generator never talks to a database. Running its output is the job of
//! a [`SqlExecutor`], passed explicitly to whatever needs one. Failures are
//! the engine's own errors, surfaced unchanged.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tracing::debug;

/// Error raised by the database engine.
pub use sqlx::Error as DatabaseError;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExecutionResult {
    /// Rows inserted, updated or deleted.
    pub rows_affected: u64,
}

/// A single value read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// A result row: column names paired with values, in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    /// The row's columns.
    pub columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Gets a value by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Gets an integer value by column name.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Gets a text value by column name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Runs SQL text against a database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Returns the backend name.
    fn backend(&self) -> &'static str;

    /// Executes a statement that returns no rows.
    async fn execute(&self, statement: &str) -> Result<ExecutionResult, DatabaseError>;

    /// Executes a query and returns every row.
    async fn fetch_all(&self, statement: &str) -> Result<Vec<Row>, DatabaseError>;

    /// Executes statements in order, stopping at the first failure.
    async fn execute_all(
        &self,
        statements: &[String],
    ) -> Result<Vec<ExecutionResult>, DatabaseError> {
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            results.push(self.execute(statement).await?);
        }
        Ok(results)
    }
}

/// Executes SQL on SQLite through an `sqlx` pool.
///
/// Every unit of work acquires one connection and returns it to the pool when
/// the unit ends, including on error.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to a database URL such as `sqlite:app.db` or `sqlite::memory:`.
    ///
    /// The database file is created if missing. In-memory databases, written
    /// either as `:memory:` or with a `mode=memory` query parameter, get a
    /// single connection so every statement sees the same database.
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let max_connections = if is_in_memory(url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether a SQLite URL names an in-memory database.
fn is_in_memory(url: &str) -> bool {
    if url.contains(":memory:") {
        return true;
    }
    url.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .any(|param| param.eq_ignore_ascii_case("mode=memory"))
    })
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&self, statement: &str) -> Result<ExecutionResult, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        debug!(sql = %statement, "Executing SQL");
        let result = sqlx::query(statement).execute(&mut *conn).await?;
        Ok(ExecutionResult {
            rows_affected: result.rows_affected(),
        })
    }

    async fn fetch_all(&self, statement: &str) -> Result<Vec<Row>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        debug!(sql = %statement, "Fetching rows");
        let rows = sqlx::query(statement).fetch_all(&mut *conn).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute_all(
        &self,
        statements: &[String],
    ) -> Result<Vec<ExecutionResult>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            debug!(sql = %statement, "Executing SQL");
            let result = sqlx::query(statement).execute(&mut *conn).await?;
            results.push(ExecutionResult {
                rows_affected: result.rows_affected(),
            });
        }
        Ok(results)
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row, DatabaseError> {
    let mut columns = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        columns.push((column.name().to_string(), decode_value(row, index)?));
    }
    Ok(Row { columns })
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<SqlValue, DatabaseError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    // Storage class of the value, not the declared column type
    let kind = raw.type_info().name().to_string();
    Ok(match kind.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get(index)?),
        "REAL" | "NUMERIC" => SqlValue::Real(row.try_get(index)?),
        "BLOB" => SqlValue::Blob(row.try_get(index)?),
        _ => SqlValue::Text(row.try_get(index)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_executor() -> SqliteExecutor {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");
        SqliteExecutor::new(pool)
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory(":memory:"));
        assert!(is_in_memory("sqlite://shared?mode=memory"));
        assert!(is_in_memory("sqlite:app.db?cache=shared&mode=memory"));
        assert!(!is_in_memory("sqlite:app.db"));
        assert!(!is_in_memory("sqlite:app.db?mode=rwc"));
        assert!(!is_in_memory("sqlite:memory.db"));
    }

    #[tokio::test]
    async fn test_memory_mode_url_shares_one_database() {
        let executor = SqliteExecutor::connect("sqlite://oxide_ddl_shared?mode=memory")
            .await
            .unwrap();
        executor.execute("CREATE TABLE t(id INTEGER)").await.unwrap();
        executor.execute("INSERT INTO t VALUES (1)").await.unwrap();

        let rows = executor.fetch_all("SELECT id FROM t").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(executor.pool().options().get_max_connections(), 1);
    }

    #[tokio::test]
    async fn test_execute_and_fetch() {
        let executor = create_test_executor().await;
        executor
            .execute("CREATE TABLE users(id INTEGER PRIMARY KEY,name VARCHAR,score REAL,avatar BLOB)")
            .await
            .unwrap();

        let inserted = executor
            .execute("INSERT INTO users(name, score, avatar) VALUES ('jack', 1.5, x'0102'), (NULL, 2.0, NULL)")
            .await
            .unwrap();
        assert_eq!(inserted.rows_affected, 2);

        let rows = executor
            .fetch_all("SELECT id, name, score, avatar FROM users ORDER BY id")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_i64("id"), Some(1));
        assert_eq!(rows[0].get_str("name"), Some("jack"));
        assert_eq!(rows[0].get("score"), Some(&SqlValue::Real(1.5)));
        assert_eq!(rows[0].get("avatar"), Some(&SqlValue::Blob(vec![1, 2])));
        assert_eq!(rows[1].get("name"), Some(&SqlValue::Null));
    }

    #[tokio::test]
    async fn test_database_error_passes_through() {
        let executor = create_test_executor().await;
        let err = executor.execute("CREATE TABLE (").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Database(_)));
    }

    #[tokio::test]
    async fn test_execute_all_stops_at_first_failure() {
        let executor = create_test_executor().await;
        let statements = vec![
            "CREATE TABLE a(id INTEGER)".to_string(),
            "CREATE TABLE a(id INTEGER)".to_string(),
            "CREATE TABLE b(id INTEGER)".to_string(),
        ];
        assert!(executor.execute_all(&statements).await.is_err());

        let tables = executor
            .fetch_all("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .await
            .unwrap();
        let names: Vec<&str> = tables.iter().filter_map(|r| r.get_str("name")).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Integer(7).to_string(), "7");
        assert_eq!(SqlValue::Text("x".into()).to_string(), "x");
        assert_eq!(SqlValue::Blob(vec![0; 3]).to_string(), "<3 bytes>");
    }
}
