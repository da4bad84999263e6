//! Validation errors.

/// Errors raised while reading or validating column descriptors.
///
/// Every variant is produced before any statement is generated, so a failed
/// call never yields partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The input contained no descriptors.
    #[error("No column descriptors were provided")]
    EmptyInput,

    /// A required field of an in-memory descriptor is empty.
    ///
    /// Delimited input reports [`BlankField`](Self::BlankField) instead,
    /// which carries the source line.
    #[error("Descriptor at index {index} (zero-based) is missing required field '{field}'")]
    MissingField {
        /// Zero-based position of the descriptor in the input.
        index: usize,
        /// Name of the empty field.
        field: &'static str,
    },

    /// Two descriptors of the same table share a column name.
    #[error("Column '{column}' is defined more than once in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Repeated column name.
        column: String,
    },

    /// More than one column of a table is flagged as primary key.
    #[error("Table '{table}' marks more than one primary key column: {}", .columns.join(", "))]
    MultiplePrimaryKeys {
        /// Table name.
        table: String,
        /// The flagged columns, in input order.
        columns: Vec<String>,
    },

    /// A boolean-like cell could not be mapped to `true` or `false`.
    #[error("Line {line}: '{value}' is not a valid value for '{field}'")]
    InvalidFlag {
        /// One-based source line (0 for non-line-based input).
        line: usize,
        /// Field name.
        field: &'static str,
        /// The rejected cell text.
        value: String,
    },

    /// A required cell of a delimited row is empty.
    #[error("Line {line}: required field '{field}' is empty")]
    BlankField {
        /// One-based source line.
        line: usize,
        /// Name of the empty field.
        field: &'static str,
    },

    /// A row has the wrong number of fields.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// One-based source line.
        line: usize,
        /// Number of fields expected.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A header row lacks a required column.
    #[error("Header row is missing required column '{0}'")]
    MissingHeader(&'static str),

    /// A foreign-key reference is not written as `table.column`.
    #[error("Column '{table}.{column}' has malformed reference '{value}', expected 'table.column'")]
    InvalidReference {
        /// Table owning the referencing column.
        table: String,
        /// Referencing column.
        column: String,
        /// The rejected reference text.
        value: String,
    },

    /// Tables reference each other in a cycle.
    #[error("Circular foreign key references between tables: {}", .0.join(", "))]
    CircularReference(Vec<String>),

    /// The input could not be parsed at all.
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Multiple problems were found in the same input.
    #[error("Multiple validation errors:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Folds a list of problems into a single error.
    ///
    /// Returns `None` when the list is empty.
    #[must_use]
    pub fn collect(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Returns the individual problems this error stands for.
    #[must_use]
    pub fn problems(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

/// Result type for descriptor validation and DDL generation.
pub type Result<T> = std::result::Result<T, ValidationError>;
