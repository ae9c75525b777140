//! Error types for schema inference and SQL rendering.

use std::path::PathBuf;

/// Errors raised while reading a sample file and inferring its schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaInferenceError {
    /// The file could not be opened or read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path of the source file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid delimited data (ragged rows, bad quoting, invalid UTF-8).
    #[error("Malformed delimited data in '{path}': {source}")]
    Csv {
        /// Path of the source file.
        path: PathBuf,
        /// Underlying parser error.
        source: csv::Error,
    },

    /// The file is empty or its header row has no columns.
    #[error("No columns detected in '{path}'")]
    NoColumns {
        /// Path (or label) of the source.
        path: PathBuf,
    },

    /// A header cell is blank.
    #[error("Column {position} has an empty name")]
    EmptyColumnName {
        /// One-based position in the header.
        position: usize,
    },

    /// The header names the same column twice.
    #[error("Duplicate column '{0}' in header")]
    DuplicateColumn(String),

    /// A designated primary key column does not appear in the header.
    #[error("Primary key column '{column}' not found in table '{table}'")]
    UnknownPrimaryKey {
        /// Table being inferred.
        table: String,
        /// The missing column.
        column: String,
    },
}

/// Errors raised while rendering statements.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// There are no rows to insert.
    #[error("No rows to insert into '{table}'")]
    NoRows {
        /// Target table.
        table: String,
    },

    /// The conflict key does not name a column of the table.
    #[error("Conflict key '{column}' is not a column of '{table}'")]
    UnknownConflictKey {
        /// Target table.
        table: String,
        /// The unknown column.
        column: String,
    },

    /// A row does not have one field per column.
    #[error("Row {row} has {found} fields, expected {expected}")]
    RowWidth {
        /// Zero-based row index.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of fields found.
        found: usize,
    },

    /// A statement needs at least one name (e.g. `DROP TABLE` with no tables).
    #[error("'{0}' needs at least one name")]
    EmptyList(&'static str),

    /// The rows could not be typed (e.g. no header).
    #[error(transparent)]
    Schema(#[from] SchemaInferenceError),

    /// The dialect has no equivalent for the statement.
    #[error("{statement} is not supported by the {dialect} dialect")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Statement keyword.
        statement: &'static str,
    },
}

/// Result type for schema inference.
pub type InferResult<T> = std::result::Result<T, SchemaInferenceError>;

/// Result type for rendering.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
