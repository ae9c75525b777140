//! Table and column descriptions produced by inference.
//!
//! These values are built fresh for each rendering call and dropped right
//! after; nothing here is cached between calls.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Text columns are sized in steps of this many characters.
pub const VARCHAR_STEP: usize = 50;

/// Column types that inference can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Whole numbers within 32 bits.
    Integer,
    /// Whole numbers that need 64 bits.
    BigInteger,
    /// Decimal numbers (integers mixed with decimals widen to this).
    Float,
    /// `true`/`false` values.
    Boolean,
    /// Date or date-time literals.
    Timestamp,
    /// Variable-length text with a maximum length in characters.
    Varchar(usize),
}

impl ColumnType {
    /// Text type wide enough for `max_chars` characters.
    ///
    /// The length is rounded up to the next multiple of [`VARCHAR_STEP`] and
    /// is never zero.
    #[must_use]
    pub const fn varchar_for(max_chars: usize) -> Self {
        let steps = max_chars.div_ceil(VARCHAR_STEP);
        let steps = if steps == 0 { 1 } else { steps };
        Self::Varchar(steps * VARCHAR_STEP)
    }

    /// Returns true for numeric types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::BigInteger | Self::Float)
    }
}

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Inferred type.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
}

impl ColumnSpec {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A table to create: name, ordered columns, and optional primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name.
    pub name: String,
    /// Columns in source-file order.
    pub columns: Vec<ColumnSpec>,
    /// Primary key column names (empty when none was designated).
    pub primary_key: Vec<String>,
}

impl TableSpec {
    /// Creates a table spec. Primary key columns are forced to NOT NULL.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>, primary_key: Vec<String>) -> Self {
        let columns = columns
            .into_iter()
            .map(|col| {
                if primary_key.contains(&col.name) {
                    col.not_null()
                } else {
                    col
                }
            })
            .collect();
        Self {
            name: name.into(),
            columns,
            primary_key,
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns true if a primary key was designated.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

/// Upsert rule: on a conflict on `conflict_key`, every other column takes
/// the incoming value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertPolicy {
    /// Target table.
    pub table: String,
    /// Column whose uniqueness triggers the update.
    pub conflict_key: String,
    /// Columns overwritten with the new value.
    pub update_columns: Vec<String>,
}

impl UpsertPolicy {
    /// Builds the policy for `table`, rejecting a key that is not a column.
    pub fn new(table: &TableSpec, conflict_key: &str) -> RenderResult<Self> {
        if table.column(conflict_key).is_none() {
            return Err(RenderError::UnknownConflictKey {
                table: table.name.clone(),
                column: conflict_key.to_string(),
            });
        }
        let update_columns = table
            .columns
            .iter()
            .filter(|c| c.name != conflict_key)
            .map(|c| c.name.clone())
            .collect();
        Ok(Self {
            table: table.name.clone(),
            conflict_key: conflict_key.to_string(),
            update_columns,
        })
    }
}
