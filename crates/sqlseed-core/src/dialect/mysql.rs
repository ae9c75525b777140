//! MySQL / MariaDB dialect.

use super::Dialect;
use crate::error::RenderResult;
use crate::schema::{ColumnType, UpsertPolicy};
use crate::value::SqlValue;

/// MySQL-family dialect (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INT".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Float => "DOUBLE".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "DATETIME".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
        }
    }

    fn render_value(&self, value: &SqlValue) -> String {
        match value {
            // Backslash is an escape character in MySQL string literals
            SqlValue::Text(s) => {
                let escaped = s.replace('\\', "\\\\").replace('\'', "''");
                format!("'{escaped}'")
            }
            other => other.to_sql_inline(),
        }
    }

    fn upsert_clause(&self, policy: &UpsertPolicy) -> String {
        let key = self.quote_identifier(&policy.conflict_key);
        let updates: Vec<String> = if policy.update_columns.is_empty() {
            vec![format!("{key}={key}")]
        } else {
            policy
                .update_columns
                .iter()
                .map(|col| {
                    let col = self.quote_identifier(col);
                    format!("{col}=VALUES({col})")
                })
                .collect()
        };
        format!(" ON DUPLICATE KEY UPDATE {}", updates.join(", "))
    }

    fn use_database(&self, name: &str) -> RenderResult<String> {
        Ok(format!("USE {}", self.quote_identifier(name)))
    }

    fn show_databases(&self) -> String {
        "SHOW DATABASES".to_string()
    }

    fn show_tables(&self) -> String {
        "SHOW TABLES".to_string()
    }

    fn show_columns(&self, table: &str) -> String {
        format!("SHOW COLUMNS FROM {}", self.quote_identifier(table))
    }
}
