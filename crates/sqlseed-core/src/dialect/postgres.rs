//! PostgreSQL dialect.

use super::Dialect;
use crate::error::{RenderError, RenderResult};
use crate::schema::{ColumnType, UpsertPolicy};

/// PostgreSQL-family dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Float => "DOUBLE PRECISION".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
        }
    }

    fn upsert_clause(&self, policy: &UpsertPolicy) -> String {
        let key = self.quote_identifier(&policy.conflict_key);
        if policy.update_columns.is_empty() {
            return format!(" ON CONFLICT ({key}) DO NOTHING");
        }
        let updates: Vec<String> = policy
            .update_columns
            .iter()
            .map(|col| {
                let col = self.quote_identifier(col);
                format!("{col}=EXCLUDED.{col}")
            })
            .collect();
        format!(" ON CONFLICT ({key}) DO UPDATE SET {}", updates.join(", "))
    }

    // No IF NOT EXISTS for databases
    fn create_database(&self, name: &str) -> String {
        format!("CREATE DATABASE {}", self.quote_identifier(name))
    }

    fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN IF EXISTS {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    fn use_database(&self, _name: &str) -> RenderResult<String> {
        Err(RenderError::Unsupported {
            dialect: self.name(),
            statement: "USE",
        })
    }

    // Catalog columns are `name` / `sql_identifier`; cast so every client
    // can decode them as text.
    fn show_databases(&self) -> String {
        "SELECT datname::text FROM pg_database WHERE NOT datistemplate".to_string()
    }

    fn show_tables(&self) -> String {
        "SELECT tablename::text FROM pg_catalog.pg_tables WHERE schemaname = 'public'".to_string()
    }

    fn show_columns(&self, table: &str) -> String {
        let escaped = table.replace('\'', "''");
        format!(
            "SELECT column_name::text FROM information_schema.columns \
             WHERE table_name = '{escaped}' ORDER BY ordinal_position"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> PostgresDialect {
        PostgresDialect::new()
    }

    #[test]
    fn test_type_names() {
        let d = dialect();
        assert_eq!(d.type_name(&ColumnType::Integer), "INTEGER");
        assert_eq!(d.type_name(&ColumnType::BigInteger), "BIGINT");
        assert_eq!(d.type_name(&ColumnType::Float), "DOUBLE PRECISION");
        assert_eq!(d.type_name(&ColumnType::Timestamp), "TIMESTAMP");
        assert_eq!(d.type_name(&ColumnType::Varchar(50)), "VARCHAR(50)");
    }

    #[test]
    fn test_upsert_clause() {
        let policy = UpsertPolicy {
            table: "konosuba".to_string(),
            conflict_key: "id".to_string(),
            update_columns: vec!["name".to_string(), "age".to_string()],
        };
        assert_eq!(
            dialect().upsert_clause(&policy),
            " ON CONFLICT (id) DO UPDATE SET name=EXCLUDED.name, age=EXCLUDED.age"
        );
    }

    #[test]
    fn test_upsert_clause_key_only() {
        let policy = UpsertPolicy {
            table: "ids".to_string(),
            conflict_key: "id".to_string(),
            update_columns: vec![],
        };
        assert_eq!(dialect().upsert_clause(&policy), " ON CONFLICT (id) DO NOTHING");
    }

    #[test]
    fn test_use_database_unsupported() {
        let err = dialect().use_database("testDB").unwrap_err();
        assert!(matches!(err, RenderError::Unsupported { statement: "USE", .. }));
    }

    #[test]
    fn test_show_columns_escapes_name() {
        assert_eq!(
            dialect().show_columns("o'neil"),
            "SELECT column_name::text FROM information_schema.columns \
             WHERE table_name = 'o''neil' ORDER BY ordinal_position"
        );
    }

    #[test]
    fn test_listing_queries_return_text() {
        let d = dialect();
        assert_eq!(
            d.show_databases(),
            "SELECT datname::text FROM pg_database WHERE NOT datistemplate"
        );
        assert_eq!(
            d.show_tables(),
            "SELECT tablename::text FROM pg_catalog.pg_tables WHERE schemaname = 'public'"
        );
    }
}
