//! Single-shot administrative statements.
//!
//! Database and table housekeeping that sits next to the create/insert
//! rendering: selecting and listing databases, listing and dropping tables,
//! cloning a table, dropping a column, reading a table back.

use crate::error::{RenderError, RenderResult};
use crate::render::Renderer;

impl Renderer {
    /// `CREATE DATABASE`.
    #[must_use]
    pub fn create_database(&self, name: &str) -> String {
        self.dialect().create_database(name)
    }

    /// `DROP DATABASE IF EXISTS`.
    #[must_use]
    pub fn drop_database(&self, name: &str) -> String {
        self.dialect().drop_database(name)
    }

    /// Selects the session's default database (MySQL only).
    pub fn use_database(&self, name: &str) -> RenderResult<String> {
        self.dialect().use_database(name)
    }

    /// Lists databases.
    #[must_use]
    pub fn show_databases(&self) -> String {
        self.dialect().show_databases()
    }

    /// Lists tables of the current database.
    #[must_use]
    pub fn show_tables(&self) -> String {
        self.dialect().show_tables()
    }

    /// Lists the columns of `table`.
    #[must_use]
    pub fn show_columns(&self, table: &str) -> String {
        self.dialect().show_columns(table)
    }

    /// Drops every named table in one statement.
    pub fn drop_tables<S: AsRef<str>>(&self, tables: &[S]) -> RenderResult<String> {
        if tables.is_empty() {
            return Err(RenderError::EmptyList("DROP TABLE"));
        }
        let dialect = self.dialect();
        let names: Vec<String> = tables
            .iter()
            .map(|t| dialect.quote_identifier(t.as_ref()))
            .collect();
        Ok(format!("DROP TABLE IF EXISTS {}", names.join(", ")))
    }

    /// Copies `source` (structure and rows) into `target`, or `<source>_copy`.
    #[must_use]
    pub fn clone_table(&self, source: &str, target: Option<&str>) -> String {
        let dialect = self.dialect();
        let target = target.map_or_else(|| format!("{source}_copy"), str::to_string);
        format!(
            "CREATE TABLE {} AS SELECT * FROM {}",
            dialect.quote_identifier(&target),
            dialect.quote_identifier(source)
        )
    }

    /// `ALTER TABLE ... DROP COLUMN`, with `IF EXISTS` where the dialect
    /// accepts it.
    #[must_use]
    pub fn drop_column(&self, table: &str, column: &str) -> String {
        self.dialect().drop_column(table, column)
    }

    /// `SELECT *` from `table`, optionally limited.
    #[must_use]
    pub fn select_from(&self, table: &str, limit: Option<u64>) -> String {
        let mut sql = format!("SELECT * FROM {}", self.dialect().quote_identifier(table));
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectKind;

    #[test]
    fn test_drop_tables() {
        let renderer = Renderer::new(DialectKind::Mysql);
        assert_eq!(
            renderer.drop_tables(&["client", "quest map"]).unwrap(),
            "DROP TABLE IF EXISTS client, `quest map`"
        );
        let none: [&str; 0] = [];
        assert!(matches!(
            renderer.drop_tables(&none),
            Err(RenderError::EmptyList("DROP TABLE"))
        ));
    }

    #[test]
    fn test_clone_table() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.clone_table("konosuba", None),
            "CREATE TABLE konosuba_copy AS SELECT * FROM konosuba"
        );
        assert_eq!(
            renderer.clone_table("konosuba", Some("backup")),
            "CREATE TABLE backup AS SELECT * FROM konosuba"
        );
    }

    #[test]
    fn test_drop_column_and_select() {
        let renderer = Renderer::new(DialectKind::Postgres);
        assert_eq!(
            renderer.drop_column("konosuba_copy", "age"),
            "ALTER TABLE konosuba_copy DROP COLUMN IF EXISTS age"
        );
        assert_eq!(
            Renderer::new(DialectKind::Mysql).drop_column("konosuba_copy", "age"),
            "ALTER TABLE konosuba_copy DROP COLUMN age"
        );
        assert_eq!(renderer.select_from("quest", Some(5)), "SELECT * FROM quest LIMIT 5");
        assert_eq!(renderer.select_from("quest", None), "SELECT * FROM quest");
    }

    #[test]
    fn test_database_statements_follow_dialect() {
        let mysql = Renderer::new(DialectKind::Mysql);
        let postgres = Renderer::new(DialectKind::Postgres);
        assert_eq!(mysql.create_database("testDB"), "CREATE DATABASE IF NOT EXISTS testDB");
        assert_eq!(postgres.create_database("testDB"), "CREATE DATABASE testDB");
        assert_eq!(mysql.show_tables(), "SHOW TABLES");
        assert!(postgres.show_tables().contains("pg_tables"));
        assert_eq!(mysql.show_databases(), "SHOW DATABASES");
        assert!(postgres.use_database("testDB").is_err());
    }
}
