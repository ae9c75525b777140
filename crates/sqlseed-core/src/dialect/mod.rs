//! SQL dialect support.
//!
//! MySQL-family and PostgreSQL-family servers differ in type names,
//! identifier quoting, upsert syntax and a handful of administrative
//! statements. Everything dialect-specific goes through [`Dialect`].

mod mysql;
mod postgres;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::schema::{ColumnType, UpsertPolicy};
use crate::value::SqlValue;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier if necessary.
    ///
    /// Plain names (`[A-Za-z_][A-Za-z0-9_]*`) are emitted bare.
    fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name) {
            return name.to_string();
        }
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Maps a column type to the dialect's type name.
    fn type_name(&self, column_type: &ColumnType) -> String;

    /// Renders a literal for inline use.
    fn render_value(&self, value: &SqlValue) -> String {
        value.to_sql_inline()
    }

    /// Renders the clause appended to an INSERT to make it an upsert,
    /// including its leading space.
    fn upsert_clause(&self, policy: &UpsertPolicy) -> String;

    /// `CREATE DATABASE`.
    fn create_database(&self, name: &str) -> String {
        format!("CREATE DATABASE IF NOT EXISTS {}", self.quote_identifier(name))
    }

    /// `DROP DATABASE`.
    fn drop_database(&self, name: &str) -> String {
        format!("DROP DATABASE IF EXISTS {}", self.quote_identifier(name))
    }

    /// `ALTER TABLE ... DROP COLUMN`.
    fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Selects the default database for the session.
    fn use_database(&self, name: &str) -> RenderResult<String>;

    /// Lists databases on the server.
    fn show_databases(&self) -> String;

    /// Lists tables in the current database.
    fn show_tables(&self) -> String;

    /// Lists the columns of `table`.
    fn show_columns(&self, table: &str) -> String;
}

/// Returns true if `name` can be used without quoting.
#[must_use]
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

static MYSQL: MySqlDialect = MySqlDialect::new();
static POSTGRES: PostgresDialect = PostgresDialect::new();

/// Dialect selector used in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// MySQL / MariaDB.
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    /// PostgreSQL.
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DialectKind {
    /// Returns the dialect implementation.
    #[must_use]
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Mysql => &MYSQL,
            Self::Postgres => &POSTGRES,
        }
    }

    /// URL scheme for connection strings.
    #[must_use]
    pub const fn url_scheme(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dialect().name())
    }
}
