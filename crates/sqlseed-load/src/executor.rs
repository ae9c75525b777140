//! Execution handles.
//!
//! A handle is either a single direct connection (cursor) or a connection
//! pool (engine). The variant is chosen when the handle is built; callers
//! never inspect it afterwards. Each call is one round trip, awaited before
//! the next one is issued.

use sqlx::any::{AnyPoolOptions, AnyRow, install_default_drivers};
use sqlx::{AnyConnection, AnyPool};
use sqlx::{Connection, Row};
use tracing::{debug, info};

use crate::error::Result;

/// What the database reported for an executed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Rows inserted, updated or deleted.
    pub rows_affected: u64,
}

/// A live database handle.
pub enum ExecutionHandle {
    /// One direct connection.
    Cursor(AnyConnection),
    /// A connection pool.
    Engine(AnyPool),
}

impl ExecutionHandle {
    /// Opens a single connection to `url`.
    pub async fn connect_cursor(url: &str) -> Result<Self> {
        install_default_drivers();
        let conn = AnyConnection::connect(url).await?;
        info!(backend = conn.backend_name(), "Connected (cursor)");
        Ok(Self::Cursor(conn))
    }

    /// Opens a pool of up to `max_connections` connections to `url`.
    pub async fn connect_engine(url: &str, max_connections: u32) -> Result<Self> {
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!(max_connections, "Connected (engine)");
        Ok(Self::Engine(pool))
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Cursor(_) => "cursor",
            Self::Engine(_) => "engine",
        }
    }

    /// Executes one statement. Database errors are returned unchanged.
    pub async fn execute(&mut self, sql: &str) -> Result<ExecutionResult> {
        debug!(handle = self.kind(), sql = %sql, "Executing SQL");
        let result = match self {
            Self::Cursor(conn) => sqlx::raw_sql(sql).execute(&mut *conn).await?,
            Self::Engine(pool) => sqlx::raw_sql(sql).execute(&*pool).await?,
        };
        Ok(ExecutionResult {
            rows_affected: result.rows_affected(),
        })
    }

    /// Runs a query and returns the first column of every row as text.
    pub async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>> {
        debug!(handle = self.kind(), sql = %sql, "Fetching rows");
        let rows = match self {
            Self::Cursor(conn) => sqlx::raw_sql(sql).fetch_all(&mut *conn).await?,
            Self::Engine(pool) => sqlx::raw_sql(sql).fetch_all(&*pool).await?,
        };
        let values = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(values)
    }

    /// Runs a query and returns every row with each column rendered as text.
    ///
    /// NULL columns come back as `NULL`.
    pub async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Vec<String>>> {
        debug!(handle = self.kind(), sql = %sql, "Fetching rows");
        let rows = match self {
            Self::Cursor(conn) => sqlx::raw_sql(sql).fetch_all(&mut *conn).await?,
            Self::Engine(pool) => sqlx::raw_sql(sql).fetch_all(&*pool).await?,
        };
        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|idx| cell_text(row, idx))
                    .collect::<Result<Vec<String>>>()
            })
            .collect()
    }

    /// Closes the connection or drains the pool.
    pub async fn close(self) -> Result<()> {
        match self {
            Self::Cursor(conn) => conn.close().await?,
            Self::Engine(pool) => pool.close().await,
        }
        Ok(())
    }
}

fn cell_text(row: &AnyRow, idx: usize) -> Result<String> {
    fn shown<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
    }

    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return Ok(shown(value));
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(shown(value));
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(idx) {
        return Ok(shown(value));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(shown(value));
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(shown(value));
    }
    let bytes = row.try_get::<Option<Vec<u8>>, _>(idx)?;
    Ok(shown(bytes.map(|b| String::from_utf8_lossy(&b).into_owned())))
}
