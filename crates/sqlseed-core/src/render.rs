//! `CREATE TABLE` and bulk `INSERT` rendering.
//!
//! Every function here is pure: same input, same text. Values are encoded
//! into [`SqlValue`](crate::value::SqlValue) literals before joining.

use crate::dialect::{Dialect, DialectKind};
use crate::error::{RenderError, RenderResult};
use crate::infer::{DEFAULT_SAMPLE_ROWS, Sample, infer_schema};
use crate::schema::{TableSpec, UpsertPolicy};
use crate::value::encode;

/// Renders statements for one dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    dialect: DialectKind,
    if_not_exists: bool,
}

impl Renderer {
    /// Creates a renderer for `dialect`.
    #[must_use]
    pub const fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            if_not_exists: false,
        }
    }

    /// Emits `CREATE TABLE IF NOT EXISTS` when enabled.
    #[must_use]
    pub const fn if_not_exists(mut self, enabled: bool) -> Self {
        self.if_not_exists = enabled;
        self
    }

    /// The selected dialect.
    #[must_use]
    pub const fn dialect_kind(&self) -> DialectKind {
        self.dialect
    }

    /// The dialect implementation.
    #[must_use]
    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect.dialect()
    }

    /// Renders a `CREATE TABLE` statement.
    ///
    /// Columns keep their order; primary key columns are NOT NULL and a
    /// `PRIMARY KEY(...)` line closes the column list.
    #[must_use]
    pub fn render_create_table(&self, table: &TableSpec) -> String {
        let dialect = self.dialect();
        let mut sql = String::from("CREATE TABLE ");
        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&dialect.quote_identifier(&table.name));
        sql.push_str(" (\n");

        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|col| {
                let mut line = format!(
                    "    {} {}",
                    dialect.quote_identifier(&col.name),
                    dialect.type_name(&col.column_type)
                );
                if !col.nullable || table.primary_key.contains(&col.name) {
                    line.push_str(" NOT NULL");
                }
                line
            })
            .collect();

        if table.has_primary_key() {
            let keys: Vec<String> = table
                .primary_key
                .iter()
                .map(|k| dialect.quote_identifier(k))
                .collect();
            lines.push(format!("    PRIMARY KEY({})", keys.join(", ")));
        }

        sql.push_str(&lines.join(",\n"));
        sql.push_str("\n)");
        sql
    }

    /// Renders one `INSERT` for every row of `sample`, typing the columns
    /// from the rows themselves.
    pub fn render_bulk_insert(
        &self,
        table_name: &str,
        sample: &Sample,
        conflict_key: Option<&str>,
    ) -> RenderResult<String> {
        if sample.is_empty() {
            return Err(RenderError::NoRows {
                table: table_name.to_string(),
            });
        }
        let table = infer_schema(table_name, sample, &[], DEFAULT_SAMPLE_ROWS)?;
        self.render_insert(&table, &sample.rows, conflict_key)
    }

    /// Renders one `INSERT` for `rows`, encoded with the column types of `table`.
    pub fn render_insert(
        &self,
        table: &TableSpec,
        rows: &[Vec<String>],
        conflict_key: Option<&str>,
    ) -> RenderResult<String> {
        if rows.is_empty() {
            return Err(RenderError::NoRows {
                table: table.name.clone(),
            });
        }
        let policy = conflict_key
            .map(|key| UpsertPolicy::new(table, key))
            .transpose()?;

        let dialect = self.dialect();
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| dialect.quote_identifier(&c.name))
            .collect();

        let tuples = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.render_tuple(table, idx, row))
            .collect::<RenderResult<Vec<String>>>()?;

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            dialect.quote_identifier(&table.name),
            columns.join(", "),
            tuples.join(", ")
        );
        if let Some(policy) = policy {
            sql.push_str(&dialect.upsert_clause(&policy));
        }
        Ok(sql)
    }

    /// Splits `rows` into `INSERT` statements of at most `chunk_size` rows.
    ///
    /// A `chunk_size` of zero puts every row in one statement.
    pub fn render_chunked_inserts(
        &self,
        table: &TableSpec,
        rows: &[Vec<String>],
        conflict_key: Option<&str>,
        chunk_size: usize,
    ) -> RenderResult<Vec<String>> {
        if rows.is_empty() {
            return Err(RenderError::NoRows {
                table: table.name.clone(),
            });
        }
        let size = if chunk_size == 0 { rows.len() } else { chunk_size };
        rows.chunks(size)
            .map(|chunk| self.render_insert(table, chunk, conflict_key))
            .collect()
    }

    fn render_tuple(&self, table: &TableSpec, idx: usize, row: &[String]) -> RenderResult<String> {
        if row.len() != table.columns.len() {
            return Err(RenderError::RowWidth {
                row: idx,
                expected: table.columns.len(),
                found: row.len(),
            });
        }
        let dialect = self.dialect();
        let values: Vec<String> = table
            .columns
            .iter()
            .zip(row)
            .map(|(col, raw)| dialect.render_value(&encode(raw, &col.column_type)))
            .collect();
        Ok(format!("({})", values.join(",")))
    }
}
