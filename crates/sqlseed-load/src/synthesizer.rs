//! The synthesizer: file in, statements out, optionally executed.

use std::path::Path;

use sqlseed_core::{Renderer, Sample, TableSpec, infer_schema, read_sample, table_name_for};
use tracing::{debug, info};

use crate::config::SynthConfig;
use crate::error::Result;
use crate::executor::{ExecutionHandle, ExecutionResult};

/// Result of [`SchemaSynthesizer::execute_or_render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: the statement text, unexecuted.
    Rendered(String),
    /// The statement ran.
    Executed(ExecutionResult),
}

impl Outcome {
    /// The statement text, in dry-run mode.
    #[must_use]
    pub fn rendered(&self) -> Option<&str> {
        match self {
            Self::Rendered(sql) => Some(sql),
            Self::Executed(_) => None,
        }
    }

    /// Rows affected, zero in dry-run mode.
    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        match self {
            Self::Rendered(_) => 0,
            Self::Executed(result) => result.rows_affected,
        }
    }
}

/// Builds table schemas and statements from delimited files.
///
/// Holds configuration only. Every call derives its `TableSpec` afresh.
#[derive(Debug, Clone, Default)]
pub struct SchemaSynthesizer {
    config: SynthConfig,
}

impl SchemaSynthesizer {
    /// Creates a synthesizer.
    #[must_use]
    pub const fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Renderer for the configured dialect.
    #[must_use]
    pub const fn renderer(&self) -> Renderer {
        self.config.renderer()
    }

    /// Infers a schema from the first `sample_rows` rows of `sample`.
    pub fn infer_schema(&self, table: &str, sample: &Sample, primary_key: &[String]) -> Result<TableSpec> {
        Ok(infer_schema(table, sample, primary_key, self.config.sample_rows)?)
    }

    /// Reads `path` and infers its schema.
    ///
    /// Returns every row of the file along with the schema; only the first
    /// `sample_rows` rows take part in inference.
    pub fn infer_file(
        &self,
        path: &Path,
        table: Option<&str>,
        primary_key: &[String],
    ) -> Result<(TableSpec, Sample)> {
        let sample = read_sample(path, None)?;
        let name = table.map_or_else(|| table_name_for(path), str::to_string);
        info!(
            file = %path.display(),
            table = %name,
            rows = sample.len(),
            "Read file"
        );
        let spec = self.infer_schema(&name, &sample, primary_key)?;
        Ok((spec, sample))
    }

    /// Renders `CREATE TABLE` for `table`.
    #[must_use]
    pub fn render_create_table(&self, table: &TableSpec) -> String {
        self.renderer().render_create_table(table)
    }

    /// Renders a single `INSERT` for every row of `sample`.
    pub fn render_bulk_insert(
        &self,
        table: &str,
        sample: &Sample,
        conflict_key: Option<&str>,
    ) -> Result<String> {
        Ok(self.renderer().render_bulk_insert(table, sample, conflict_key)?)
    }

    /// Renders `CREATE TABLE` for a file, reading only the inference sample.
    ///
    /// An empty `primary_key` falls back to the configured one.
    pub fn file_table_statement(
        &self,
        path: &Path,
        table: Option<&str>,
        primary_key: &[String],
    ) -> Result<String> {
        let primary_key = if primary_key.is_empty() {
            self.config.primary_key.as_slice()
        } else {
            primary_key
        };
        let sample = read_sample(path, Some(self.config.sample_rows))?;
        let name = table.map_or_else(|| table_name_for(path), str::to_string);
        let spec = self.infer_schema(&name, &sample, primary_key)?;
        Ok(self.render_create_table(&spec))
    }

    /// Renders chunked `INSERT` statements for every row of a file.
    pub fn file_insert_statements(
        &self,
        path: &Path,
        table: Option<&str>,
        conflict_key: Option<&str>,
    ) -> Result<Vec<String>> {
        let (spec, sample) = self.infer_file(path, table, &[])?;
        self.insert_statements(&spec, &sample, conflict_key)
    }

    pub(crate) fn insert_statements(
        &self,
        table: &TableSpec,
        sample: &Sample,
        conflict_key: Option<&str>,
    ) -> Result<Vec<String>> {
        Ok(self.renderer().render_chunked_inserts(
            table,
            &sample.rows,
            conflict_key,
            self.config.chunk_size,
        )?)
    }

    /// Executes `sql` on `handle`, or returns it unexecuted when there is no
    /// handle or dry-run is configured.
    pub async fn execute_or_render(
        &self,
        sql: &str,
        handle: Option<&mut ExecutionHandle>,
    ) -> Result<Outcome> {
        match handle {
            Some(handle) if !self.config.dry_run => {
                let result = handle.execute(sql).await?;
                debug!(rows = result.rows_affected, "Statement executed");
                Ok(Outcome::Executed(result))
            }
            _ => Ok(Outcome::Rendered(sql.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlseed_core::DialectKind;

    fn client() -> Sample {
        Sample::from_pairs(&[&[("id", "1"), ("name", "Ann")], &[("id", "2"), ("name", "Bo")]])
    }

    #[tokio::test]
    async fn test_no_handle_renders() {
        let synth = SchemaSynthesizer::default();
        let outcome = synth.execute_or_render("SHOW TABLES", None).await.unwrap();
        assert_eq!(outcome, Outcome::Rendered("SHOW TABLES".to_string()));
        assert_eq!(outcome.rows_affected(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_ignores_handle() {
        let synth = SchemaSynthesizer::new(SynthConfig {
            dry_run: true,
            ..SynthConfig::default()
        });
        let mut handle = ExecutionHandle::connect_cursor("sqlite::memory:").await.unwrap();
        // Invalid SQL would fail if it reached the database
        let outcome = synth
            .execute_or_render("NOT SQL AT ALL", Some(&mut handle))
            .await
            .unwrap();
        assert_eq!(outcome.rendered(), Some("NOT SQL AT ALL"));
    }

    #[tokio::test]
    async fn test_execute_with_handle() {
        let synth = SchemaSynthesizer::default();
        let table = synth.infer_schema("client", &client(), &["id".to_string()]).unwrap();
        let mut handle = ExecutionHandle::connect_cursor("sqlite::memory:").await.unwrap();

        let create = synth.render_create_table(&table);
        synth.execute_or_render(&create, Some(&mut handle)).await.unwrap();
        let insert = synth.render_bulk_insert("client", &client(), None).unwrap();
        let outcome = synth.execute_or_render(&insert, Some(&mut handle)).await.unwrap();
        assert_eq!(outcome, Outcome::Executed(ExecutionResult { rows_affected: 2 }));
    }

    #[tokio::test]
    async fn test_postgres_upsert_runs_on_sqlite() {
        let synth = SchemaSynthesizer::new(SynthConfig {
            dialect: DialectKind::Postgres,
            ..SynthConfig::default()
        });
        let table = synth.infer_schema("client", &client(), &["id".to_string()]).unwrap();
        let mut handle = ExecutionHandle::connect_cursor("sqlite::memory:").await.unwrap();
        handle.execute(&synth.render_create_table(&table)).await.unwrap();
        handle
            .execute(&synth.render_bulk_insert("client", &client(), None).unwrap())
            .await
            .unwrap();

        let update = Sample::from_pairs(&[&[("id", "2"), ("name", "Beatrice")]]);
        let upsert = synth.render_bulk_insert("client", &update, Some("id")).unwrap();
        synth.execute_or_render(&upsert, Some(&mut handle)).await.unwrap();

        let names = handle
            .fetch_strings("SELECT name FROM client ORDER BY id")
            .await
            .unwrap();
        assert_eq!(names, vec!["Ann", "Beatrice"]);
    }

    #[test]
    fn test_insert_statements_chunked() {
        let synth = SchemaSynthesizer::new(SynthConfig {
            chunk_size: 1,
            ..SynthConfig::default()
        });
        let table = synth.infer_schema("client", &client(), &[]).unwrap();
        let statements = synth.insert_statements(&table, &client(), None).unwrap();
        assert_eq!(
            statements,
            vec![
                "INSERT INTO client (id, name) VALUES (1,'Ann')",
                "INSERT INTO client (id, name) VALUES (2,'Bo')",
            ]
        );
    }

    #[test]
    fn test_file_table_statement_uses_configured_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.csv");
        std::fs::write(&path, "id,name\n1,Ann\n").unwrap();

        let synth = SchemaSynthesizer::new(SynthConfig {
            primary_key: vec!["id".to_string()],
            ..SynthConfig::default()
        });
        let sql = synth.file_table_statement(&path, None, &[]).unwrap();
        assert!(sql.ends_with("    PRIMARY KEY(id)\n)"));

        let sql = synth
            .file_table_statement(&path, Some("people"), &["name".to_string()])
            .unwrap();
        assert!(sql.starts_with("CREATE TABLE people ("));
        assert!(sql.contains("PRIMARY KEY(name)"));
    }
}
