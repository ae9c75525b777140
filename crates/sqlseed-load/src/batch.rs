//! Loading every file that matches a pattern.
//!
//! Files are processed one after another in file-name order. There is no
//! transaction across files: when a file fails, the tables loaded before it
//! stay in the database and the batch stops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use sqlseed_core::table_name_for;
use tracing::{info, warn};

use crate::error::{LoadError, Result};
use crate::executor::ExecutionHandle;
use crate::synthesizer::SchemaSynthesizer;

/// A file whose table was created and filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    /// Table name.
    pub table: String,
    /// Source file.
    pub path: PathBuf,
    /// Data rows in the file.
    pub rows: usize,
    /// Rows reported affected by the database (zero in dry-run mode).
    pub rows_affected: u64,
    /// Rendered statements (dry-run mode only).
    pub statements: Vec<String>,
}

/// The file that stopped the batch.
#[derive(Debug)]
pub struct BatchFailure {
    /// Table name derived from the file.
    pub table: String,
    /// Source file.
    pub path: PathBuf,
    /// What went wrong.
    pub error: LoadError,
}

/// Outcome of [`SchemaSynthesizer::batch_load_directory`].
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Tables loaded, in processing order.
    pub loaded: Vec<LoadedTable>,
    /// Tables of matched files that had no primary key assigned.
    pub missing_primary_key: Vec<String>,
    /// The failure that ended the batch early, if any.
    pub failure: Option<BatchFailure>,
}

impl BatchSummary {
    /// Returns true if every matched file was loaded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Names of the loaded tables.
    #[must_use]
    pub fn tables(&self) -> Vec<&str> {
        self.loaded.iter().map(|t| t.table.as_str()).collect()
    }
}

/// Lists files matching `pattern`, sorted by file name.
///
/// Wildcards (`*`, `?`) are allowed in the last path component only.
pub fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern_path = Path::new(pattern);
    let pattern_err = |message: &str| LoadError::Pattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    let file_pattern = pattern_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| pattern_err("no file name component"))?;
    let dir = match pattern_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if dir.to_string_lossy().contains(['*', '?']) {
        return Err(pattern_err("wildcards are only supported in the file name"));
    }

    let regex = glob_regex(file_pattern).map_err(|e| pattern_err(&e.to_string()))?;
    let mut files = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|name| regex.is_match(name)) {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn glob_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let body = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Regex::new(&format!("^{body}$"))
}

impl SchemaSynthesizer {
    /// Creates and fills one table per file matching `pattern`.
    ///
    /// `primary_keys_by_file` maps a table name (the file stem) to its key
    /// columns. Without a handle (or in dry-run mode) the statements are
    /// collected instead of executed.
    pub async fn batch_load_directory(
        &self,
        pattern: &str,
        primary_keys_by_file: &HashMap<String, Vec<String>>,
        mut handle: Option<&mut ExecutionHandle>,
    ) -> Result<BatchSummary> {
        let files = matching_files(pattern)?;
        info!(pattern, files = files.len(), "Batch load");

        let mut summary = BatchSummary {
            missing_primary_key: files
                .iter()
                .map(|path| table_name_for(path))
                .filter(|table| primary_keys_by_file.get(table).is_none_or(Vec::is_empty))
                .collect(),
            ..BatchSummary::default()
        };

        for path in files {
            let table = table_name_for(&path);
            let keys = primary_keys_by_file
                .get(&table)
                .cloned()
                .unwrap_or_default();
            match self.load_file(&path, &table, &keys, handle.as_deref_mut()).await {
                Ok(loaded) => summary.loaded.push(loaded),
                Err(error) => {
                    warn!(
                        file = %path.display(),
                        table = %table,
                        error = %error,
                        "Batch stopped"
                    );
                    summary.failure = Some(BatchFailure { table, path, error });
                    break;
                }
            }
        }
        Ok(summary)
    }

    async fn load_file(
        &self,
        path: &Path,
        table: &str,
        primary_key: &[String],
        mut handle: Option<&mut ExecutionHandle>,
    ) -> Result<LoadedTable> {
        let (spec, sample) = self.infer_file(path, Some(table), primary_key)?;

        let mut statements = vec![self.render_create_table(&spec)];
        if !sample.is_empty() {
            statements.extend(self.insert_statements(&spec, &sample, None)?);
        }

        let mut loaded = LoadedTable {
            table: spec.name.clone(),
            path: path.to_path_buf(),
            rows: sample.len(),
            rows_affected: 0,
            statements: Vec::new(),
        };
        for sql in &statements {
            let outcome = self.execute_or_render(sql, handle.as_deref_mut()).await?;
            loaded.rows_affected += outcome.rows_affected();
            if let Some(rendered) = outcome.rendered() {
                loaded.statements.push(rendered.to_string());
            }
        }
        info!(table = %loaded.table, rows = loaded.rows, "Table loaded");
        Ok(loaded)
    }
}
