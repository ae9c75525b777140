//! Reading delimited samples and inferring column types.
//!
//! Inference looks at a bounded number of rows only. A large file whose
//! later rows disagree with the sample gets a schema that is too narrow;
//! that is an accepted approximation.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{InferResult, SchemaInferenceError};
use crate::schema::{ColumnSpec, ColumnType, TableSpec};
use crate::value::{is_decimal, is_null_sentinel};

/// Default cap on the number of rows inspected for inference.
pub const DEFAULT_SAMPLE_ROWS: usize = 100_000;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Rows of raw string fields under a header, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    /// Column names.
    pub headers: Vec<String>,
    /// Raw fields, one `Vec` per row, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Sample {
    /// Creates a sample from a header and aligned rows.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Builds a sample from rows given as `(column, value)` pairs.
    ///
    /// Column order is the order of first appearance. A column missing from
    /// a row gets an empty field, which encodes as NULL.
    #[must_use]
    pub fn from_pairs(rows: &[&[(&str, &str)]]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            for (name, _) in *row {
                if !headers.iter().any(|h| h == *name) {
                    headers.push((*name).to_string());
                }
            }
        }
        let rows = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| {
                        row.iter()
                            .find(|(name, _)| *name == h.as_str())
                            .map_or_else(String::new, |(_, v)| (*v).to_string())
                    })
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Field `column` of every row (empty for short rows).
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(column).map_or("", String::as_str))
    }
}

/// Derives a table name from a file path (its stem).
#[must_use]
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map_or_else(|| "data".to_string(), str::to_string)
}

/// Reads a comma-separated UTF-8 file with a header row.
///
/// At most `limit` data rows are read when a limit is given.
pub fn read_sample(path: &Path, limit: Option<usize>) -> InferResult<Sample> {
    let file = std::fs::File::open(path).map_err(|source| SchemaInferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| SchemaInferenceError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(SchemaInferenceError::NoColumns {
            path: path.to_path_buf(),
        });
    }
    check_headers(&headers)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Sample { headers, rows })
}

fn check_headers(headers: &[String]) -> InferResult<()> {
    let mut seen = HashSet::new();
    for (idx, header) in headers.iter().enumerate() {
        if header.trim().is_empty() {
            return Err(SchemaInferenceError::EmptyColumnName { position: idx + 1 });
        }
        if !seen.insert(header.as_str()) {
            return Err(SchemaInferenceError::DuplicateColumn(header.clone()));
        }
    }
    Ok(())
}

/// Infers a table schema from at most `sample_rows` rows of `sample`.
///
/// Each column is typed independently: integer, then float, then boolean,
/// then timestamp, falling back to text sized to the longest value.
pub fn infer_schema(
    table: &str,
    sample: &Sample,
    primary_key: &[String],
    sample_rows: usize,
) -> InferResult<TableSpec> {
    if sample.headers.is_empty() {
        return Err(SchemaInferenceError::NoColumns { path: table.into() });
    }
    check_headers(&sample.headers)?;
    if let Some(missing) = primary_key.iter().find(|pk| !sample.headers.contains(*pk)) {
        return Err(SchemaInferenceError::UnknownPrimaryKey {
            table: table.to_string(),
            column: missing.clone(),
        });
    }

    let columns = sample
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut candidate = TypeCandidate::default();
            for value in sample.column_values(idx).take(sample_rows) {
                candidate.update(value);
            }
            ColumnSpec::new(name.clone(), candidate.decide())
        })
        .collect();

    Ok(TableSpec::new(table, columns, primary_key.to_vec()))
}

#[derive(Debug, Default)]
struct TypeCandidate {
    non_null: usize,
    integer_matches: usize,
    wide_integer: bool,
    float_matches: usize,
    boolean_matches: usize,
    timestamp_matches: usize,
    max_chars: usize,
}

impl TypeCandidate {
    fn update(&mut self, value: &str) {
        if is_null_sentinel(value) {
            return;
        }
        self.non_null += 1;
        self.max_chars = self.max_chars.max(value.chars().count());

        let trimmed = value.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            self.integer_matches += 1;
            self.wide_integer |= i32::try_from(n).is_err();
        }
        if is_decimal(trimmed) {
            self.float_matches += 1;
        }
        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            self.boolean_matches += 1;
        }
        if is_timestamp(trimmed) {
            self.timestamp_matches += 1;
        }
    }

    fn all(&self, count: usize) -> bool {
        self.non_null > 0 && count == self.non_null
    }

    fn decide(&self) -> ColumnType {
        if self.all(self.integer_matches) {
            if self.wide_integer {
                ColumnType::BigInteger
            } else {
                ColumnType::Integer
            }
        } else if self.all(self.float_matches) {
            ColumnType::Float
        } else if self.all(self.boolean_matches) {
            ColumnType::Boolean
        } else if self.all(self.timestamp_matches) {
            ColumnType::Timestamp
        } else {
            ColumnType::varchar_for(self.max_chars)
        }
    }
}

fn is_timestamp(value: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || DateTime::parse_from_rfc3339(value).is_ok()
}
