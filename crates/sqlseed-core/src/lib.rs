//! # sqlseed-core
//!
//! Turns delimited data files into SQL text.
//!
//! This crate provides:
//! - Column type inference over a bounded sample of rows
//! - `CREATE TABLE` rendering with primary keys
//! - Bulk `INSERT` rendering, with MySQL or PostgreSQL upsert clauses
//! - Administrative statements (databases, table listing, cloning, drops)
//!
//! Nothing here talks to a database; see `sqlseed-load` for execution.
//!
//! ## Example
//!
//! ```rust
//! use sqlseed_core::{DialectKind, Renderer, Sample, infer_schema};
//!
//! let sample = Sample::from_pairs(&[
//!     &[("id", "1"), ("name", "Ann")],
//!     &[("id", "2"), ("name", "Bo")],
//! ]);
//! let table = infer_schema("client", &sample, &["id".to_string()], 100).unwrap();
//! let renderer = Renderer::new(DialectKind::Mysql);
//!
//! let ddl = renderer.render_create_table(&table);
//! assert!(ddl.contains("id INT NOT NULL"));
//!
//! let dml = renderer.render_insert(&table, &sample.rows, Some("id")).unwrap();
//! assert!(dml.ends_with("ON DUPLICATE KEY UPDATE name=VALUES(name)"));
//! ```
//!
//! ## Injection caveat
//!
//! Values are escaped and inlined into the statement text rather than bound
//! as parameters. Do not feed files from untrusted sources.

pub mod dialect;
pub mod error;
pub mod infer;
pub mod render;
pub mod schema;
pub mod statements;
pub mod value;

pub use dialect::{Dialect, DialectKind, MySqlDialect, PostgresDialect};
pub use error::{RenderError, SchemaInferenceError};
pub use infer::{DEFAULT_SAMPLE_ROWS, Sample, infer_schema, read_sample, table_name_for};
pub use render::Renderer;
pub use schema::{ColumnSpec, ColumnType, TableSpec, UpsertPolicy};
pub use value::SqlValue;
