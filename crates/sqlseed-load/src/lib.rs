//! Load delimited data files into MySQL or PostgreSQL.
//!
//! `sqlseed-load` wraps [`sqlseed_core`] with everything that touches the
//! outside world:
//!
//! - **Executor** - a database handle, either one connection or a pool
//! - **Synthesizer** - file to schema to statements, executed or returned
//! - **Batch** - one table per file matching a pattern
//! - **Config** - options and the `server.cfg` connection file
//!
//! Without a handle every operation runs dry and hands back SQL text.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlseed_load::prelude::*;
//!
//! let synth = SchemaSynthesizer::new(SynthConfig::default());
//! let mut handle = ExecutionHandle::connect_cursor("mysql://root@127.0.0.1/testDB").await?;
//!
//! let keys = HashMap::from([("client".to_string(), vec!["id".to_string()])]);
//! let summary = synth
//!     .batch_load_directory("./data/*.csv", &keys, Some(&mut handle))
//!     .await?;
//! println!("loaded {:?}", summary.tables());
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the CREATE TABLE for a file
//! sqlseed create-table data/client.csv --primary-key id
//!
//! # Upsert a file into an existing table
//! sqlseed --server-config server.cfg insert data/konosuba.csv --update-key id
//!
//! # Load a directory
//! sqlseed --database-url mysql://root@127.0.0.1/testDB load 'data/*.csv' --key client=id
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod synthesizer;

/// Prelude for convenient imports.
pub mod prelude {
    pub use std::collections::HashMap;

    pub use crate::batch::{BatchFailure, BatchSummary, LoadedTable, matching_files};
    pub use crate::config::{ServerConfig, SynthConfig};
    pub use crate::error::{LoadError, Result};
    pub use crate::executor::{ExecutionHandle, ExecutionResult};
    pub use crate::synthesizer::{Outcome, SchemaSynthesizer};
    pub use sqlseed_core::{DialectKind, Renderer, Sample, TableSpec};
}
