//! Configuration: rendering/loading options and the server connection file.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use sqlseed_core::{DEFAULT_SAMPLE_ROWS, DialectKind, Renderer};

use crate::error::{LoadError, Result};

/// Default number of rows per `INSERT` statement.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Options for synthesizing and running statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Target SQL dialect.
    pub dialect: DialectKind,
    /// Rows per `INSERT` statement; zero means one statement for all rows.
    pub chunk_size: usize,
    /// Primary key column(s), given as a string or a list.
    #[serde(deserialize_with = "one_or_many")]
    pub primary_key: Vec<String>,
    /// Render statements instead of executing them.
    pub dry_run: bool,
    /// Maximum number of rows inspected for type inference.
    pub sample_rows: usize,
    /// Emit `CREATE TABLE IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            primary_key: Vec::new(),
            dry_run: false,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            if_not_exists: false,
        }
    }
}

impl SynthConfig {
    /// Loads options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Renderer matching these options.
    #[must_use]
    pub const fn renderer(&self) -> Renderer {
        Renderer::new(self.dialect).if_not_exists(self.if_not_exists)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) if key.is_empty() => Vec::new(),
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys.into_iter().filter(|k| !k.is_empty()).collect(),
    })
}

/// Connection settings, as stored in a `server.cfg` JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// User name.
    pub user: String,
    /// Password (absent for passwordless local accounts).
    #[serde(default)]
    pub password: Option<String>,
    /// Host name or address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port (dialect default when absent).
    #[serde(default)]
    pub port: Option<u16>,
    /// Database to connect to.
    #[serde(default)]
    pub database: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl ServerConfig {
    /// Loads connection settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Builds a connection URL for `dialect`.
    #[must_use]
    pub fn url(&self, dialect: DialectKind) -> String {
        let mut url = format!("{}://{}", dialect.url_scheme(), percent_encode(&self.user));
        if let Some(ref password) = self.password {
            url.push(':');
            url.push_str(&percent_encode(password));
        }
        url.push('@');
        url.push_str(&self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if let Some(ref database) = self.database {
            url.push('/');
            url.push_str(&percent_encode(database));
        }
        url
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| LoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}

// Userinfo and path segments only allow unreserved characters unescaped.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
