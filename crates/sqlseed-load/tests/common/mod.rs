#![allow(dead_code)]

use std::path::Path;

use sqlseed_load::prelude::*;

pub fn write_csv(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents)
        .unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
}

pub async fn memory_handle() -> ExecutionHandle {
    ExecutionHandle::connect_cursor("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite connection")
}

pub async fn sqlite_tables(handle: &mut ExecutionHandle) -> Vec<String> {
    handle
        .fetch_strings("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .await
        .expect("Failed to list tables")
}

pub fn keys(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(table, key)| ((*table).to_string(), vec![(*key).to_string()]))
        .collect()
}

pub fn pattern(dir: &Path) -> String {
    dir.join("*.csv").to_string_lossy().into_owned()
}
