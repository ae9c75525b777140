#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sqlseed_core::{Sample, TableSpec, infer_schema, read_sample, table_name_for};

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
    path
}

pub fn read(path: &Path) -> Sample {
    read_sample(path, None).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

pub fn infer_file(path: &Path, primary_key: &[&str]) -> (TableSpec, Sample) {
    let sample = read(path);
    let keys: Vec<String> = primary_key.iter().map(|k| (*k).to_string()).collect();
    let table = infer_schema(&table_name_for(path), &sample, &keys, 100_000)
        .unwrap_or_else(|e| panic!("Failed to infer {}: {e}", path.display()));
    (table, sample)
}

pub fn client_sample() -> Sample {
    Sample::from_pairs(&[&[("id", "1"), ("name", "Ann")], &[("id", "2"), ("name", "Bo")]])
}
