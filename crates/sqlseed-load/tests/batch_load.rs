//! Batch loading against an in-memory SQLite database.

mod common;

use common::{keys, memory_handle, pattern, sqlite_tables, write_csv};
use sqlseed_load::prelude::*;

#[tokio::test]
async fn loads_every_file_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "client.csv", "id,name\n1,Pizza Booth\n2,McDaniels\n");
    write_csv(dir.path(), "quest.csv", "id,reward,posted\n1,10.5,2021-03-01\n2,7,2021-03-02\n");
    write_csv(dir.path(), "timesheet_entry.csv", "hours,note\n8,\n4.5,half day\n");

    let synth = SchemaSynthesizer::new(SynthConfig {
        chunk_size: 1,
        ..SynthConfig::default()
    });
    let mut handle = memory_handle().await;
    let summary = synth
        .batch_load_directory(
            &pattern(dir.path()),
            &keys(&[("client", "id"), ("quest", "id")]),
            Some(&mut handle),
        )
        .await
        .unwrap();

    assert!(summary.is_complete());
    assert_eq!(summary.tables(), vec!["client", "quest", "timesheet_entry"]);
    assert_eq!(summary.missing_primary_key, vec!["timesheet_entry"]);
    assert!(summary.loaded.iter().all(|t| t.statements.is_empty()));
    assert_eq!(summary.loaded[0].rows_affected, 2);

    assert_eq!(
        sqlite_tables(&mut handle).await,
        vec!["client", "quest", "timesheet_entry"]
    );
    let notes = handle
        .fetch_strings("SELECT COALESCE(note, '<null>') FROM timesheet_entry ORDER BY hours DESC")
        .await
        .unwrap();
    assert_eq!(notes, vec!["<null>", "half day"]);
}

#[tokio::test]
async fn failure_keeps_earlier_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a_partner.csv", "id,name\n1,Guild\n");
    // Duplicate primary key makes the INSERT fail
    write_csv(dir.path(), "b_quest.csv", "id,title\n1,Frog hunt\n1,Frog hunt again\n");
    write_csv(dir.path(), "c_staff.csv", "id,name\n1,Luna\n");

    let synth = SchemaSynthesizer::default();
    let mut handle = memory_handle().await;
    let summary = synth
        .batch_load_directory(
            &pattern(dir.path()),
            &keys(&[("a_partner", "id"), ("b_quest", "id"), ("c_staff", "id")]),
            Some(&mut handle),
        )
        .await
        .unwrap();

    assert_eq!(summary.tables(), vec!["a_partner"]);
    let failure = summary.failure.expect("second file should fail");
    assert_eq!(failure.table, "b_quest");
    assert!(matches!(failure.error, LoadError::Execution(_)));

    let tables = sqlite_tables(&mut handle).await;
    assert!(tables.contains(&"a_partner".to_string()));
    assert!(!tables.contains(&"c_staff".to_string()));
    let names = handle.fetch_strings("SELECT name FROM a_partner").await.unwrap();
    assert_eq!(names, vec!["Guild"]);
}

#[tokio::test]
async fn dry_run_collects_statements() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "client.csv", "id,name\n1,Ann\n2,Bo\n");

    let synth = SchemaSynthesizer::default();
    let summary = synth
        .batch_load_directory(&pattern(dir.path()), &keys(&[("client", "id")]), None)
        .await
        .unwrap();

    let loaded = &summary.loaded[0];
    assert_eq!(loaded.rows, 2);
    assert_eq!(loaded.rows_affected, 0);
    assert_eq!(
        loaded.statements,
        vec![
            "CREATE TABLE client (\n    id INT NOT NULL,\n    name VARCHAR(50),\n    PRIMARY KEY(id)\n)"
                .to_string(),
            "INSERT INTO client (id, name) VALUES (1,'Ann'), (2,'Bo')".to_string(),
        ]
    );
}

#[tokio::test]
async fn unreadable_file_stops_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", "x\n1\n");
    write_csv(dir.path(), "b.csv", "");

    let summary = SchemaSynthesizer::default()
        .batch_load_directory(&pattern(dir.path()), &HashMap::new(), None)
        .await
        .unwrap();

    assert_eq!(summary.tables(), vec!["a"]);
    assert_eq!(summary.missing_primary_key, vec!["a", "b"]);
    let failure = summary.failure.unwrap();
    assert!(matches!(failure.error, LoadError::Inference(_)));
}

#[tokio::test]
async fn header_only_file_creates_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "empty.csv", "id,name\n");

    let summary = SchemaSynthesizer::default()
        .batch_load_directory(&pattern(dir.path()), &keys(&[("empty", "id")]), None)
        .await
        .unwrap();
    assert_eq!(summary.loaded[0].statements.len(), 1);
    assert!(summary.loaded[0].statements[0].starts_with("CREATE TABLE empty"));
}
