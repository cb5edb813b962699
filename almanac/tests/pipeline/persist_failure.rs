use std::fs;

use almanac::AlmanacError;

use crate::helpers::{at, standard};

#[test]
fn failed_replace_keeps_previous_latest_and_names_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory where `latest` should go makes every rename fail.
    let latest = dir.path().join("combined_latest.csv");
    fs::create_dir(&latest).unwrap();
    fs::write(latest.join("keep.txt"), "previous").unwrap();

    let err = standard(dir.path())
        .build()
        .unwrap()
        .run_at(at(23, 59, 59))
        .unwrap_err();

    let snapshot = dir.path().join("combined_20240630_235959.csv");
    match &err {
        AlmanacError::Persist {
            attempts, fallback, ..
        } => {
            assert_eq!(*attempts, 3);
            assert_eq!(fallback.as_deref(), Some(snapshot.display().to_string().as_str()));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(err.fallback_artifact().map(std::path::PathBuf::from), Some(snapshot.clone()));
    assert!(snapshot.is_file());
    assert_eq!(fs::read_to_string(latest.join("keep.txt")).unwrap(), "previous");
    assert!(!dir.path().join("combined_latest.csv.tmp").exists());
    assert!(!err.is_metric_local());

    let assembly = err.assembly().unwrap();
    assert_eq!(
        assembly.columns,
        vec!["AVG Open", "AVG Close", "Sentiment Fear Greed"]
    );
    assert!(assembly.dropped.is_empty());
}

#[tokio::test]
async fn parallel_publish_failure_keeps_the_assembly_summary() {
    let dir = tempfile::tempdir().unwrap();
    let latest = dir.path().join("combined_latest.csv");
    fs::create_dir(&latest).unwrap();
    fs::write(latest.join("keep.txt"), "previous").unwrap();

    let err = standard(dir.path())
        .build()
        .unwrap()
        .run_parallel_at(at(12, 0, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AlmanacError::Persist { .. }));
    assert_eq!(err.assembly().map(|a| a.rows), Some(3));
    assert!(dir.path().join("combined_20240630_120000.csv").is_file());
}
