use std::fs;

use crate::helpers::{at, read, standard};

#[test]
fn identical_inputs_yield_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let almanac = standard(dir.path()).build().unwrap();

    let first = almanac.run_at(at(12, 0, 0)).unwrap();
    let second = almanac.run_at(at(12, 0, 5)).unwrap();

    let a = fs::read(first.snapshot.unwrap()).unwrap();
    let b = fs::read(second.snapshot.unwrap()).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.assembly, second.assembly);
}

#[test]
fn rerun_keeps_snapshots_and_backs_up_latest() {
    let dir = tempfile::tempdir().unwrap();
    let almanac = standard(dir.path()).build().unwrap();

    let first = almanac.run_at(at(12, 0, 0)).unwrap();
    let second = almanac.run_at(at(12, 0, 0)).unwrap();

    let first_snap = first.snapshot.unwrap();
    let second_snap = second.snapshot.unwrap();
    assert_ne!(first_snap, second_snap);
    assert!(first_snap.exists());
    assert_eq!(
        second_snap.file_name().unwrap(),
        "combined_20240630_120000_1.csv"
    );

    let backup = second.backup.unwrap();
    assert_eq!(backup, dir.path().join("combined_backup.csv"));
    assert_eq!(read(&backup), read(&first.latest.unwrap()));
    assert!(!dir.path().join("combined_latest.csv.tmp").exists());
}

#[test]
fn backup_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let almanac = standard(dir.path())
        .persist(almanac::PersistConfig {
            keep_backup: false,
            ..crate::helpers::fast_persist()
        })
        .build()
        .unwrap();
    almanac.run_at(at(1, 0, 0)).unwrap();
    let second = almanac.run_at(at(1, 0, 1)).unwrap();
    assert_eq!(second.backup, None);
    assert!(!dir.path().join("combined_backup.csv").exists());
}
