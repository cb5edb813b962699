use almanac::{Almanac, AlmanacError, FillPolicy, TableInput};

use crate::helpers::{at, read, standard};

#[test]
fn empty_metric_is_omitted_and_the_run_still_writes() {
    let dir = tempfile::tempdir().unwrap();
    let report = standard(dir.path())
        .build()
        .unwrap()
        .run_at(at(18, 45, 0))
        .unwrap();

    // Sentiment Volume has no value at all.
    assert_eq!(report.assembly.dropped.len(), 1);
    let dropped = &report.assembly.dropped[0];
    assert_eq!(dropped.column, "Sentiment Volume");
    assert_eq!(
        dropped.reason,
        AlmanacError::insufficient("Sentiment Volume", 0, 3)
    );
    assert!(dropped.reason.is_metric_local());

    let latest = read(&report.latest.unwrap());
    assert!(latest.starts_with("Date,AVG Open,AVG Close,Sentiment Fear Greed\n"));
    assert!(!latest.contains("Volume"));
}

#[test]
fn tolerance_drops_sparse_metrics_only() {
    let sparse = "Date,Rare\n2024-01-01,1\n";
    let dense = "Date,Common\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n2024-01-04,4\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = Almanac::builder()
        .feature_table("S", TableInput::text("s", sparse))
        .feature_table("D", TableInput::text("d", dense))
        .fill_policy(FillPolicy {
            max_missing_fraction: 0.5,
        })
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.column_names(), vec!["D Common"]);
    assert_eq!(
        report.dropped[0].reason,
        AlmanacError::insufficient("S Rare", 1, 4)
    );
}
