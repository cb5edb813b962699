use almanac::{Almanac, TableInput};

use crate::helpers::{at, fast_persist, read};

#[test]
fn all_empty_inputs_publish_a_header_only_table() {
    let dir = tempfile::tempdir().unwrap();
    let report = Almanac::builder()
        .average_group(
            "AVG",
            vec![
                TableInput::text("a", "Date,Close\n"),
                TableInput::text("b", "# nothing fetched today\nDate,Close\n"),
            ],
        )
        .feature_table("Chain", TableInput::text("chain", "Date,Hash Rate\n"))
        .output_dir(dir.path())
        .persist(fast_persist())
        .build()
        .unwrap()
        .run_at(at(7, 0, 0))
        .unwrap();

    assert!(report.assembly.empty_axis);
    assert_eq!(report.assembly.rows, 0);
    assert_eq!(report.assembly.cadence_days, None);
    assert!(report.assembly.dropped.is_empty());
    assert_eq!(
        read(&report.latest.unwrap()),
        "Date,AVG Close,Chain Hash Rate\n"
    );
}

#[test]
fn rows_with_only_missing_values_still_extend_the_axis() {
    let chain = "Date,Hash Rate\n2024-01-01,\n2024-01-02,7\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = Almanac::builder()
        .feature_table("Chain", TableInput::text("chain", chain))
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert!(!report.empty_axis);
    assert_eq!(table.rows(), 2);
    assert_eq!(table.column("Chain Hash Rate").unwrap(), &[7.0, 7.0]);
}
