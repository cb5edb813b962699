use almanac::{Almanac, Span, TableInput};

use crate::helpers::{EXCHANGE_A, EXCHANGE_B, day, standard};

#[test]
fn average_uses_observed_cells_only() {
    // A covers days 1-2, B covers days 2-3. Day 1 is A alone, day 3 is B alone;
    // neither side's edge fill leaks into the other's average.
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = standard(dir.path()).build().unwrap().assemble().unwrap();
    assert_eq!(table.column("AVG Close").unwrap(), &[100.0, 120.0, 140.0]);
    assert_eq!(table.column("AVG Open").unwrap(), &[99.0, 119.0, 139.0]);
}

#[test]
fn attribution_credits_each_source_with_its_spans() {
    let dir = tempfile::tempdir().unwrap();
    let (_, report) = standard(dir.path()).build().unwrap().assemble().unwrap();

    let close = report
        .attributions
        .iter()
        .find(|a| a.metric == "Close")
        .unwrap();
    let a: Vec<Span> = close.spans_for("A").collect();
    let b: Vec<Span> = close.spans_for("B").collect();
    assert_eq!(a, vec![Span { start: day(1), end: day(2) }]);
    assert_eq!(b, vec![Span { start: day(2), end: day(3) }]);
    // Single-source feature tables carry no attribution.
    assert_eq!(report.attributions.len(), 2);
}

#[test]
fn hole_inside_one_source_is_covered_by_the_other() {
    let a = "Date,Close\n2024-01-01,10\n2024-01-03,30\n";
    let b = "Date,Close\n2024-01-01,12\n2024-01-02,1000\n2024-01-03,32\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = Almanac::builder()
        .average_group(
            "AVG",
            vec![TableInput::text("a", a), TableInput::text("b", b)],
        )
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    // Day 2 is B's value only, not B averaged with A's interpolation.
    assert_eq!(table.column("AVG Close").unwrap(), &[11.0, 1000.0, 31.0]);
}

#[test]
fn metric_present_in_one_source_only_is_still_averaged_group_output() {
    let a = "Date,Close,Volume\n2024-01-01,1,500\n";
    let b = "Date,Close\n2024-01-01,3\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = Almanac::builder()
        .average_group(
            "AVG",
            vec![TableInput::text("a", a), TableInput::text("b", b)],
        )
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.column_names(), vec!["AVG Close", "AVG Volume"]);
    assert_eq!(table.column("AVG Volume").unwrap(), &[500.0]);
    assert_eq!(table.column("AVG Close").unwrap(), &[2.0]);
}

#[test]
fn exchange_fixtures_have_disjoint_edges() {
    // Sanity for the fixtures the other tests rely on.
    assert!(EXCHANGE_A.contains("2024-01-01"));
    assert!(!EXCHANGE_B.contains("2024-01-01"));
}
