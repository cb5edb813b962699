use almanac::{Almanac, AlmanacError, TableInput};

use crate::helpers::{EXCHANGE_A, SENTIMENT, at, day, fast_persist, read, standard};

const EXPECTED: &str = "\
Date,AVG Open,AVG Close,Sentiment Fear Greed
2024-01-01,99,100,20
2024-01-02,119,120,45
2024-01-03,139,140,70
";

#[test]
fn standard_run_publishes_expected_table() {
    let dir = tempfile::tempdir().unwrap();
    let almanac = standard(dir.path()).build().unwrap();
    let report = almanac.run_at(at(9, 30, 0)).unwrap();

    let snapshot = report.snapshot.clone().unwrap();
    assert_eq!(snapshot, dir.path().join("combined_20240630_093000.csv"));
    assert_eq!(read(&snapshot), EXPECTED);
    assert_eq!(read(&report.latest.clone().unwrap()), EXPECTED);
    assert_eq!(report.backup, None);

    let a = &report.assembly;
    assert_eq!(a.rows, 3);
    assert_eq!(a.cadence_days, Some(1));
    assert_eq!(
        a.columns,
        vec!["AVG Open", "AVG Close", "Sentiment Fear Greed"]
    );
    assert_eq!(a.loads.len(), 3);
    assert_eq!(a.loads[2].source_id, "fng");
    assert_eq!(a.loads[2].rows_read, 3);
}

#[test]
fn observed_values_are_never_altered() {
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = standard(dir.path()).build().unwrap().assemble().unwrap();
    let fg = table.column("Sentiment Fear Greed").unwrap();
    // Day 1 observed; day 3 is the mean of its two same-day rows.
    assert!((fg[0] - 20.0).abs() < f64::EPSILON);
    assert!((fg[2] - 70.0).abs() < f64::EPSILON);
}

#[test]
fn axis_is_the_union_of_all_source_dates() {
    let late = "Date,Hash Rate\n2024-01-10,5\n2024-01-07,4\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = standard(dir.path())
        .feature_table("Chain", TableInput::text("chain", late))
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(
        table.dates(),
        &[day(1), day(2), day(3), day(7), day(10)]
    );
    // Hash rate: backfilled before day 7, interpolated nowhere, observed after.
    assert_eq!(table.column("Chain Hash Rate").unwrap(), &[4.0, 4.0, 4.0, 4.0, 5.0]);
    // Sentiment forward-fills its trailing gap.
    assert_eq!(
        table.column("Sentiment Fear Greed").unwrap(),
        &[20.0, 45.0, 70.0, 70.0, 70.0]
    );
    assert_eq!(report.cadence_days, Some(1));
}

#[test]
fn bare_columns_keep_their_metric_name() {
    let btc = "Date,BTC/USD,Gold/BTC Ratio\n2024-01-01,42000,0.05\n2024-01-02,43000,0.049\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = Almanac::builder()
        .feature_table("Currency", TableInput::text("fx", btc))
        .bare_column("BTC/USD")
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.column_names(), vec!["BTC/USD", "Currency Gold/BTC Ratio"]);
}

#[test]
fn colliding_output_names_drop_the_later_column() {
    let first = "Date,BTC/USD\n2024-01-01,1\n";
    let second = "Date,BTC/USD\n2024-01-01,2\n";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = Almanac::builder()
        .feature_table("One", TableInput::text("one", first))
        .feature_table("Two", TableInput::text("two", second))
        .bare_column("BTC/USD")
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.column("BTC/USD").unwrap(), &[1.0]);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(
        report.dropped[0].reason,
        AlmanacError::DuplicateColumn {
            column: "BTC/USD".into()
        }
    );
}

#[test]
fn excluded_and_text_cells_are_reported() {
    let chain = "\
Date,Hash Rate,Miner Revenue (USD),Status
2024-01-01,5,100,ok
2024-01-02,6,110,ok
";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = Almanac::builder()
        .feature_table(
            "Chain",
            TableInput::text("chain", chain).exclude("Miner Revenue (USD)"),
        )
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.column_names(), vec!["Chain Hash Rate"]);
    assert_eq!(report.loads[0].series, 2);
    assert_eq!(report.text_cells_skipped, 2);
    assert!(matches!(
        report.dropped[0].reason,
        AlmanacError::InsufficientData { observed: 0, .. }
    ));
}

#[test]
fn unparseable_rows_are_counted_not_substituted() {
    let raw = "\
Date,^GDAXI
Ticker,^GDAXI
2024-01-01,100
garbage,1
2024-01-02,101
";
    let dir = tempfile::tempdir().unwrap();
    let (table, report) = Almanac::builder()
        .feature_table("Index", TableInput::text("idx", raw))
        .load_options(almanac::LoadOptions {
            strip_ticker_decorations: true,
            ..almanac::LoadOptions::default()
        })
        .output_dir(dir.path())
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.dates(), &[day(1), day(2)]);
    assert_eq!(table.column("Index GDAXI").unwrap(), &[100.0, 101.0]);
    assert_eq!(report.loads[0].rows_skipped, 2);
    assert!(
        report.loads[0]
            .warnings
            .iter()
            .all(|w| matches!(w, AlmanacError::Parse { .. }))
    );
}

#[test]
fn unreadable_tables_are_skipped_and_the_rest_publishes() {
    let dir = tempfile::tempdir().unwrap();
    let report = Almanac::builder()
        .average_group(
            "AVG",
            vec![
                TableInput::text("A", EXCHANGE_A),
                TableInput::text("B", "Timestamp,Close\n1704067200,5\n"),
            ],
        )
        .feature_table("Gone", TableInput::path("gone", dir.path().join("missing.csv")))
        .output_dir(dir.path())
        .table_name("combined")
        .persist(fast_persist())
        .build()
        .unwrap()
        .run_at(at(0, 0, 0))
        .unwrap();

    assert_eq!(
        read(&report.latest.clone().unwrap()),
        "Date,AVG Open,AVG Close\n2024-01-01,99,100\n2024-01-02,109,110\n"
    );
    let a = &report.assembly;
    assert_eq!(a.loads.len(), 1);
    assert_eq!(a.failed_loads.len(), 2);
    assert_eq!(a.failed_loads[0].source_id, "B");
    assert_eq!(a.failed_loads[0].namespace, "AVG");
    assert!(matches!(a.failed_loads[0].reason, AlmanacError::InvalidArg(_)));
    assert_eq!(a.failed_loads[1].source_id, "gone");
    assert_eq!(a.failed_loads[1].namespace, "Gone");
    assert!(matches!(a.failed_loads[1].reason, AlmanacError::Io { .. }));
}

#[test]
fn tables_load_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fng.csv");
    std::fs::write(&path, SENTIMENT).unwrap();
    let (table, _) = Almanac::builder()
        .feature_table("Sentiment", TableInput::path("fng", &path))
        .output_dir(dir.path().join("out"))
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(table.rows(), 2);
}

#[test]
fn adj_close_fallback_yields_an_averaged_adj_close_column() {
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = standard(dir.path())
        .load_options(almanac::LoadOptions {
            adj_close_from_close: true,
            ..almanac::LoadOptions::default()
        })
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert_eq!(
        table.column_names(),
        vec!["AVG Open", "AVG Close", "AVG Adj Close", "Sentiment Fear Greed"]
    );
    assert_eq!(table.column("AVG Adj Close"), table.column("AVG Close"));
}
