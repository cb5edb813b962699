use std::fs;

use almanac::{Almanac, TableInput};

use crate::helpers::{at, standard};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_and_sequential_runs_write_identical_bytes() {
    let seq_dir = tempfile::tempdir().unwrap();
    let par_dir = tempfile::tempdir().unwrap();

    let seq = standard(seq_dir.path())
        .build()
        .unwrap()
        .run_at(at(3, 0, 0))
        .unwrap();
    let par = standard(par_dir.path())
        .build()
        .unwrap()
        .run_parallel_at(at(3, 0, 0))
        .await
        .unwrap();

    assert_eq!(
        fs::read(seq.latest.unwrap()).unwrap(),
        fs::read(par.latest.unwrap()).unwrap()
    );
    assert_eq!(seq.assembly, par.assembly);
}

#[tokio::test]
async fn parallel_assembly_matches_on_many_sources() {
    let sources: Vec<TableInput> = (0..8)
        .map(|i| {
            let mut csv = String::from("Date,Close,Volume\n");
            for d in (1..=28).filter(|d| d % (i + 2) != 0) {
                csv.push_str(&format!("2024-02-{d:02},{},{}\n", 100 + d * i, d));
            }
            TableInput::text(format!("ex{i}"), csv)
        })
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let almanac = Almanac::builder()
        .average_group("AVG", sources)
        .output_dir(dir.path())
        .parallel_timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap();

    let (seq_table, seq_report) = almanac.assemble().unwrap();
    let (par_table, par_report) = almanac.assemble_parallel().await.unwrap();
    assert_eq!(
        seq_table.to_csv_bytes().unwrap(),
        par_table.to_csv_bytes().unwrap()
    );
    assert_eq!(seq_report, par_report);
}

#[tokio::test]
async fn parallel_run_skips_unreadable_tables_like_the_sequential_one() {
    let dir = tempfile::tempdir().unwrap();
    let almanac = standard(dir.path())
        .feature_table("Gone", TableInput::path("gone", dir.path().join("missing.csv")))
        .build()
        .unwrap();

    let (seq_table, seq_report) = almanac.assemble().unwrap();
    let (par_table, par_report) = almanac.assemble_parallel().await.unwrap();
    assert_eq!(seq_table, par_table);
    assert_eq!(seq_report, par_report);
    assert_eq!(par_report.failed_loads.len(), 1);
    assert_eq!(par_report.failed_loads[0].source_id, "gone");
    assert_eq!(par_table.column_names().len(), 3);
}
