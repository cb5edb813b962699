use almanac::{Almanac, FillPolicy};
use almanac_demos::common::{blockchain, exchanges, fear_greed, fixture_dir};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = fixture_dir()?;
    let root = fixtures.path();

    let almanac = Almanac::builder()
        .average_group("AVG", exchanges(root))
        .feature_table("Sentiment", fear_greed(root))
        .feature_table("Blockchain", blockchain(root))
        .fill_policy(FillPolicy {
            max_missing_fraction: 0.8,
        })
        .output_dir(root.join("datasets/combined_dataset"))
        .build()?;

    let report = almanac.run()?;
    let assembly = &report.assembly;
    println!(
        "{} rows x {} columns (cadence {:?} days)",
        assembly.rows,
        assembly.columns.len(),
        assembly.cadence_days
    );
    for load in &assembly.loads {
        println!(
            "  {:<12} read {:>3} rows, skipped {}",
            load.source_id, load.rows_read, load.rows_skipped
        );
    }
    for attr in &assembly.attributions {
        for (source, span) in &attr.spans {
            println!("  {} <- {source}: {}..={}", attr.metric, span.start, span.end);
        }
    }
    for d in &assembly.dropped {
        println!("  omitted {}: {}", d.column, d.reason);
    }
    for f in &assembly.failed_loads {
        println!("  skipped table {} ({}): {}", f.source_id, f.namespace, f.reason);
    }
    if let Some(latest) = &report.latest {
        println!("{}", std::fs::read_to_string(latest)?);
    }
    Ok(())
}
