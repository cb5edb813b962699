use almanac::Almanac;
use almanac_demos::common::{blockchain, exchanges, fear_greed, fixture_dir};
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,almanac=debug,almanac_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let fixtures = fixture_dir()?;
    let root = fixtures.path();

    let almanac = Almanac::builder()
        .average_group("AVG", exchanges(root))
        .feature_table("Sentiment", fear_greed(root))
        .feature_table("Blockchain", blockchain(root))
        .output_dir(root.join("out"))
        .build()?;

    let report = almanac.run()?;
    tracing::info!(
        rows = report.assembly.rows,
        columns = report.assembly.columns.len(),
        dropped = report.assembly.dropped.len(),
        "run finished"
    );
    Ok(())
}
