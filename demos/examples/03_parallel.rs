use std::time::Duration;

use almanac::Almanac;
use almanac_demos::common::{blockchain, exchanges, fear_greed, fixture_dir};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = fixture_dir()?;
    let root = fixtures.path();

    let almanac = Almanac::builder()
        .average_group("AVG", exchanges(root))
        .feature_table("Sentiment", fear_greed(root))
        .feature_table("Blockchain", blockchain(root))
        .output_dir(root.join("out"))
        .parallel_timeout(Duration::from_secs(10))
        .build()?;

    let (sequential, _) = almanac.assemble()?;
    let report = almanac.run_parallel().await?;
    let Some(latest) = report.latest else {
        return Err("no latest table published".into());
    };
    let parallel = std::fs::read(&latest)?;
    if parallel != sequential.to_csv_bytes()? {
        return Err("parallel output differs from sequential output".into());
    }
    println!("parallel run matches sequential run ({} bytes)", parallel.len());
    Ok(())
}
