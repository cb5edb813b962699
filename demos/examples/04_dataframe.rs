#[cfg(feature = "dataframe")]
use almanac::Almanac;
#[cfg(feature = "dataframe")]
use almanac_demos::common::{exchanges, fear_greed, fixture_dir};

#[cfg(feature = "dataframe")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = fixture_dir()?;
    let root = fixtures.path();

    let (table, _) = Almanac::builder()
        .average_group("AVG", exchanges(root))
        .feature_table("Sentiment", fear_greed(root))
        .output_dir(root.join("out"))
        .build()?
        .assemble()?;
    let df = table.to_dataframe()?;
    println!("DataFrame shape: {} rows x {} cols", df.height(), df.width());
    Ok(())
}

#[cfg(not(feature = "dataframe"))]
fn main() {
    eprintln!("This example requires the 'dataframe' feature. Skipping.");
}
