use almanac::{Almanac, LoadOptions, WideTable};
use almanac_demos::common::{blockchain, exchanges, fear_greed, fixture_dir};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = fixture_dir()?;
    let root = fixtures.path();

    let almanac = Almanac::builder()
        .average_group("AVG", exchanges(root))
        .feature_table("Sentiment", fear_greed(root))
        .feature_table("Blockchain", blockchain(root))
        .load_options(LoadOptions {
            adj_close_from_close: true,
            ..LoadOptions::default()
        })
        .output_dir(root.join("out"))
        .build()?;
    let report = almanac.run()?;
    let Some(latest) = report.latest else {
        return Err("no latest table published".into());
    };

    // Keep price and sentiment only, then drop the averaging prefix.
    let combined = WideTable::from_path(&latest)?;
    let (kept, missing) = combined.select_columns(&[
        "AVG Open",
        "AVG Close",
        "Sentiment Fear Greed Index",
        "AVG Adj Close",
    ]);
    if !missing.is_empty() {
        println!("not in table: {missing:?}");
    }
    let (filtered, collisions) = kept.strip_prefix("AVG");
    for c in &collisions {
        println!("dropped: {c}");
    }

    let published =
        almanac.publish_table(&filtered, "filtered_dataset", chrono::Local::now().naive_local())?;
    println!("{}", std::fs::read_to_string(&published.latest)?);
    Ok(())
}
