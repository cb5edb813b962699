use std::fs;
use std::io;
use std::path::Path;

use almanac::TableInput;
use tempfile::TempDir;

const BINANCE: &str = "\
Date,Open,High,Low,Close,Volume
2024-03-01,61000,62500,60200,62100,1200
2024-03-02,62100,62900,61500,62400,980
2024-03-04,62400,63800,62000,63500,1430
2024-03-05,63500,64100,61900,62000,1710
";

const KRAKEN: &str = "\
# exported 2024-03-06
Date,Close,Open,High,Low,Volume
2024-03-01 00:00:00,62080,61010,62480,60220,310
2024-03-03 00:00:00,62600,62380,62950,62010,275
2024-03-03 00:00:00,62640,62380,62950,62010,281
2024-03-05 00:00:00,62050,63490,64050,61950,402
";

const FEAR_GREED: &str = "\
Date,Fear Greed Index
2024-03-01,72
2024-03-05,79
";

const BLOCKCHAIN: &str = "\
Date,Hash Rate,Miner Revenue (USD),Transactions
2024-02-28,590,51000000,402000
2024-03-02,610,53000000,
2024-03-06,605,52500000,415000
";

/// Write the demo source tables into a fresh temporary directory.
///
/// # Errors
/// Returns any I/O error from creating the directory or writing files.
pub fn fixture_dir() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("exchanges"))?;
    fs::write(dir.path().join("exchanges/binance.csv"), BINANCE)?;
    fs::write(dir.path().join("exchanges/kraken.csv"), KRAKEN)?;
    fs::write(dir.path().join("fear_greed.csv"), FEAR_GREED)?;
    fs::write(dir.path().join("blockchain.csv"), BLOCKCHAIN)?;
    Ok(dir)
}

/// Exchange tables whose prices are averaged under the `AVG` namespace.
#[must_use]
pub fn exchanges(root: &Path) -> Vec<TableInput> {
    vec![
        TableInput::path("binance", root.join("exchanges/binance.csv")),
        TableInput::path("kraken", root.join("exchanges/kraken.csv")),
    ]
}

/// Sentiment feature table.
#[must_use]
pub fn fear_greed(root: &Path) -> TableInput {
    TableInput::path("fear_greed", root.join("fear_greed.csv"))
}

/// On-chain feature table, without the revenue column.
#[must_use]
pub fn blockchain(root: &Path) -> TableInput {
    TableInput::path("blockchain", root.join("blockchain.csv")).exclude("Miner Revenue (USD)")
}
