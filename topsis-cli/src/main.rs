use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Rank the alternatives in a CSV table with the TOPSIS method.
///
/// The input file must have one identifier column followed by two or more
/// numeric criteria columns. The output file holds the original columns plus
/// `Topsis Score` and `Rank`, in the original row order.
#[derive(Parser, Debug)]
#[command(name = "topsis")]
#[command(version)]
#[command(about = "Rank alternatives described by numeric criteria using TOPSIS")]
struct Args {
    /// CSV file with an identifier column followed by numeric criteria columns
    input: PathBuf,

    /// Comma-separated positive weights, one per criteria column (e.g. "1,1,2")
    weights: String,

    /// Comma-separated impacts, '+' or '-', one per criteria column (e.g. "+,+,-")
    #[arg(allow_hyphen_values = true)]
    impacts: String,

    /// Destination CSV file for the ranked result
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let result = topsis::rank_file(&args.input, &args.weights, &args.impacts)?;
    result.write(&args.output)?;
    println!("Result written to {}", args.output.display());
    Ok(())
}
