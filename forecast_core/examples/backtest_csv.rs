use forecast_core::{evaluate, SeriesNormalizer};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load data from CSV, defaulting to the bundled sample
    let csv_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("examples")
            .join("csv")
            .join("wti_sample.csv")
    });

    println!("Loading data from: {}", csv_path.display());
    let series = SeriesNormalizer::from_csv(&csv_path)?;
    println!(
        "Loaded {} observations, {} to {}",
        series.len(),
        series.dates()[0],
        series.last_date()
    );

    // Backtest the registry and forecast the next 7 days
    let outcome = evaluate(&series, 7, None)?;

    println!("\nBest method: {}", outcome.best_method);
    println!("Backtest MAPE: {:.4}%", outcome.mape);
    println!("Backtest RMSE: {:.4}", outcome.rmse);

    println!("\nForecast for the next 7 days:");
    for point in &outcome.series {
        println!("{}: {:.2}", point.date, point.forecast);
    }

    Ok(())
}
