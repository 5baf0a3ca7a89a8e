//! # Forecast Core
//!
//! Backtest-driven evaluation of simple price forecasting heuristics.
//!
//! ## Features
//!
//! - Normalization of loosely shaped tabular input into a clean daily series
//! - Chronological train/test splitting with a capped held-out window
//! - A fixed registry of baseline methods (naive, moving average, EWM)
//! - Method selection by held-out MAPE with RMSE as the tie-breaker
//! - Forward forecasts dated day by day past the last observation
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_core::{evaluate, SeriesNormalizer};
//!
//! fn main() -> forecast_core::Result<()> {
//!     // Load data
//!     let series = SeriesNormalizer::from_csv("prices.csv")?;
//!
//!     // Backtest the registry and project a week ahead
//!     let outcome = evaluate(&series, 7, None)?;
//!
//!     println!("best method: {}", outcome.best_method);
//!     println!("mape: {:.4}%, rmse: {:.4}", outcome.mape, outcome.rmse);
//!     for point in &outcome.series {
//!         println!("{} {:.2}", point.date, point.forecast);
//!     }
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod evaluate;
pub mod methods;
pub mod metrics;
pub mod split;

// Re-export commonly used types
pub use crate::data::{PriceSeries, SeriesNormalizer};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluate::{evaluate, Evaluation, ForecastPoint, MethodScore};
pub use crate::methods::Method;
pub use crate::split::{split, TrainTestSplit, DEFAULT_TEST_SIZE, MIN_POINTS};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
