//! Exploratory Data Analysis for the House Prices Table
//!
//! Loads the training table of residential sales and answers the usual first
//! questions about it with Polars underneath.
//!
//! # Overview
//!
//! - **Target description**: count, mean, spread, quartiles, skewness and
//!   kurtosis of the sale price
//! - **Feature relationships**: Pearson coefficient and scatter points for
//!   numeric candidates, per-category box statistics for categorical ones
//! - **Correlation matrix**: every numeric column against every other, with
//!   the features ranked by their link to the target and the near-duplicate
//!   pairs called out
//! - **Missing data**: per-column audit and a fixed drop rule that leaves no
//!   missing value behind
//! - **Charts**: optional PNG output through plotters
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use housing_eda::{Analyzer, EdaConfig, EdaReport, LoadOptions, load_table};
//!
//! let config = EdaConfig::builder()
//!     .input("train.csv")
//!     .plot_dir("plots")
//!     .build()?;
//!
//! let df = load_table(&config.input, &LoadOptions::from(&config))?;
//! let output = Analyzer::new(config.clone()).run(df)?;
//!
//! println!("Skewness: {:?}", output.summary.skewness);
//! println!("Rows left after cleaning: {}", output.cleaned.height());
//!
//! let report = EdaReport::build(&config.input, &output);
//! println!("{}", report.to_json_pretty()?);
//! ```
//!
//! # Configuration
//!
//! [`EdaConfig`] can be built in code or read from a JSON file with
//! [`EdaConfig::from_json_file`]; missing fields take their defaults.

pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod missing;
pub mod plot;
pub mod report;
pub mod stats;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{AnalysisOutput, Analyzer};
pub use config::{ConfigValidationError, EdaConfig, EdaConfigBuilder};
pub use error::{EdaError, Result, ResultExt};
pub use loader::{LoadOptions, load_table};
pub use missing::{CleaningOutcome, MissingDataCleaner, MissingEntry, MissingReport};
pub use plot::ChartRenderer;
pub use report::{CorrelationSummary, EdaReport};
pub use stats::{
    BoxStats, CategoryGroup, CollinearPair, CorrelationMatrix, FeatureKind, RankedCorrelation,
    Relationship, SkewnessClass, TargetSummary,
};
