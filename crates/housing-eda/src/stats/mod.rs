//! Statistics over the training table.
//!
//! - [`describe`]: count, mean, spread, quartiles, skewness and kurtosis
//! - [`relationship`]: target against one candidate feature
//! - [`correlation`]: Pearson coefficients, the full matrix and the rankings
//!   derived from it

pub mod correlation;
pub mod describe;
pub mod relationship;

pub use correlation::{CollinearPair, CorrelationMatrix, RankedCorrelation, pearson};
pub use describe::{SkewnessClass, TargetSummary, kurtosis, skewness};
pub use relationship::{BoxStats, CategoryGroup, FeatureKind, Relationship};
