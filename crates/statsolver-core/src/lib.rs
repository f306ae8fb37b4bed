//! statsolver-core: statistical computation engine for tabular analysis
//!
//! Cleans raw tabular input, runs a one-way ANOVA or an OLS multiple
//! regression, and derives the diagnostic battery (normality,
//! heteroscedasticity, autocorrelation, multicollinearity, influence)
//! over the fitted model. Transport, file ingestion, and narrative
//! generation live outside this crate.

pub mod anova;
pub mod clean;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod types;

pub use errors::{StatsError, StatsResult};
pub use types::*;
