//! Regression model fitting and its sum-of-squares decomposition

mod decomposition;
mod ols;

pub use decomposition::{anova_decomposition, AnovaRow};
pub use ols::{
    fit_ols, MIN_OBSERVATIONS, REGRESSION_FAIL_TO_REJECT, REGRESSION_REJECT,
};

pub(crate) use ols::ols_core;
