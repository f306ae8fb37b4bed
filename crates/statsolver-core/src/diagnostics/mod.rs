//! Diagnostic tests over a fitted regression model
//!
//! Every test here is independent and individually fault-isolated: a
//! failing test returns its own error and never invalidates the fit or
//! the other tests.

mod autocorrelation;
mod heteroscedasticity;
mod influence;
mod information_criteria;
mod jarque_bera;
mod normality;
mod vif;

pub use autocorrelation::durbin_watson;
pub use heteroscedasticity::{breusch_pagan, white, HetTestResult};
pub use influence::{influence_measures, InfluenceMeasures, OUTLIER_THRESHOLD};
pub use information_criteria::{compute_aic, compute_aic_bic, compute_bic};
pub use jarque_bera::{jarque_bera, JarqueBeraResult};
pub use normality::{ks_normal, shapiro_wilk, KsResult, ShapiroWilkResult};
pub use vif::{compute_vif, VifEntry};
