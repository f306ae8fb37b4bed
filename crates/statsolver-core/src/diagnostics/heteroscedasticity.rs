//! Heteroscedasticity tests
//!
//! Both tests regress the squared residuals on an auxiliary design and
//! report the Lagrange-multiplier statistic n * R^2 alongside the
//! equivalent F form. Breusch-Pagan uses the model's own predictors;
//! White's test adds their squares and pairwise cross products.

use crate::anova::f_upper_tail;
use crate::errors::{StatsError, StatsResult};
use crate::models::ols_core;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of a Lagrange-multiplier heteroscedasticity test
#[derive(Debug, Clone)]
pub struct HetTestResult {
    /// LM statistic: n * R^2 of the auxiliary regression
    pub lm_statistic: f64,
    /// p-value of the LM statistic against chi-squared(k)
    pub lm_pvalue: f64,
    /// F form of the same test
    pub f_statistic: f64,
    /// p-value of the F form
    pub f_pvalue: f64,
}

/// Breusch-Pagan test: squared residuals regressed on the predictors.
///
/// # Arguments
/// * `residuals` - Raw residuals of the fitted model
/// * `predictors` - The model's predictor columns (column-major)
pub fn breusch_pagan(residuals: &[f64], predictors: &[Vec<f64>]) -> StatsResult<HetTestResult> {
    if predictors.is_empty() {
        return Err(StatsError::NoPredictors);
    }
    let e2: Vec<f64> = residuals.iter().map(|e| e * e).collect();
    lm_test(&e2, predictors)
}

/// White's test: squared residuals regressed on the predictors, their
/// squares, and all pairwise cross products.
///
/// Exact collinearity among the auxiliary terms surfaces as
/// `SingularMatrix` so the caller can report a named sub-error.
pub fn white(residuals: &[f64], predictors: &[Vec<f64>]) -> StatsResult<HetTestResult> {
    let k = predictors.len();
    if k == 0 {
        return Err(StatsError::NoPredictors);
    }

    let mut aux: Vec<Vec<f64>> = predictors.to_vec();
    for i in 0..k {
        aux.push(predictors[i].iter().map(|v| v * v).collect());
    }
    for i in 0..k {
        for j in (i + 1)..k {
            aux.push(
                predictors[i]
                    .iter()
                    .zip(&predictors[j])
                    .map(|(a, b)| a * b)
                    .collect(),
            );
        }
    }

    let e2: Vec<f64> = residuals.iter().map(|e| e * e).collect();
    lm_test(&e2, &aux)
}

fn lm_test(e2: &[f64], aux: &[Vec<f64>]) -> StatsResult<HetTestResult> {
    let core = ols_core(e2, aux)?;
    if core.rank_deficient {
        return Err(StatsError::SingularMatrix);
    }

    let n = e2.len() as f64;
    let k = aux.len() as f64;
    let df_resid = n - k - 1.0;
    if df_resid <= 0.0 {
        return Err(StatsError::InsufficientObservations {
            rows: e2.len(),
            min: aux.len() + 2,
        });
    }

    let r2 = core.r_squared;
    let lm_statistic = n * r2;
    let chi2 = ChiSquared::new(k).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let lm_pvalue = (1.0 - chi2.cdf(lm_statistic)).clamp(0.0, 1.0);

    let (f_statistic, f_pvalue) = if 1.0 - r2 <= 1e-12 {
        (f64::INFINITY, 0.0)
    } else {
        let f = (r2 / k) / ((1.0 - r2) / df_resid);
        (f, f_upper_tail(f, k, df_resid)?)
    };

    Ok(HetTestResult {
        lm_statistic,
        lm_pvalue,
        f_statistic,
        f_pvalue,
    })
}
