//! Per-observation influence measures
//!
//! Leverage (hat diagonal), internally studentized residuals, and Cook's
//! distance, with an outlier flag on the standardized residual.

use crate::errors::{StatsError, StatsResult};
use crate::types::FittedModel;

/// An observation is flagged as an outlier when its absolute
/// standardized residual exceeds this threshold
pub const OUTLIER_THRESHOLD: f64 = 2.0;

/// Influence measures, one entry per observation
#[derive(Debug, Clone)]
pub struct InfluenceMeasures {
    /// Hat-matrix diagonal: sensitivity of a fitted value to its own
    /// observation
    pub leverage: Vec<f64>,
    /// Internally studentized residuals: e / (s * sqrt(1 - h))
    pub standardized_residuals: Vec<f64>,
    /// Cook's distance
    pub cooks_distance: Vec<f64>,
    /// Whether |standardized residual| > 2
    pub outliers: Vec<bool>,
}

/// Compute leverage, standardized residuals, and Cook's distance for
/// every observation of a fitted model.
pub fn influence_measures(model: &FittedModel) -> StatsResult<InfluenceMeasures> {
    let n = model.n_observations;
    let p1 = model.n_features + 1;
    let s = model.residual_std_error;

    if s <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "the residuals have zero variance, influence measures are undefined",
        ));
    }

    // h_ii = x_i' (X'X)^(-1) x_i, with the intercept in position 0
    let mut leverage = Vec::with_capacity(n);
    for i in 0..n {
        let mut h_ii = 0.0;
        for j in 0..p1 {
            let x_ij = if j == 0 { 1.0 } else { model.predictors[j - 1][i] };
            for l in 0..p1 {
                let x_il = if l == 0 { 1.0 } else { model.predictors[l - 1][i] };
                h_ii += x_ij * model.xtx_inv[j][l] * x_il;
            }
        }
        leverage.push(h_ii);
    }

    let mut standardized = Vec::with_capacity(n);
    let mut cooks = Vec::with_capacity(n);
    let mut outliers = Vec::with_capacity(n);
    for i in 0..n {
        let h = leverage[i];
        let one_minus_h = (1.0 - h).max(1e-10);
        let r = model.residuals[i] / (s * one_minus_h.sqrt());
        let d = r * r * h / (p1 as f64 * one_minus_h);

        standardized.push(r);
        cooks.push(d);
        outliers.push(r.abs() > OUTLIER_THRESHOLD);
    }

    Ok(InfluenceMeasures {
        leverage,
        standardized_residuals: standardized,
        cooks_distance: cooks,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fit_ols;
    use crate::types::{AlignedTable, RegressionOptions};

    fn fitted_line_with_outlier() -> FittedModel {
        // y = x everywhere except one interior point pushed far off
        let rows: Vec<Vec<f64>> = (1..=21)
            .map(|i| {
                let x = i as f64;
                let y = if i == 11 { 50.0 } else { x };
                vec![x, y]
            })
            .collect();
        let table = AlignedTable {
            columns: vec!["x".to_string(), "y".to_string()],
            rows,
            row_ids: (0..21).collect(),
        };
        fit_ols(&table, "y", &RegressionOptions::default()).unwrap()
    }

    #[test]
    fn test_leverage_bounds_and_trace() {
        let model = fitted_line_with_outlier();
        let influence = influence_measures(&model).unwrap();

        for &h in &influence.leverage {
            assert!(h > 0.0 && h < 1.0);
        }
        // The hat diagonal sums to the number of parameters
        let trace: f64 = influence.leverage.iter().sum();
        assert!((trace - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_planted_outlier_is_flagged() {
        let model = fitted_line_with_outlier();
        let influence = influence_measures(&model).unwrap();

        assert!(influence.outliers[10]);
        assert_eq!(influence.outliers.iter().filter(|&&o| o).count(), 1);
        assert!(influence.standardized_residuals[10] > OUTLIER_THRESHOLD);
    }

    #[test]
    fn test_cooks_distance_peaks_at_outlier() {
        let model = fitted_line_with_outlier();
        let influence = influence_measures(&model).unwrap();

        let (argmax, _) = influence
            .cooks_distance
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &d)| {
                if d > acc.1 {
                    (i, d)
                } else {
                    acc
                }
            });
        assert_eq!(argmax, 10);
        assert!(influence.cooks_distance.iter().all(|d| d.is_finite()));
    }
}
