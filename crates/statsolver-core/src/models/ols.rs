//! Ordinary Least Squares (OLS) regression
//!
//! The coefficient solve goes through a QR least-squares factorization of
//! the design matrix. The normal-equations inverse (X'X)^(-1), needed for
//! coefficient inference and the leverage diagnostics, is computed by
//! Gauss-Jordan elimination with partial pivoting; when the design is
//! exactly collinear the elimination drops aliased columns and the fit
//! falls back to the resulting generalized inverse instead of aborting.

use crate::anova::f_upper_tail;
use crate::diagnostics::compute_aic_bic;
use crate::errors::{StatsError, StatsResult};
use crate::types::{AlignedTable, FittedModel, RegressionOptions};
use faer::prelude::*;
use faer::Mat;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Minimum surviving rows for a reliable fit
pub const MIN_OBSERVATIONS: usize = 5;

/// Conclusion when the overall F-test rejects
pub const REGRESSION_REJECT: &str = "Reject the null hypothesis: the model is significant";
/// Conclusion when the overall F-test fails to reject
pub const REGRESSION_FAIL_TO_REJECT: &str =
    "Fail to reject the null hypothesis: the model is not significant";

/// Core least-squares output shared by the main fit and the auxiliary
/// regressions (VIF, heteroscedasticity tests, decomposition refits)
#[derive(Debug, Clone)]
pub(crate) struct OlsCore {
    /// Coefficients, intercept first
    pub coefficients: Vec<f64>,
    /// Fitted values
    pub fitted: Vec<f64>,
    /// Raw residuals
    pub residuals: Vec<f64>,
    /// Residual sum of squares
    pub rss: f64,
    /// Total sum of squares about the response mean
    pub tss: f64,
    /// R-squared
    pub r_squared: f64,
    /// Whether aliased columns were dropped during the solve
    pub rank_deficient: bool,
    /// (X'X)^(-1), generalized when rank-deficient
    pub xtx_inv: Vec<Vec<f64>>,
}

/// Least-squares fit of `y` on `predictors` plus an intercept.
///
/// `predictors` is column-major and may be empty (intercept-only model).
pub(crate) fn ols_core(y: &[f64], predictors: &[Vec<f64>]) -> StatsResult<OlsCore> {
    let n = y.len();
    if n == 0 {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    for col in predictors {
        if col.len() != n {
            return Err(StatsError::DimensionMismatch {
                y_len: n,
                x_rows: col.len(),
            });
        }
    }

    let p1 = predictors.len() + 1;
    if n < p1 {
        return Err(StatsError::InsufficientObservations { rows: n, min: p1 });
    }

    // QR least squares on the design with intercept
    let x_mat = Mat::from_fn(n, p1, |i, j| if j == 0 { 1.0 } else { predictors[j - 1][i] });
    let y_mat = Mat::from_fn(n, 1, |i, _| y[i]);
    let qr = x_mat.qr();
    let beta_qr = qr.solve_lstsq(y_mat.as_ref());
    let mut coefficients: Vec<f64> = (0..p1).map(|j| beta_qr.read(j, 0)).collect();

    // Normal equations, for (X'X)^(-1) and the rank-deficient fallback
    let mut xtx = vec![vec![0.0; p1]; p1];
    let mut xty = vec![0.0; p1];
    for i in 0..n {
        for j in 0..p1 {
            let x_ij = if j == 0 { 1.0 } else { predictors[j - 1][i] };
            xty[j] += x_ij * y[i];
            for l in j..p1 {
                let x_il = if l == 0 { 1.0 } else { predictors[l - 1][i] };
                xtx[j][l] += x_ij * x_il;
            }
        }
    }
    for j in 0..p1 {
        for l in 0..j {
            xtx[j][l] = xtx[l][j];
        }
    }

    let (xtx_inv, dropped) = generalized_inverse(&xtx);
    let mut rank_deficient = dropped;

    if dropped || coefficients.iter().any(|c| !c.is_finite()) {
        // Aliased columns get a zero coefficient
        coefficients = (0..p1)
            .map(|j| (0..p1).map(|l| xtx_inv[j][l] * xty[l]).sum())
            .collect();
        rank_deficient = true;
    }

    let fitted: Vec<f64> = (0..n)
        .map(|i| {
            let mut v = coefficients[0];
            for j in 1..p1 {
                v += coefficients[j] * predictors[j - 1][i];
            }
            v
        })
        .collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();

    let rss: f64 = residuals.iter().map(|e| e * e).sum();
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();

    if tss <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "the response has zero variance",
        ));
    }
    let r_squared = (1.0 - rss / tss).clamp(0.0, 1.0);

    Ok(OlsCore {
        coefficients,
        fitted,
        residuals,
        rss,
        tss,
        r_squared,
        rank_deficient,
        xtx_inv,
    })
}

/// Fit an OLS regression of `response` on every other column of the
/// aligned table, with an intercept.
///
/// # Arguments
/// * `table` - Fully numeric table from aligned cleaning
/// * `response` - Name of the dependent column
/// * `options` - Significance level for the overall F-test
///
/// # Returns
/// A `FittedModel` with coefficients, fit statistics, and inference
pub fn fit_ols(
    table: &AlignedTable,
    response: &str,
    options: &RegressionOptions,
) -> StatsResult<FittedModel> {
    if !(options.alpha > 0.0 && options.alpha < 1.0) {
        return Err(StatsError::InvalidAlpha(options.alpha));
    }
    let resp_idx = table
        .columns
        .iter()
        .position(|c| c == response)
        .ok_or_else(|| StatsError::UnknownColumn(response.to_string()))?;

    let n = table.n_rows();
    if n == 0 {
        return Err(StatsError::EmptyAfterCleaning);
    }
    if n < MIN_OBSERVATIONS {
        return Err(StatsError::InsufficientObservations {
            rows: n,
            min: MIN_OBSERVATIONS,
        });
    }

    let k = table.columns.len() - 1;
    if k == 0 {
        return Err(StatsError::NoPredictors);
    }
    if n <= k + 1 {
        return Err(StatsError::InsufficientObservations {
            rows: n,
            min: k + 2,
        });
    }

    let y: Vec<f64> = table.rows.iter().map(|r| r[resp_idx]).collect();
    let predictor_names: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != resp_idx)
        .map(|(_, c)| c.clone())
        .collect();
    let predictors: Vec<Vec<f64>> = (0..table.columns.len())
        .filter(|j| *j != resp_idx)
        .map(|j| table.rows.iter().map(|r| r[j]).collect())
        .collect();

    let core = ols_core(&y, &predictors)?;

    let p1 = k + 1;
    let df_resid = (n - p1) as f64;
    let sigma2 = core.rss / df_resid;
    let residual_std_error = sigma2.sqrt();

    // Coefficient inference from the (generalized) normal-equations inverse
    let t_dist = StudentsT::new(0.0, 1.0, df_resid)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let mut std_errors = Vec::with_capacity(p1);
    let mut t_values = Vec::with_capacity(p1);
    let mut p_values = Vec::with_capacity(p1);
    for j in 0..p1 {
        let se = (sigma2 * core.xtx_inv[j][j]).max(0.0).sqrt();
        let coef = core.coefficients[j];
        let (t, p) = if se > 0.0 {
            let t = coef / se;
            (t, (2.0 * (1.0 - t_dist.cdf(t.abs()))).clamp(0.0, 1.0))
        } else if coef.abs() < f64::EPSILON {
            // Aliased column dropped by the solve
            (0.0, 1.0)
        } else {
            (f64::INFINITY * coef.signum(), 0.0)
        };
        std_errors.push(se);
        t_values.push(t);
        p_values.push(p);
    }

    let (f_statistic, f_pvalue) = if core.r_squared >= 1.0 - 1e-12 {
        // Perfect fit: the F ratio has a zero denominator
        (f64::INFINITY, 0.0)
    } else {
        let f = (core.r_squared / k as f64) / ((1.0 - core.r_squared) / df_resid);
        let p = f_upper_tail(f, k as f64, df_resid)?;
        (f, p)
    };

    let adj_r_squared = 1.0 - (1.0 - core.r_squared) * (n as f64 - 1.0) / df_resid;
    let (aic, bic) = compute_aic_bic(core.rss, n, p1)?;

    Ok(FittedModel {
        response_name: response.to_string(),
        predictor_names,
        y,
        predictors,
        row_ids: table.row_ids.clone(),
        coefficients: core.coefficients,
        fitted: core.fitted,
        residuals: core.residuals,
        rss: core.rss,
        tss: core.tss,
        r_squared: core.r_squared,
        adj_r_squared,
        residual_std_error,
        std_errors,
        t_values,
        p_values,
        f_statistic,
        f_pvalue,
        aic,
        bic,
        n_observations: n,
        n_features: k,
        rank_deficient: core.rank_deficient,
        xtx_inv: core.xtx_inv,
    })
}

/// Invert a matrix by Gauss-Jordan elimination with partial pivoting.
///
/// On a pivot falling below tolerance, returns the offending elimination
/// column so the caller can drop it.
fn invert_with_pivoting(mat: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, usize> {
    let n = mat.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let scale = mat
        .iter()
        .enumerate()
        .map(|(i, row)| row[i].abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let tol = 1e-12 * scale;

    // Augmented matrix [A | I]
    let mut aug: Vec<Vec<f64>> = mat
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut new_row = row.clone();
            new_row.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            new_row
        })
        .collect();

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            if aug[row][col].abs() > max_val {
                max_val = aug[row][col].abs();
                max_row = row;
            }
        }

        if max_val < tol {
            return Err(col);
        }

        if max_row != col {
            aug.swap(col, max_row);
        }

        let pivot = aug[col][col];
        for j in 0..(2 * n) {
            aug[col][j] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[row][col];
                for j in 0..(2 * n) {
                    aug[row][j] -= factor * aug[col][j];
                }
            }
        }
    }

    Ok(aug.iter().map(|row| row[n..].to_vec()).collect())
}

/// Generalized inverse of a symmetric matrix: dependent columns are
/// dropped from the elimination and their rows/columns zeroed, so an
/// aliased coefficient maps to exactly zero.
///
/// Returns the inverse and whether any column was dropped.
fn generalized_inverse(mat: &[Vec<f64>]) -> (Vec<Vec<f64>>, bool) {
    let n = mat.len();
    let mut keep: Vec<usize> = (0..n).collect();

    loop {
        let sub: Vec<Vec<f64>> = keep
            .iter()
            .map(|&r| keep.iter().map(|&c| mat[r][c]).collect())
            .collect();
        match invert_with_pivoting(&sub) {
            Ok(inv) => {
                let mut full = vec![vec![0.0; n]; n];
                for (a, &ra) in keep.iter().enumerate() {
                    for (b, &rb) in keep.iter().enumerate() {
                        full[ra][rb] = inv[a][b];
                    }
                }
                return (full, keep.len() < n);
            }
            Err(col) => {
                keep.remove(col);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligned(columns: &[&str], rows: Vec<Vec<f64>>) -> AlignedTable {
        let row_ids = (0..rows.len()).collect();
        AlignedTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            row_ids,
        }
    }

    fn noisy_line() -> AlignedTable {
        // y = 2x + 3 with small noise
        let noise = [0.05, -0.03, 0.04, -0.05, 0.02, 0.01, -0.04, 0.03, -0.02, -0.01];
        let rows: Vec<Vec<f64>> = (0..10)
            .map(|i| {
                let x = (i + 1) as f64;
                vec![x, 2.0 * x + 3.0 + noise[i]]
            })
            .collect();
        aligned(&["x", "y"], rows)
    }

    #[test]
    fn test_simple_fit_recovers_line() {
        let model = fit_ols(&noisy_line(), "y", &RegressionOptions::default()).unwrap();

        assert!((model.coefficients[0] - 3.0).abs() < 0.2); // intercept
        assert!((model.coefficients[1] - 2.0).abs() < 0.05); // slope
        assert!(model.r_squared > 0.99);
        assert!(model.p_values[1] < 0.05);
        assert!(model.f_pvalue < 0.05);
        assert!(!model.rank_deficient);
        assert_eq!(model.n_observations, 10);
        assert_eq!(model.n_features, 1);
    }

    #[test]
    fn test_residuals_sum_to_zero_with_intercept() {
        let model = fit_ols(&noisy_line(), "y", &RegressionOptions::default()).unwrap();
        let sum: f64 = model.residuals.iter().sum();
        assert!(sum.abs() < 1e-8);
    }

    #[test]
    fn test_unknown_column() {
        let result = fit_ols(&noisy_line(), "z", &RegressionOptions::default());
        assert!(matches!(result, Err(StatsError::UnknownColumn(_))));
    }

    #[test]
    fn test_empty_after_cleaning() {
        let t = aligned(&["x", "y"], vec![]);
        let result = fit_ols(&t, "y", &RegressionOptions::default());
        assert!(matches!(result, Err(StatsError::EmptyAfterCleaning)));
    }

    #[test]
    fn test_too_few_observations() {
        let t = aligned(
            &["x", "y"],
            vec![vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]],
        );
        let result = fit_ols(&t, "y", &RegressionOptions::default());
        assert!(matches!(
            result,
            Err(StatsError::InsufficientObservations { rows: 3, min: 5 })
        ));
    }

    #[test]
    fn test_no_predictors() {
        let t = aligned(&["y"], (0..6).map(|i| vec![i as f64]).collect());
        let result = fit_ols(&t, "y", &RegressionOptions::default());
        assert!(matches!(result, Err(StatsError::NoPredictors)));
    }

    #[test]
    fn test_wide_table_needs_more_rows() {
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| {
                let x = i as f64;
                vec![x, x * x, (x + 1.0).ln(), x.sin(), 2.0 * x + 1.0]
            })
            .collect();
        let t = aligned(&["a", "b", "c", "d", "y"], rows);
        let result = fit_ols(&t, "y", &RegressionOptions::default());
        assert!(matches!(
            result,
            Err(StatsError::InsufficientObservations { rows: 5, min: 6 })
        ));
    }

    #[test]
    fn test_exact_collinearity_still_fits() {
        // x2 = 2 * x1; the fit survives with an aliased column
        let noise = [0.02, -0.01, 0.03, -0.02, 0.01, 0.0, -0.03, 0.02];
        let rows: Vec<Vec<f64>> = (0..8)
            .map(|i| {
                let x = (i + 1) as f64;
                vec![x, 2.0 * x, 3.0 * x + 1.0 + noise[i]]
            })
            .collect();
        let t = aligned(&["x1", "x2", "y"], rows);
        let model = fit_ols(&t, "y", &RegressionOptions::default()).unwrap();

        assert!(model.rank_deficient);
        assert!(model.r_squared > 0.99);
        // One of the aliased pair is dropped to exactly zero
        assert!(model.coefficients[1] == 0.0 || model.coefficients[2] == 0.0);
        // Fitted values still track the response
        for (f, r) in model.fitted.iter().zip(t.rows.iter()) {
            assert!((f - r[2]).abs() < 0.5);
        }
    }

    #[test]
    fn test_constant_response_degenerate() {
        let rows: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 7.0]).collect();
        let t = aligned(&["x", "y"], rows);
        let result = fit_ols(&t, "y", &RegressionOptions::default());
        assert!(matches!(result, Err(StatsError::DegenerateVariance(_))));
    }

    #[test]
    fn test_invalid_alpha() {
        let options = RegressionOptions { alpha: 0.0 };
        let result = fit_ols(&noisy_line(), "y", &options);
        assert!(matches!(result, Err(StatsError::InvalidAlpha(_))));
    }

    #[test]
    fn test_invert_with_pivoting_identity() {
        let mat = vec![vec![2.0, 0.0], vec![0.0, 4.0]];
        let inv = invert_with_pivoting(&mat).unwrap();
        assert!((inv[0][0] - 0.5).abs() < 1e-12);
        assert!((inv[1][1] - 0.25).abs() < 1e-12);
        assert!(inv[0][1].abs() < 1e-12);
    }

    #[test]
    fn test_generalized_inverse_drops_dependent_column() {
        // Second row/column is an exact multiple of the first
        let mat = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let (inv, dropped) = generalized_inverse(&mat);
        assert!(dropped);
        // The surviving 1x1 block inverts, the dropped one is zeroed
        assert!((inv[0][0] - 1.0).abs() < 1e-12);
        assert_eq!(inv[1][1], 0.0);
    }

    #[test]
    fn test_ols_core_intercept_only() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let core = ols_core(&y, &[]).unwrap();
        assert!((core.coefficients[0] - 2.5).abs() < 1e-10);
        assert!((core.rss - core.tss).abs() < 1e-10);
    }
}
