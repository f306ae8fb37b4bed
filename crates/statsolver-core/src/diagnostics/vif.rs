//! Variance Inflation Factor (VIF) computation

use crate::errors::{StatsError, StatsResult};
use crate::models::ols_core;

/// VIF of one predictor against the rest
#[derive(Debug, Clone)]
pub struct VifEntry {
    /// Predictor name
    pub variable: String,
    /// 1 / (1 - R^2) of the predictor regressed on all other predictors;
    /// infinite under (near-)exact collinearity
    pub vif: f64,
}

/// Compute the VIF for each predictor by regressing it on the others.
///
/// VIF = 1 means no correlation with the other predictors; values above
/// 10 are conventionally read as strong multicollinearity. The intercept
/// is excluded.
///
/// # Arguments
/// * `names` - Predictor names, parallel to `predictors`
/// * `predictors` - Predictor columns (column-major)
pub fn compute_vif(names: &[String], predictors: &[Vec<f64>]) -> StatsResult<Vec<VifEntry>> {
    let k = predictors.len();
    if k == 0 {
        return Err(StatsError::NoPredictors);
    }
    if names.len() != k {
        return Err(StatsError::DimensionMismatch {
            y_len: names.len(),
            x_rows: k,
        });
    }

    if k == 1 {
        // A lone predictor has nothing to be collinear with
        return Ok(vec![VifEntry {
            variable: names[0].clone(),
            vif: 1.0,
        }]);
    }

    let mut entries = Vec::with_capacity(k);
    for j in 0..k {
        let others: Vec<Vec<f64>> = predictors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, col)| col.clone())
            .collect();

        let vif = match ols_core(&predictors[j], &others) {
            Ok(core) => {
                let r2 = core.r_squared;
                if r2 >= 0.9999 {
                    f64::INFINITY
                } else {
                    1.0 / (1.0 - r2)
                }
            }
            // A failed sub-regression (singular, constant predictor) reads
            // as complete collinearity
            Err(_) => f64::INFINITY,
        };

        entries.push(VifEntry {
            variable: names[j].clone(),
            vif,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_predictor() {
        let result = compute_vif(&names(&["x"]), &[vec![1.0, 2.0, 3.0, 4.0, 5.0]]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].vif, 1.0);
    }

    #[test]
    fn test_uncorrelated_predictors() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x2 = vec![5.0, 3.0, 1.0, 4.0, 2.0];
        let result = compute_vif(&names(&["x1", "x2"]), &[x1, x2]).unwrap();

        assert!(result[0].vif < 2.0);
        assert!(result[1].vif < 2.0);
    }

    #[test]
    fn test_exactly_collinear_predictors() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
        let result = compute_vif(&names(&["x1", "x2"]), &[x1, x2]).unwrap();

        assert!(result[0].vif > 1000.0 || result[0].vif.is_infinite());
        assert!(result[1].vif > 1000.0 || result[1].vif.is_infinite());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            compute_vif(&[], &[]),
            Err(StatsError::NoPredictors)
        ));
    }
}
