//! Autocorrelation of residuals

use crate::errors::{StatsError, StatsResult};

/// Durbin-Watson statistic for first-order autocorrelation.
///
/// DW = sum (e_i - e_{i-1})^2 / sum e_i^2, interpreted on the 0-4 scale:
/// values near 2 indicate no autocorrelation, near 0 positive, near 4
/// negative. No p-value is attached.
pub fn durbin_watson(residuals: &[f64]) -> StatsResult<f64> {
    let n = residuals.len();
    if n < 2 {
        return Err(StatsError::InsufficientObservations { rows: n, min: 2 });
    }

    let denom: f64 = residuals.iter().map(|e| e * e).sum();
    if denom <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "all residuals are zero, the Durbin-Watson ratio is undefined",
        ));
    }

    let num: f64 = residuals
        .windows(2)
        .map(|w| (w[1] - w[0]).powi(2))
        .sum();

    Ok(num / denom)
}
