//! Jarque-Bera test for normality
//!
//! Checks whether sample skewness and kurtosis match a normal
//! distribution: JB = n/6 * (S^2 + K^2/4) ~ chi-squared(2) under the null.

use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of the Jarque-Bera test
#[derive(Debug, Clone)]
pub struct JarqueBeraResult {
    /// JB test statistic
    pub statistic: f64,
    /// p-value for the test
    pub p_value: f64,
    /// Sample skewness
    pub skewness: f64,
    /// Sample kurtosis (excess)
    pub kurtosis: f64,
    /// Number of observations
    pub n: usize,
}

/// Compute the Jarque-Bera test statistic for normality
///
/// # Arguments
/// * `data` - Sample data (typically residuals); NaN values are skipped
///
/// # Returns
/// `JarqueBeraResult` with test statistic, p-value, skewness, and kurtosis
pub fn jarque_bera(data: &[f64]) -> StatsResult<JarqueBeraResult> {
    let clean: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let n = clean.len();

    if n < 3 {
        return Err(StatsError::InsufficientObservations { rows: n, min: 3 });
    }

    let mean: f64 = clean.iter().sum::<f64>() / n as f64;

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &x in &clean {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n as f64;
    m3 /= n as f64;
    m4 /= n as f64;

    if m2 <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "all values are identical, skewness and kurtosis are undefined",
        ));
    }

    let std_dev = m2.sqrt();
    let skewness = m3 / (std_dev * std_dev * std_dev);
    let kurtosis = m4 / (m2 * m2) - 3.0;

    let statistic = (n as f64 / 6.0) * (skewness * skewness + kurtosis * kurtosis / 4.0);

    let chi2 = ChiSquared::new(2.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (1.0 - chi2.cdf(statistic)).clamp(0.0, 1.0);

    Ok(JarqueBeraResult {
        statistic,
        p_value,
        skewness,
        kurtosis,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_flat_sample() {
        // Symmetric: skewness 0; kurtosis of the four-point grid is -1.36
        let result = jarque_bera(&[-1.5, -0.5, 0.5, 1.5]).unwrap();
        assert!(result.skewness.abs() < 1e-12);
        assert!((result.kurtosis - (-1.36)).abs() < 1e-10);
        // JB = (4/6) * (1.36^2 / 4)
        assert!((result.statistic - 0.30826666666666663).abs() < 1e-10);
        // chi-squared(2) upper tail is exp(-x/2)
        assert!((result.p_value - (-result.statistic / 2.0).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_skewed_sample() {
        let data = [
            1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0,
            20.0, 50.0,
        ];
        let result = jarque_bera(&data).unwrap();
        assert!(result.skewness > 1.0);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            jarque_bera(&[1.0, 2.0]),
            Err(StatsError::InsufficientObservations { .. })
        ));
    }

    #[test]
    fn test_constant_data() {
        assert!(matches!(
            jarque_bera(&[3.0, 3.0, 3.0, 3.0]),
            Err(StatsError::DegenerateVariance(_))
        ));
    }

    #[test]
    fn test_nan_skipped() {
        let result = jarque_bera(&[1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0, 5.0]).unwrap();
        assert_eq!(result.n, 5);
    }
}
