//! Normality tests for regression residuals
//!
//! - Shapiro-Wilk (Royston AS R94 approximation, n in 3..=5000)
//! - Kolmogorov-Smirnov of standardized residuals against N(0, 1)

use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Result of the Shapiro-Wilk normality test
#[derive(Debug, Clone)]
pub struct ShapiroWilkResult {
    /// W statistic (0 < W <= 1, values near 1 suggest normality)
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Number of observations used
    pub n: usize,
}

/// Result of the Kolmogorov-Smirnov test against the standard normal
#[derive(Debug, Clone)]
pub struct KsResult {
    /// D statistic: the largest distance between the empirical and
    /// theoretical distribution functions
    pub statistic: f64,
    /// Asymptotic p-value
    pub p_value: f64,
    /// Number of observations used
    pub n: usize,
}

// Royston polynomial coefficients (AS R94)
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk test for normality.
///
/// Coefficients come from Blom-approximated normal order statistics with
/// Royston's polynomial corrections; the W statistic is mapped to a
/// p-value through his normalizing transformation.
///
/// # Arguments
/// * `data` - Sample data (typically residuals); NaN values are skipped
///
/// # Returns
/// `ShapiroWilkResult` with the W statistic and p-value
pub fn shapiro_wilk(data: &[f64]) -> StatsResult<ShapiroWilkResult> {
    let mut x: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let n = x.len();

    if n < 3 {
        return Err(StatsError::InsufficientObservations { rows: n, min: 3 });
    }
    if n > 5000 {
        return Err(StatsError::InvalidInput(
            "Shapiro-Wilk test is limited to n <= 5000".into(),
        ));
    }

    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "all values are identical, the Shapiro-Wilk statistic is undefined",
        ));
    }

    if n == 3 {
        // Exact for n = 3: a = [1/sqrt(2), 0, -1/sqrt(2)]
        let mean = (x[0] + x[1] + x[2]) / 3.0;
        let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
        let numerator = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
        let w = ((numerator * numerator) / ss).clamp(0.75, 1.0);
        let p = (1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos()).clamp(0.0, 1.0);
        return Ok(ShapiroWilkResult {
            statistic: w,
            p_value: p,
            n,
        });
    }

    let nn2 = n / 2;
    let a = sw_coefficients(n, nn2)?;

    // W = (sum a_i (x_(n+1-i) - x_(i)))^2 / sum (x_i - mean)^2
    let mut sa = 0.0;
    for i in 0..nn2 {
        sa += a[i] * (x[n - 1 - i] - x[i]);
    }
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    let w = ((sa * sa) / ss).min(1.0);

    let p_value = sw_p_value(w, n)?.clamp(0.0, 1.0);

    Ok(ShapiroWilkResult {
        statistic: w,
        p_value,
        n,
    })
}

/// Two-sided Kolmogorov-Smirnov test of standardized data against N(0, 1).
///
/// The data is centered by its mean and scaled by its sample standard
/// deviation (ddof = 1) before comparison; the p-value uses the asymptotic
/// Kolmogorov distribution with Stephens' finite-sample correction.
pub fn ks_normal(data: &[f64]) -> StatsResult<KsResult> {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let n = values.len();
    if n < 3 {
        return Err(StatsError::InsufficientObservations { rows: n, min: 3 });
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    if var <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "all values are identical, the standardized sample is undefined",
        ));
    }
    let sd = var.sqrt();

    let mut z: Vec<f64> = values.iter().map(|v| (v - mean) / sd).collect();
    z.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;

    let nf = n as f64;
    let mut d = 0.0_f64;
    for (i, zi) in z.iter().enumerate() {
        let cdf = normal.cdf(*zi);
        let d_plus = (i as f64 + 1.0) / nf - cdf;
        let d_minus = cdf - i as f64 / nf;
        d = d.max(d_plus).max(d_minus);
    }

    // Stephens' correction before the asymptotic Kolmogorov tail
    let lambda = (nf.sqrt() + 0.12 + 0.11 / nf.sqrt()) * d;
    let p_value = kolmogorov_tail(lambda).clamp(0.0, 1.0);

    Ok(KsResult {
        statistic: d,
        p_value,
        n,
    })
}

/// Asymptotic Kolmogorov survival function: 2 sum (-1)^(j-1) exp(-2 j^2 x^2)
fn kolmogorov_tail(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100 {
        let term = (-2.0 * (j as f64).powi(2) * lambda * lambda).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1e-12 {
            break;
        }
    }
    2.0 * sum
}

// Evaluate polynomial c[0] + c[1] x + c[2] x^2 + ... by Horner's method
fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut result = c[c.len() - 1];
    for i in (0..c.len() - 1).rev() {
        result = result * x + c[i];
    }
    result
}

// Shapiro-Wilk coefficients from Blom scores with Royston's corrections
fn sw_coefficients(n: usize, nn2: usize) -> StatsResult<Vec<f64>> {
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;

    let mut m = vec![0.0; nn2];
    let mut summ2 = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = normal.inverse_cdf(p);
        summ2 += *mi * *mi;
    }
    summ2 *= 2.0;
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; nn2];

    if n <= 5 {
        // Only the first coefficient is polynomial-corrected
        let fac_sq = summ2 - 2.0 * m[0] * m[0];
        let one_minus = 1.0 - 2.0 * a1 * a1;
        if fac_sq <= 0.0 || one_minus <= 0.0 {
            return Err(StatsError::DegenerateVariance(
                "Shapiro-Wilk coefficient normalization collapsed",
            ));
        }
        let fac = (fac_sq / one_minus).sqrt();
        a[0] = a1;
        for i in 1..nn2 {
            a[i] = -m[i] / fac;
        }
    } else {
        // The first two coefficients are polynomial-corrected
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let fac_sq = summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let one_minus = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        if fac_sq <= 0.0 || one_minus <= 0.0 {
            return Err(StatsError::DegenerateVariance(
                "Shapiro-Wilk coefficient normalization collapsed",
            ));
        }
        let fac = (fac_sq / one_minus).sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..nn2 {
            a[i] = -m[i] / fac;
        }
    }

    Ok(a)
}

// Map W to a p-value through Royston's normalizing transformation
fn sw_p_value(w: f64, n: usize) -> StatsResult<f64> {
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let nf = n as f64;

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return Ok(1.0);
    }
    let y = w1.ln();

    if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return Ok(0.0);
        }
        let y2 = -(gamma - y).ln();
        let m = sw_poly(&SW_C3, nf);
        let s = sw_poly(&SW_C4, nf).exp();
        if s <= 0.0 {
            return Ok(0.0);
        }
        Ok(1.0 - normal.cdf((y2 - m) / s))
    } else {
        let xx = nf.ln();
        let m = sw_poly(&SW_C5, xx);
        let s = sw_poly(&SW_C6, xx).exp();
        if s <= 0.0 {
            return Ok(0.0);
        }
        Ok(1.0 - normal.cdf((y - m) / s))
    }
}
