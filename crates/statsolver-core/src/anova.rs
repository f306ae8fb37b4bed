//! One-way analysis of variance
//!
//! Decomposes total variation into between-group (SSB) and within-group
//! (SSE) sums of squares and tests equality of group means with an F-test.
//! `f_oneway` provides an independent direct computation of the same test
//! for cross-checking the decomposition.

use crate::errors::{StatsError, StatsResult};
use crate::types::{AnovaOptions, GrandMean, GroupedData};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Conclusion when the null hypothesis of equal means is rejected
pub const ANOVA_REJECT: &str =
    "Reject the null hypothesis: there are significant differences between the group means";
/// Conclusion when the null hypothesis cannot be rejected
pub const ANOVA_FAIL_TO_REJECT: &str =
    "Fail to reject the null hypothesis: there are no significant differences between the group means";

/// Full one-way ANOVA output, including the per-group decomposition terms
#[derive(Debug, Clone)]
pub struct AnovaResult {
    /// F statistic
    pub f_statistic: f64,
    /// p-value (upper tail of F(df_between, df_within))
    pub p_value: f64,
    /// Conclusion at the requested significance level
    pub conclusion: String,
    /// Group (column) names
    pub group_names: Vec<String>,
    /// Group sizes
    pub counts: Vec<usize>,
    /// Group means
    pub means: Vec<f64>,
    /// Grand mean under the configured policy
    pub grand_mean: f64,
    /// Per-group between-group terms: n_i * (mean_i - grand_mean)^2
    pub ssb: Vec<f64>,
    /// Per-group within-group terms: sum of squared deviations from the group mean
    pub sse: Vec<f64>,
    /// Between-groups sum of squares
    pub ssb_total: f64,
    /// Within-groups sum of squares
    pub sse_total: f64,
    /// Mean square between: SSB / df_between
    pub msb: f64,
    /// Mean square error: SSE / df_within
    pub mse: f64,
    /// Between-groups degrees of freedom: k - 1
    pub df_between: usize,
    /// Within-groups degrees of freedom: N - k
    pub df_within: usize,
    /// Total surviving observations across groups
    pub n_total: usize,
    /// Number of groups
    pub k_groups: usize,
}

/// One-way ANOVA over cleaned groups.
///
/// # Arguments
/// * `data` - Cleaned groups, one per factor level
/// * `options` - Significance level and grand-mean policy
///
/// # Returns
/// `AnovaResult` with the F-test and the full sum-of-squares decomposition
pub fn one_way_anova(data: &GroupedData, options: &AnovaOptions) -> StatsResult<AnovaResult> {
    if !(options.alpha > 0.0 && options.alpha < 1.0) {
        return Err(StatsError::InvalidAlpha(options.alpha));
    }

    let k = data.groups.len();
    if k < 2 {
        return Err(StatsError::TooFewGroups { found: k });
    }
    for group in &data.groups {
        if group.values.len() < 2 {
            return Err(StatsError::InsufficientGroup {
                name: group.name.clone(),
                len: group.values.len(),
            });
        }
    }

    let n_total: usize = data.groups.iter().map(|g| g.values.len()).sum();
    let means: Vec<f64> = data.groups.iter().map(|g| g.mean).collect();

    let grand_mean = match options.grand_mean {
        GrandMean::OfGroupMeans => means.iter().sum::<f64>() / k as f64,
        GrandMean::Pooled => {
            data.groups
                .iter()
                .map(|g| g.values.iter().sum::<f64>())
                .sum::<f64>()
                / n_total as f64
        }
    };

    let ssb: Vec<f64> = data
        .groups
        .iter()
        .map(|g| g.values.len() as f64 * (g.mean - grand_mean).powi(2))
        .collect();
    let sse: Vec<f64> = data
        .groups
        .iter()
        .map(|g| g.values.iter().map(|v| (v - g.mean).powi(2)).sum())
        .collect();

    let ssb_total: f64 = ssb.iter().sum();
    let sse_total: f64 = sse.iter().sum();

    let df_between = k - 1;
    let df_within = n_total - k;

    if sse_total <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "every group is constant, the within-group sum of squares is zero",
        ));
    }

    let msb = ssb_total / df_between as f64;
    let mse = sse_total / df_within as f64;
    let f_statistic = msb / mse;

    let p_value = f_upper_tail(f_statistic, df_between as f64, df_within as f64)?;

    let conclusion = if p_value < options.alpha {
        ANOVA_REJECT.to_string()
    } else {
        ANOVA_FAIL_TO_REJECT.to_string()
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        conclusion,
        group_names: data.groups.iter().map(|g| g.name.clone()).collect(),
        counts: data.groups.iter().map(|g| g.values.len()).collect(),
        means,
        grand_mean,
        ssb,
        sse,
        ssb_total,
        sse_total,
        msb,
        mse,
        df_between,
        df_within,
        n_total,
        k_groups: k,
    })
}

/// Direct one-way F-test on raw groups (textbook pooled grand mean).
///
/// Independent of the decomposition above; used to cross-check it.
/// Returns (F, p-value).
pub fn f_oneway(groups: &[&[f64]]) -> StatsResult<(f64, f64)> {
    let k = groups.len();
    if k < 2 {
        return Err(StatsError::TooFewGroups { found: k });
    }
    for (i, g) in groups.iter().enumerate() {
        if g.len() < 2 {
            return Err(StatsError::InsufficientGroup {
                name: format!("group {i}"),
                len: g.len(),
            });
        }
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let grand = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_total as f64;

    let mut ssb = 0.0;
    let mut sse = 0.0;
    for g in groups {
        let mean = g.iter().sum::<f64>() / g.len() as f64;
        ssb += g.len() as f64 * (mean - grand).powi(2);
        sse += g.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    if sse <= 0.0 {
        return Err(StatsError::DegenerateVariance(
            "every group is constant, the within-group sum of squares is zero",
        ));
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ssb / df_between) / (sse / df_within);
    let p = f_upper_tail(f, df_between, df_within)?;
    Ok((f, p))
}

/// Upper-tail probability of F(df1, df2) at `f`
pub(crate) fn f_upper_tail(f: f64, df1: f64, df2: f64) -> StatsResult<f64> {
    let dist =
        FisherSnedecor::new(df1, df2).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok((1.0 - dist.cdf(f)).clamp(0.0, 1.0))
}
