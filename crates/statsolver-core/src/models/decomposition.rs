//! Sum-of-squares decomposition of a fitted regression
//!
//! Type-II decomposition: each predictor's sum of squares is the increase
//! in residual sum of squares when that predictor alone is removed from
//! the model, tested against the full model's mean squared error.

use crate::anova::f_upper_tail;
use crate::errors::StatsResult;
use crate::models::ols::ols_core;
use crate::types::FittedModel;

/// One row of the regression ANOVA table
#[derive(Debug, Clone)]
pub struct AnovaRow {
    /// Term name: a predictor, or "Residual" for the error row
    pub term: String,
    /// Degrees of freedom
    pub df: f64,
    /// Sum of squares
    pub sum_sq: f64,
    /// Mean square
    pub mean_sq: f64,
    /// F statistic against the residual mean square (None on the error row)
    pub f_value: Option<f64>,
    /// Upper-tail p-value (None on the error row)
    pub p_value: Option<f64>,
}

/// Type-II ANOVA table for a fitted model.
///
/// Refits the model without each predictor in turn; a singular or
/// otherwise failing refit propagates as an error so the caller can
/// report the whole table as a named sub-error without touching the fit.
pub fn anova_decomposition(model: &FittedModel) -> StatsResult<Vec<AnovaRow>> {
    let n = model.n_observations;
    let p1 = model.n_features + 1;
    let df_resid = (n - p1) as f64;
    let mse = model.rss / df_resid;

    let mut rows = Vec::with_capacity(model.n_features + 1);

    for j in 0..model.n_features {
        let reduced: Vec<Vec<f64>> = model
            .predictors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, col)| col.clone())
            .collect();
        let sub = ols_core(&model.y, &reduced)?;

        let sum_sq = (sub.rss - model.rss).max(0.0);
        let (f_value, p_value) = if mse > 0.0 {
            let f = sum_sq / mse;
            (Some(f), Some(f_upper_tail(f, 1.0, df_resid)?))
        } else {
            (None, None)
        };

        rows.push(AnovaRow {
            term: model.predictor_names[j].clone(),
            df: 1.0,
            sum_sq,
            mean_sq: sum_sq,
            f_value,
            p_value,
        });
    }

    rows.push(AnovaRow {
        term: "Residual".to_string(),
        df: df_resid,
        sum_sq: model.rss,
        mean_sq: mse,
        f_value: None,
        p_value: None,
    });

    Ok(rows)
}
