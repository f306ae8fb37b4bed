//! statsolver-api: transport-agnostic boundary for the statistics engine
//!
//! Assembles engine output into structured `{ok, ...}` responses. Engine
//! precondition failures become `{ok: false, error}` envelopes; diagnostic
//! sub-tests that fail individually become named error blocks inside an
//! otherwise successful response. All floats are rounded to a fixed
//! display precision at this boundary only.

pub mod narrative;
pub mod types;

pub use narrative::{
    build_summary, generate_with_timeout, NarrativeConfig, NarrativeError, NarrativeGenerator,
};
pub use types::*;

use statsolver_core::anova::{one_way_anova, AnovaResult};
use statsolver_core::clean::{clean_aligned, clean_grouped};
use statsolver_core::diagnostics::{
    breusch_pagan, compute_vif, durbin_watson, influence_measures, jarque_bera, ks_normal,
    shapiro_wilk, white, HetTestResult,
};
use statsolver_core::models::{
    anova_decomposition, fit_ols, REGRESSION_FAIL_TO_REJECT, REGRESSION_REJECT,
};
use statsolver_core::{
    AnovaOptions, Cell, FittedModel, RegressionOptions, StatsResult, Table,
};

/// Default significance level when a request carries none
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Decimal places every float is rounded to at the boundary
const DISPLAY_DECIMALS: f64 = 1e4;

fn round4(x: f64) -> f64 {
    if x.is_finite() {
        (x * DISPLAY_DECIMALS).round() / DISPLAY_DECIMALS
    } else {
        x
    }
}

fn to_table(columns: &[String], data: &[Vec<CellValue>]) -> StatsResult<Table> {
    let rows: Vec<Vec<Cell>> = data
        .iter()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();
    Table::new(columns.to_vec(), rows)
}

/// Run a one-way ANOVA request end to end.
///
/// Never panics or returns a Rust-level error: every failure is folded
/// into the `{ok: false, error}` envelope.
pub fn run_anova(request: &AnovaRequest) -> AnovaResponse {
    match anova_report(request) {
        Ok(report) => AnovaResponse::Report(Box::new(report)),
        Err(e) => AnovaResponse::Failure(Failure::new(e.to_string())),
    }
}

fn anova_report(request: &AnovaRequest) -> StatsResult<AnovaReport> {
    let table = to_table(&request.columns, &request.data)?;
    let grouped = clean_grouped(&table);

    let options = AnovaOptions {
        alpha: request.alpha.unwrap_or(DEFAULT_ALPHA),
        ..Default::default()
    };
    let result = one_way_anova(&grouped, &options)?;

    let (ssb_terms, sse_terms) = decomposition_terms(&result);

    Ok(AnovaReport {
        ok: true,
        n_data: result.n_total,
        k_groups: result.k_groups,
        f_statistic: round4(result.f_statistic),
        p_value: round4(result.p_value),
        conclusion: result.conclusion.clone(),
        means: result.means.iter().copied().map(round4).collect(),
        global_mean: round4(result.grand_mean),
        ssb: result.ssb.iter().copied().map(round4).collect(),
        sse: result.sse.iter().copied().map(round4).collect(),
        ssb_terms,
        sse_terms,
        ssb_total: round4(result.ssb_total),
        sse_total: round4(result.sse_total),
        msb: round4(result.msb),
        mse: round4(result.mse),
    })
}

/// Render each group's decomposition term as a display string
fn decomposition_terms(result: &AnovaResult) -> (Vec<String>, Vec<String>) {
    let grand = round4(result.grand_mean);
    let ssb = result
        .group_names
        .iter()
        .zip(&result.counts)
        .zip(result.means.iter().zip(&result.ssb))
        .map(|((name, count), (mean, term))| {
            format!(
                "{}: {} * ({} - {})^2 = {}",
                name,
                count,
                round4(*mean),
                grand,
                round4(*term)
            )
        })
        .collect();
    let sse = result
        .group_names
        .iter()
        .zip(result.means.iter().zip(&result.sse))
        .map(|(name, (mean, term))| {
            format!("{}: sum((x - {})^2) = {}", name, round4(*mean), round4(*term))
        })
        .collect();
    (ssb, sse)
}

/// Run a regression request end to end, optionally handing the assembled
/// summary to a narrative collaborator.
///
/// A collaborator failure or timeout degrades the `narrative` field; it
/// never discards the numeric result.
pub fn run_regression(
    request: &RegressionRequest,
    narrative: Option<&NarrativeConfig>,
) -> RegressionResponse {
    match regression_report(request, narrative) {
        Ok(report) => RegressionResponse::Report(Box::new(report)),
        Err(e) => RegressionResponse::Failure(Failure::new(e.to_string())),
    }
}

fn regression_report(
    request: &RegressionRequest,
    narrative: Option<&NarrativeConfig>,
) -> StatsResult<RegressionReport> {
    let table = to_table(&request.columns, &request.data)?;
    let aligned = clean_aligned(&table);

    let options = RegressionOptions {
        alpha: request.alpha.unwrap_or(DEFAULT_ALPHA),
    };
    let model = fit_ols(&aligned, &request.dependent, &options)?;

    let conclusion = if model.f_pvalue < options.alpha {
        REGRESSION_REJECT.to_string()
    } else {
        REGRESSION_FAIL_TO_REJECT.to_string()
    };

    let mut report = RegressionReport {
        ok: true,
        n_obs: model.n_observations,
        n_vars: model.n_features,
        r2: round4(model.r_squared),
        r2_adj: round4(model.adj_r_squared),
        f_statistic: round4(model.f_statistic),
        f_pvalue: round4(model.f_pvalue),
        aic: round4(model.aic),
        bic: round4(model.bic),
        anova: Block::from_result(anova_decomposition(&model).map(anova_table_rows)),
        coefs: coefficient_entries(&model),
        normality: normality_blocks(&model),
        breusch_pagan: Block::from_result(
            breusch_pagan(&model.residuals, &model.predictors).map(het_entry),
        ),
        white_test: Block::from_result(
            white(&model.residuals, &model.predictors).map(het_entry),
        ),
        durbin_watson: Block::from_result(durbin_watson(&model.residuals).map(round4)),
        vif: Block::from_result(
            compute_vif(&model.predictor_names, &model.predictors).map(|entries| {
                entries
                    .into_iter()
                    .map(|e| VifJson {
                        variable: e.variable,
                        vif: round4(e.vif),
                    })
                    .collect()
            }),
        ),
        influence: Block::from_result(influence_measures(&model).map(|m| influence_rows(&model, m))),
        conclusion,
        narrative: None,
    };

    if let Some(config) = narrative {
        let summary = build_summary(&report);
        report.narrative = Some(Block::from_result(generate_with_timeout(
            config.generator.clone(),
            summary,
            config.timeout,
        )));
    }

    Ok(report)
}

fn coefficient_entries(model: &FittedModel) -> Vec<CoefEntry> {
    let names = std::iter::once("const".to_string()).chain(model.predictor_names.iter().cloned());
    names
        .zip(model.coefficients.iter().zip(&model.p_values))
        .map(|(variable, (coef, p_value))| CoefEntry {
            variable,
            coef: round4(*coef),
            p_value: round4(*p_value),
        })
        .collect()
}

fn het_entry(result: HetTestResult) -> HetEntry {
    HetEntry {
        lm_statistic: round4(result.lm_statistic),
        lm_pvalue: round4(result.lm_pvalue),
        f_statistic: round4(result.f_statistic),
        f_pvalue: round4(result.f_pvalue),
    }
}

fn anova_table_rows(rows: Vec<statsolver_core::models::AnovaRow>) -> Vec<AnovaTableRow> {
    rows.into_iter()
        .map(|r| AnovaTableRow {
            term: r.term,
            df: r.df,
            sum_sq: round4(r.sum_sq),
            mean_sq: round4(r.mean_sq),
            f_value: r.f_value.map(round4),
            p_value: r.p_value.map(round4),
        })
        .collect()
}

fn normality_blocks(model: &FittedModel) -> NormalityBlock {
    NormalityBlock {
        shapiro_wilk: Block::from_result(shapiro_wilk(&model.residuals).map(|r| TestEntry {
            statistic: round4(r.statistic),
            p_value: round4(r.p_value),
        })),
        kolmogorov_smirnov: Block::from_result(ks_normal(&model.residuals).map(|r| TestEntry {
            statistic: round4(r.statistic),
            p_value: round4(r.p_value),
        })),
        jarque_bera: Block::from_result(jarque_bera(&model.residuals).map(|r| JarqueBeraEntry {
            statistic: round4(r.statistic),
            p_value: round4(r.p_value),
            skewness: round4(r.skewness),
            kurtosis: round4(r.kurtosis),
        })),
    }
}

fn influence_rows(
    model: &FittedModel,
    measures: statsolver_core::diagnostics::InfluenceMeasures,
) -> Vec<InfluenceRow> {
    (0..model.n_observations)
        .map(|i| InfluenceRow {
            id: model.row_ids[i],
            observed: round4(model.y[i]),
            predicted: round4(model.fitted[i]),
            residual: round4(model.residuals[i]),
            std_residual: round4(measures.standardized_residuals[i]),
            leverage: round4(measures.leverage[i]),
            cooks_distance: round4(measures.cooks_distance[i]),
            outlier: measures.outliers[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.23456789), 1.2346);
        assert_eq!(round4(-0.00004), -0.0);
        assert_eq!(round4(48.0), 48.0);
        assert!(round4(f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_unknown_dependent_is_structured_failure() {
        let request = RegressionRequest {
            columns: vec!["x".into(), "y".into()],
            data: (0..6)
                .map(|i| {
                    vec![
                        CellValue::Number(i as f64),
                        CellValue::Number(2.0 * i as f64),
                    ]
                })
                .collect(),
            dependent: "z".into(),
            alpha: None,
        };
        let response = run_regression(&request, None);
        let failure = response.failure().expect("should fail");
        assert!(!failure.ok);
        assert!(failure.error.contains("'z'"));
    }

    #[test]
    fn test_ragged_request_is_structured_failure() {
        let request = AnovaRequest {
            columns: vec!["a".into(), "b".into()],
            data: vec![
                vec![CellValue::Number(1.0), CellValue::Number(2.0)],
                vec![CellValue::Number(3.0)],
            ],
            alpha: None,
        };
        let response = run_anova(&request);
        assert!(response.failure().is_some());
    }

    #[test]
    fn test_decomposition_term_strings() {
        let request = AnovaRequest {
            columns: vec!["a".into(), "b".into(), "c".into()],
            data: vec![
                vec![
                    CellValue::Number(2.0),
                    CellValue::Number(6.0),
                    CellValue::Number(10.0),
                ],
                vec![
                    CellValue::Number(3.0),
                    CellValue::Number(7.0),
                    CellValue::Number(11.0),
                ],
                vec![
                    CellValue::Number(4.0),
                    CellValue::Number(8.0),
                    CellValue::Number(12.0),
                ],
            ],
            alpha: None,
        };
        let response = run_anova(&request);
        let report = response.report().expect("should succeed");
        assert_eq!(report.ssb_terms[0], "a: 3 * (3 - 7)^2 = 48");
        assert_eq!(report.sse_terms[1], "b: sum((x - 7)^2) = 2");
    }
}
