//! Pluggable narrative generation
//!
//! An external service may turn the assembled numeric result into
//! interpretive prose. The call is the only blocking operation at this
//! boundary, so it always runs behind an explicit timeout, and any
//! failure degrades the narrative field without touching the numbers.

use crate::types::RegressionReport;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors from the narrative collaborator
#[derive(Debug, Clone, Error)]
pub enum NarrativeError {
    #[error("narrative generator failed: {0}")]
    Failed(String),

    #[error("narrative generator timed out after {0} ms")]
    TimedOut(u128),
}

/// Anything that can turn a textual result summary into interpretive prose
pub trait NarrativeGenerator: Send + Sync {
    fn interpret(&self, summary: &str) -> Result<String, NarrativeError>;
}

/// A generator plus the timeout it must answer within
pub struct NarrativeConfig {
    pub generator: Arc<dyn NarrativeGenerator>,
    pub timeout: Duration,
}

/// Run the generator on a worker thread and wait at most `timeout`.
///
/// A generator that errors, panics, or overruns the timeout yields a
/// `NarrativeError`; the caller attaches it to the response instead of
/// discarding the numeric result.
pub fn generate_with_timeout(
    generator: Arc<dyn NarrativeGenerator>,
    summary: String,
    timeout: Duration,
) -> Result<String, NarrativeError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = generator.interpret(&summary);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(NarrativeError::TimedOut(timeout.as_millis())),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(NarrativeError::Failed(
            "generator terminated unexpectedly".into(),
        )),
    }
}

/// Render the assembled regression result as the plain-text summary the
/// generator consumes.
pub fn build_summary(report: &RegressionReport) -> String {
    let mut out = String::new();

    out.push_str("Multiple linear regression results\n\n");

    out.push_str("Coefficients (variable, estimate, p-value):\n");
    for c in &report.coefs {
        out.push_str(&format!("  {}\t{}\t{}\n", c.variable, c.coef, c.p_value));
    }

    out.push_str(&format!(
        "\nModel summary:\n  observations: {}\n  predictors: {}\n  R2: {}\n  adjusted R2: {}\n  F: {}\n  F p-value: {}\n  conclusion: {}\n",
        report.n_obs,
        report.n_vars,
        report.r2,
        report.r2_adj,
        report.f_statistic,
        report.f_pvalue,
        report.conclusion,
    ));

    out.push_str("\nResidual assumption tests:\n");
    match report.normality.shapiro_wilk.value() {
        Some(t) => out.push_str(&format!("  Shapiro-Wilk p: {}\n", t.p_value)),
        None => out.push_str("  Shapiro-Wilk: unavailable\n"),
    }
    match report.normality.kolmogorov_smirnov.value() {
        Some(t) => out.push_str(&format!("  Kolmogorov-Smirnov p: {}\n", t.p_value)),
        None => out.push_str("  Kolmogorov-Smirnov: unavailable\n"),
    }
    match report.normality.jarque_bera.value() {
        Some(t) => out.push_str(&format!(
            "  Jarque-Bera p: {} (skewness {}, kurtosis {})\n",
            t.p_value, t.skewness, t.kurtosis
        )),
        None => out.push_str("  Jarque-Bera: unavailable\n"),
    }
    match report.durbin_watson.value() {
        Some(dw) => out.push_str(&format!("  Durbin-Watson: {dw}\n")),
        None => out.push_str("  Durbin-Watson: unavailable\n"),
    }

    match report.breusch_pagan.value() {
        Some(t) => out.push_str(&format!(
            "\nBreusch-Pagan: LM p {} / F p {}\n",
            t.lm_pvalue, t.f_pvalue
        )),
        None => out.push_str("\nBreusch-Pagan: unavailable\n"),
    }
    match report.white_test.value() {
        Some(t) => out.push_str(&format!(
            "White test: LM p {} / F p {}\n",
            t.lm_pvalue, t.f_pvalue
        )),
        None => out.push_str("White test: unavailable\n"),
    }

    match report.vif.value() {
        Some(entries) => {
            out.push_str("\nVIF (multicollinearity):\n");
            for v in entries {
                out.push_str(&format!("  {}\t{}\n", v.variable, v.vif));
            }
        }
        None => out.push_str("\nVIF: unavailable\n"),
    }

    out
}
