//! Request and response envelopes
//!
//! These are the serialized shapes the boundary exchanges with its
//! callers; the assembler translates between them and the engine types.

use serde::{Deserialize, Serialize};
use statsolver_core::Cell;

/// One raw cell as it arrives in a request body: a number, a string
/// (which may still coerce to a number during cleaning), or null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<&CellValue> for Cell {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Null => Cell::Null,
            CellValue::Number(v) => Cell::Number(*v),
            CellValue::Text(s) => Cell::Text(s.clone()),
        }
    }
}

/// ANOVA request: a table of rows plus the ordered group/column names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnovaRequest {
    pub columns: Vec<String>,
    pub data: Vec<Vec<CellValue>>,
    /// Significance level; defaults to 0.05
    #[serde(default)]
    pub alpha: Option<f64>,
}

/// Regression request: a table of rows, the ordered column names, and
/// the name of the dependent column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionRequest {
    pub columns: Vec<String>,
    pub data: Vec<Vec<CellValue>>,
    pub dependent: String,
    /// Significance level; defaults to 0.05
    #[serde(default)]
    pub alpha: Option<f64>,
}

/// A sub-result that either carries its value or a named explanation of
/// why it could not be computed. Serializes as the value itself, or as
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block<T> {
    Value(T),
    Error { error: String },
}

impl<T> Block<T> {
    /// Fold a computation result into a block, rendering the error as its
    /// display message
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Block::Value(value),
            Err(e) => Block::Error {
                error: e.to_string(),
            },
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Block::Value(v) => Some(v),
            Block::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Block::Value(_) => None,
            Block::Error { error } => Some(error),
        }
    }
}

/// Structured failure envelope: `{ok: false, error}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub ok: bool,
    pub error: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: message.into(),
        }
    }
}

/// Successful ANOVA result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnovaReport {
    pub ok: bool,
    /// Numeric cells that survived cleaning, across all groups
    pub n_data: usize,
    pub k_groups: usize,
    pub f_statistic: f64,
    pub p_value: f64,
    pub conclusion: String,
    pub means: Vec<f64>,
    pub global_mean: f64,
    /// Per-group between-group terms
    pub ssb: Vec<f64>,
    /// Per-group within-group terms
    pub sse: Vec<f64>,
    /// Human-readable rendering of each between-group term
    pub ssb_terms: Vec<String>,
    /// Human-readable rendering of each within-group term
    pub sse_terms: Vec<String>,
    pub ssb_total: f64,
    pub sse_total: f64,
    pub msb: f64,
    pub mse: f64,
}

/// ANOVA response: a report or a structured failure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnovaResponse {
    Report(Box<AnovaReport>),
    Failure(Failure),
}

impl AnovaResponse {
    pub fn report(&self) -> Option<&AnovaReport> {
        match self {
            AnovaResponse::Report(r) => Some(r),
            AnovaResponse::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            AnovaResponse::Report(_) => None,
            AnovaResponse::Failure(f) => Some(f),
        }
    }
}

/// One row of the regression ANOVA (type-II) table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnovaTableRow {
    pub term: String,
    pub df: f64,
    pub sum_sq: f64,
    pub mean_sq: f64,
    pub f_value: Option<f64>,
    pub p_value: Option<f64>,
}

/// One estimated coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefEntry {
    pub variable: String,
    pub coef: f64,
    pub p_value: f64,
}

/// Statistic and p-value of one test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEntry {
    pub statistic: f64,
    pub p_value: f64,
}

/// Jarque-Bera result with its moment estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JarqueBeraEntry {
    pub statistic: f64,
    pub p_value: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Residual normality battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalityBlock {
    pub shapiro_wilk: Block<TestEntry>,
    pub kolmogorov_smirnov: Block<TestEntry>,
    pub jarque_bera: Block<JarqueBeraEntry>,
}

/// Lagrange-multiplier heteroscedasticity test in both its LM and F forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HetEntry {
    pub lm_statistic: f64,
    pub lm_pvalue: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
}

/// VIF of one predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VifJson {
    pub variable: String,
    #[serde(rename = "VIF")]
    pub vif: f64,
}

/// Per-observation diagnostics row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluenceRow {
    /// Original (pre-cleaning) row index
    pub id: usize,
    pub observed: f64,
    pub predicted: f64,
    pub residual: f64,
    pub std_residual: f64,
    pub leverage: f64,
    pub cooks_distance: f64,
    pub outlier: bool,
}

/// Successful regression result with the diagnostic battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub ok: bool,
    pub n_obs: usize,
    pub n_vars: usize,
    pub r2: f64,
    pub r2_adj: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub aic: f64,
    pub bic: f64,
    pub anova: Block<Vec<AnovaTableRow>>,
    pub coefs: Vec<CoefEntry>,
    pub normality: NormalityBlock,
    pub breusch_pagan: Block<HetEntry>,
    pub white_test: Block<HetEntry>,
    pub durbin_watson: Block<f64>,
    pub vif: Block<Vec<VifJson>>,
    pub influence: Block<Vec<InfluenceRow>>,
    pub conclusion: String,
    /// Interpretive text from the narrative collaborator, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Block<String>>,
}

/// Regression response: a report or a structured failure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegressionResponse {
    Report(Box<RegressionReport>),
    Failure(Failure),
}

impl RegressionResponse {
    pub fn report(&self) -> Option<&RegressionReport> {
        match self {
            RegressionResponse::Report(r) => Some(r),
            RegressionResponse::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            RegressionResponse::Report(_) => None,
            RegressionResponse::Failure(f) => Some(f),
        }
    }
}
