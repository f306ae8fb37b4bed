use crate::errors::{StatsError, StatsResult};

/// One cell of a raw input table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Numeric value
    Number(f64),
    /// Textual value; may still coerce to a number during cleaning
    Text(String),
    /// Absent value
    Null,
}

/// A raw tabular dataset: ordered column names plus rows of cells.
///
/// Every row has exactly `columns.len()` cells; the constructor rejects
/// ragged rows and duplicate column names.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, validating rectangularity and column-name uniqueness
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> StatsResult<Self> {
        if columns.is_empty() {
            return Err(StatsError::EmptyInput { field: "columns" });
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(StatsError::DuplicateColumn(name.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(StatsError::RaggedRow {
                    row: i,
                    got: row.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// One ANOVA treatment level: the surviving numeric values of one column
#[derive(Debug, Clone)]
pub struct Group {
    /// Column name the group came from
    pub name: String,
    /// Numeric values that survived cleaning
    pub values: Vec<f64>,
    /// Arithmetic mean of the surviving values (full precision)
    pub mean: f64,
}

/// Output of grouped (column-wise) cleaning
#[derive(Debug, Clone)]
pub struct GroupedData {
    /// One group per column that kept at least one numeric value,
    /// in original column order
    pub groups: Vec<Group>,
    /// Total count of numeric cells that survived across all groups
    pub n_total: usize,
}

/// Output of aligned (row-wise) cleaning: a fully numeric rectangular table
#[derive(Debug, Clone)]
pub struct AlignedTable {
    /// Column names, in original order
    pub columns: Vec<String>,
    /// Row-major numeric data
    pub rows: Vec<Vec<f64>>,
    /// Original row index of each surviving row
    pub row_ids: Vec<usize>,
}

impl AlignedTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Grand-mean policy for the one-way ANOVA decomposition.
///
/// `OfGroupMeans` weights every group equally regardless of its size and is
/// the historical behavior of this service; `Pooled` is the textbook weighted
/// mean of all raw observations. The two agree whenever group sizes are
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrandMean {
    /// Unweighted mean of the per-group means (default)
    #[default]
    OfGroupMeans,
    /// Weighted (pooled) mean of all raw observations
    Pooled,
}

/// Options for one-way ANOVA
#[derive(Debug, Clone)]
pub struct AnovaOptions {
    /// Significance level for the F-test
    pub alpha: f64,
    /// Grand-mean policy for the decomposition
    pub grand_mean: GrandMean,
}

impl Default for AnovaOptions {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            grand_mean: GrandMean::default(),
        }
    }
}

/// Options for the regression fit
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Significance level for the overall F-test
    pub alpha: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

/// A fitted OLS model: data, estimates, residuals, and inference statistics
#[derive(Debug, Clone)]
pub struct FittedModel {
    /// Name of the response column
    pub response_name: String,
    /// Names of the predictor columns, in design-matrix order
    pub predictor_names: Vec<String>,
    /// Response vector
    pub y: Vec<f64>,
    /// Predictor columns (column-major, intercept excluded)
    pub predictors: Vec<Vec<f64>>,
    /// Original row index of each observation
    pub row_ids: Vec<usize>,
    /// Coefficients: intercept first, then one per predictor
    pub coefficients: Vec<f64>,
    /// Fitted values for the estimation sample
    pub fitted: Vec<f64>,
    /// Raw residuals: y - fitted
    pub residuals: Vec<f64>,
    /// Residual sum of squares
    pub rss: f64,
    /// Total sum of squares about the response mean
    pub tss: f64,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Standard errors of coefficients (intercept first)
    pub std_errors: Vec<f64>,
    /// t-statistics for coefficients
    pub t_values: Vec<f64>,
    /// Two-sided p-values for coefficients
    pub p_values: Vec<f64>,
    /// F-statistic for overall model significance
    pub f_statistic: f64,
    /// p-value for the F-statistic
    pub f_pvalue: f64,
    /// AIC of the fitted model
    pub aic: f64,
    /// BIC of the fitted model
    pub bic: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of predictors (excluding intercept)
    pub n_features: usize,
    /// Whether aliased columns were dropped during the solve
    pub rank_deficient: bool,
    /// (X'X)^(-1), generalized when the design is rank-deficient
    pub(crate) xtx_inv: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rejects_ragged_rows() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let rows = vec![
            vec![Cell::Number(1.0), Cell::Number(2.0)],
            vec![Cell::Number(3.0)],
        ];
        let result = Table::new(columns, rows);
        assert!(matches!(
            result,
            Err(StatsError::RaggedRow {
                row: 1,
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_table_rejects_duplicate_columns() {
        let columns = vec!["a".to_string(), "a".to_string()];
        let result = Table::new(columns, vec![]);
        assert!(matches!(result, Err(StatsError::DuplicateColumn(_))));
    }

    #[test]
    fn test_table_rejects_empty_columns() {
        let result = Table::new(vec![], vec![]);
        assert!(matches!(result, Err(StatsError::EmptyInput { .. })));
    }

    #[test]
    fn test_default_options() {
        let anova = AnovaOptions::default();
        assert_eq!(anova.alpha, 0.05);
        assert_eq!(anova.grand_mean, GrandMean::OfGroupMeans);

        let regression = RegressionOptions::default();
        assert_eq!(regression.alpha, 0.05);
    }
}
