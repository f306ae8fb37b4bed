use thiserror::Error;

/// Errors that can occur during statistical computations
#[derive(Error, Debug)]
pub enum StatsError {
    // Request validation errors
    #[error("Invalid alpha parameter: {0} (must be in (0, 1))")]
    InvalidAlpha(f64),

    #[error("The dependent variable '{0}' does not exist among the columns")]
    UnknownColumn(String),

    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    #[error("Row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("Dimension mismatch: y has {y_len} elements, X has {x_rows} rows")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Insufficient data after cleaning
    #[error("The data is empty after removing non-numeric or missing values")]
    EmptyAfterCleaning,

    #[error("Insufficient observations: {rows} rows after cleaning (need at least {min} for a reliable fit)")]
    InsufficientObservations { rows: usize, min: usize },

    #[error("No independent (predictor) variables are available")]
    NoPredictors,

    #[error("ANOVA requires at least 2 groups (found {found})")]
    TooFewGroups { found: usize },

    #[error("Group '{name}' has {len} values (each group needs at least 2)")]
    InsufficientGroup { name: String, len: usize },

    // Numerical degeneracy, caught per sub-test
    #[error("Zero variance: {0}")]
    DegenerateVariance(&'static str),

    #[error("Design matrix is singular or near-singular (exact collinearity)")]
    SingularMatrix,

    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
