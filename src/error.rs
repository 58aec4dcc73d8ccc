use thiserror::Error;

// Unified error type for rbest

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RbError {
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("factorization error: {0}")]
    FactorError(String),
    #[error("solve error: {0}")]
    SolveError(String),
    #[error("squared induced norm is negative ({0:e})")]
    NegativeNormSquared(f64),
    #[error("accuracy check failed: {0}")]
    Accuracy(String),
    #[error("coercivity estimate must be positive and finite, got {0}")]
    InvalidCoercivity(f64),
    #[error("no linearly independent vectors left after orthonormalization")]
    LinearlyDependent,
}
