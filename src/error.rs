use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Error)]
pub enum CasError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("non-linear equations at indices {equations:?}")]
    NonLinear { equations: Vec<usize> },
    #[error("system has {equations} equations for {unknowns} unknowns")]
    Mismatch { equations: usize, unknowns: usize },
    #[error("singular system: rank {rank} for {unknowns} unknowns")]
    Singular { rank: usize, unknowns: usize },
    #[error("inconsistent system (reduced row {row})")]
    Inconsistent { row: usize },
    #[error("unknown problem: {0}")]
    UnknownProblem(String),
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("unknown listed more than once: {0}")]
    DuplicateUnknown(String),
}
