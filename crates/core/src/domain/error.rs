use thiserror::Error;

/// Rejected user input on the planner and assistant surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown risk tier: {0:?} (expected Conservative, Moderate or Aggressive)")]
    UnknownRiskTier(String),

    #[error("{field} must be within {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("question must be non-empty")]
    EmptyQuestion,
}
