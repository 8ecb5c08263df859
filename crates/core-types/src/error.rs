use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("A performance series needs at least one observation")]
    EmptySeries,

    #[error("Observation {index} is not a finite number")]
    NonFiniteValue { index: usize },

    #[error("Observation {index} must be strictly positive, got {value}")]
    NonPositiveValue { index: usize, value: f64 },
}
