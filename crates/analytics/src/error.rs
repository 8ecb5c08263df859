use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data for {metric}: need {required} observations, got {actual}")]
    InsufficientData {
        metric: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Calculation error in metric '{metric}': {reason}")]
    Domain { metric: &'static str, reason: String },
}

impl AnalyticsError {
    pub(crate) fn domain(metric: &'static str, reason: impl Into<String>) -> Self {
        AnalyticsError::Domain {
            metric,
            reason: reason.into(),
        }
    }

    /// The metric that failed.
    pub fn metric(&self) -> &'static str {
        match self {
            AnalyticsError::InsufficientData { metric, .. } => metric,
            AnalyticsError::Domain { metric, .. } => metric,
        }
    }
}
