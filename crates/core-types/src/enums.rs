use serde::{Deserialize, Serialize};

/// Selects how "number of trades" is counted for a performance series.
///
/// The catalog shows two different figures depending on the view, so the
/// caller always picks one explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum TradeCountVariant {
    /// One trade per observation (`len`). Used by the per-listing detail view.
    #[default]
    ObservationCount,
    /// One trade per adjacent pair (`len - 1`). Used by the generated report.
    TransitionCount,
}

/// Risk classification attached to a listed Expert Advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}
