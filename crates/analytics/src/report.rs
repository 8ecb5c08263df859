use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived statistics for one performance series.
///
/// This struct is the output of `PerformanceAnalytics::calculate` and the data
/// transfer object relayed to the catalog/API layer. Field names serialize in
/// camelCase to match the JSON the front end reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_drawdown_pct: Option<Decimal>,
    pub number_of_trades: usize,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sharpe_ratio: Option<Decimal>, // None for flat or too-short series
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_profit_pct: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_daily_change_pct: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub gain_pct: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub win_rate_pct: Option<Decimal>,
}

impl MetricsResult {
    /// Renders an optional metric with two decimals, or "N/A".
    pub fn display(value: Option<Decimal>) -> String {
        match value {
            Some(v) => format!("{v:.2}"),
            None => "N/A".to_string(),
        }
    }

    /// Like [`MetricsResult::display`], with a trailing percent sign.
    pub fn display_percent(value: Option<Decimal>) -> String {
        value.map(format_percent).unwrap_or_else(|| "N/A".to_string())
    }
}

/// Formats a percentage the way listing pages show it, e.g. `12.40%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{value:.2}%")
}
