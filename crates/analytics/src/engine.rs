use crate::error::AnalyticsError;
use crate::report::MetricsResult;
use core_types::{PerformanceSeries, TradeCountVariant};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MAX_DRAWDOWN: &str = "max_drawdown";
const SHARPE_RATIO: &str = "sharpe_ratio";
const TOTAL_PROFIT: &str = "total_profit_percent";
const AVERAGE_DAILY_CHANGE: &str = "average_daily_change_percent";
const WIN_RATE: &str = "win_rate_percent";

/// Standard deviations below this are treated as a flat series.
const ZERO_VOLATILITY: f64 = 1e-12;

/// Caller-selected knobs for the aggregate report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsOptions {
    pub trade_count: TradeCountVariant,
    /// Per-period risk-free rate subtracted from the mean return.
    pub risk_free_rate: f64,
}

/// A stateless calculator for deriving performance metrics from an account-value series.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceAnalytics;

impl PerformanceAnalytics {
    pub fn new() -> Self {
        Self
    }

    /// Computes every metric for `series` in one record.
    ///
    /// Metrics that cannot be computed for this series are reported as `None`
    /// so the caller can render its own fallback (e.g. "N/A").
    pub fn calculate(
        &self,
        series: &PerformanceSeries,
        options: &MetricsOptions,
    ) -> MetricsResult {
        MetricsResult {
            max_drawdown_pct: available(self.max_drawdown(series)),
            number_of_trades: self.number_of_trades(series, options.trade_count),
            sharpe_ratio: available(self.sharpe_ratio(series, options.risk_free_rate)),
            total_profit_pct: available(self.total_profit_percent(series)),
            average_daily_change_pct: available(self.average_daily_change_percent(series)),
            gain_pct: available(self.gain(series)),
            win_rate_pct: available(self.win_rate_percent(series)),
        }
    }

    /// Largest peak-to-trough decline, in percent.
    ///
    /// A single observation cannot decline, so it yields zero.
    pub fn max_drawdown(&self, series: &PerformanceSeries) -> Result<Decimal, AnalyticsError> {
        let values = series.values();
        let mut peak = values[0];
        let mut max_drawdown = 0.0_f64;

        for &value in &values[1..] {
            if value > peak {
                peak = value;
                continue;
            }
            if peak <= 0.0 {
                return Err(AnalyticsError::domain(
                    MAX_DRAWDOWN,
                    format!("running peak {peak} is not positive"),
                ));
            }
            let drawdown = (peak - value) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        to_rounded_decimal(MAX_DRAWDOWN, max_drawdown * 100.0)
    }

    pub fn number_of_trades(
        &self,
        series: &PerformanceSeries,
        variant: TradeCountVariant,
    ) -> usize {
        match variant {
            TradeCountVariant::ObservationCount => series.len(),
            TradeCountVariant::TransitionCount => series.len() - 1,
        }
    }

    /// Mean per-period return over its population standard deviation, after
    /// subtracting `risk_free_rate` from the mean.
    pub fn sharpe_ratio(
        &self,
        series: &PerformanceSeries,
        risk_free_rate: f64,
    ) -> Result<Decimal, AnalyticsError> {
        if !risk_free_rate.is_finite() {
            return Err(AnalyticsError::domain(SHARPE_RATIO, "risk-free rate is not finite"));
        }

        let returns = period_returns(SHARPE_RATIO, series)?;
        let n = returns.len() as f64;
        let mean_return = returns.iter().sum::<f64>() / n;
        let variance = returns
            .iter()
            .map(|r| (r - mean_return) * (r - mean_return))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        if std_dev < ZERO_VOLATILITY {
            return Err(AnalyticsError::domain(
                SHARPE_RATIO,
                "standard deviation of returns is zero",
            ));
        }

        to_rounded_decimal(SHARPE_RATIO, (mean_return - risk_free_rate) / std_dev)
    }

    /// Sharpe ratio without a risk-free rate.
    pub fn simple_sharpe_ratio(
        &self,
        series: &PerformanceSeries,
    ) -> Result<Decimal, AnalyticsError> {
        self.sharpe_ratio(series, 0.0)
    }

    /// Percentage change from the first to the last observation.
    pub fn total_profit_percent(
        &self,
        series: &PerformanceSeries,
    ) -> Result<Decimal, AnalyticsError> {
        let first = series.first();
        if first <= 0.0 {
            return Err(AnalyticsError::domain(
                TOTAL_PROFIT,
                format!("first observation {first} is not positive"),
            ));
        }
        to_rounded_decimal(TOTAL_PROFIT, (series.last() - first) / first * 100.0)
    }

    /// Same figure as [`Self::total_profit_percent`], surfaced as "gain" on listing pages.
    pub fn gain(&self, series: &PerformanceSeries) -> Result<Decimal, AnalyticsError> {
        self.total_profit_percent(series)
    }

    pub fn average_daily_change_percent(
        &self,
        series: &PerformanceSeries,
    ) -> Result<Decimal, AnalyticsError> {
        let returns = period_returns(AVERAGE_DAILY_CHANGE, series)?;
        let mean_change =
            returns.iter().map(|r| r * 100.0).sum::<f64>() / returns.len() as f64;
        to_rounded_decimal(AVERAGE_DAILY_CHANGE, mean_change)
    }

    /// Share of period-to-period transitions where the value rose, in percent.
    pub fn win_rate_percent(&self, series: &PerformanceSeries) -> Result<Decimal, AnalyticsError> {
        let transitions = series.len() - 1;
        if transitions == 0 {
            return Err(insufficient(WIN_RATE, series));
        }
        let wins = series.transitions().filter(|(prev, curr)| curr > prev).count();
        to_rounded_decimal(WIN_RATE, wins as f64 / transitions as f64 * 100.0)
    }
}

/// Per-period simple returns `(s[i] - s[i-1]) / s[i-1]`.
fn period_returns(
    metric: &'static str,
    series: &PerformanceSeries,
) -> Result<Vec<f64>, AnalyticsError> {
    if series.len() < 2 {
        return Err(insufficient(metric, series));
    }
    series
        .transitions()
        .enumerate()
        .map(|(i, (prev, curr))| {
            if prev <= 0.0 {
                Err(AnalyticsError::domain(
                    metric,
                    format!("observation {i} ({prev}) is not positive"),
                ))
            } else {
                Ok((curr - prev) / prev)
            }
        })
        .collect()
}

fn insufficient(metric: &'static str, series: &PerformanceSeries) -> AnalyticsError {
    AnalyticsError::InsufficientData {
        metric,
        required: 2,
        actual: series.len(),
    }
}

/// Rounds to two decimals (half away from zero) and refuses non-finite input.
fn to_rounded_decimal(metric: &'static str, value: f64) -> Result<Decimal, AnalyticsError> {
    if !value.is_finite() {
        return Err(AnalyticsError::domain(metric, format!("result {value} is not finite")));
    }
    let decimal = Decimal::from_f64(value).ok_or_else(|| {
        AnalyticsError::domain(metric, format!("result {value} is out of decimal range"))
    })?;
    let rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // -0.00 renders oddly in the UI.
    if rounded.is_zero() {
        Ok(Decimal::ZERO)
    } else {
        Ok(rounded)
    }
}

fn available(result: Result<Decimal, AnalyticsError>) -> Option<Decimal> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(metric = e.metric(), error = %e, "Metric unavailable for series");
            None
        }
    }
}
