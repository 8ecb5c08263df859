//! # TradeFlow Analytics Engine
//!
//! Converts the daily account-value series of a listed Expert Advisor into the
//! statistics shown on its product page: gain, drawdown, number of trades,
//! Sharpe ratio, average daily change and win rate.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of storage or transport. It
//!   depends only on `core-types`.
//! - **Stateless Calculation:** `PerformanceAnalytics` holds no state. Each
//!   metric takes a `PerformanceSeries` and returns either a value rounded to
//!   two decimals or an `AnalyticsError`. NaN and infinity never leak out.
//!
//! ## Public API
//!
//! - `PerformanceAnalytics`: the metric functions and the aggregate `calculate`.
//! - `MetricsResult`: the record handed to the catalog/API layer.
//! - `AnalyticsError`: insufficient data vs. numerically invalid input.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{MetricsOptions, PerformanceAnalytics};
pub use error::AnalyticsError;
pub use report::{MetricsResult, format_percent};
