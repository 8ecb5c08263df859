//! Shared value types for the TradeFlow workspace.
//!
//! Everything here is plain data with validation at construction. No I/O.

pub mod enums;
pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::{RiskLevel, TradeCountVariant};
pub use error::CoreError;
pub use series::{PerformanceSeries, SeriesDocument, SeriesPayload};
