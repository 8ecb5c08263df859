use crate::error::ConfigError;
use core_types::TradeCountVariant;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub generator: GeneratorSettings,
    pub logging: LoggingSettings,
}

/// Parameters handed to the analytics engine for every report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Per-period risk-free rate subtracted from the mean return in the Sharpe ratio.
    /// 0.0001 corresponds to 0.01% per day.
    pub risk_free_rate: f64,
    /// Which "number of trades" definition the report shows.
    pub trade_count: TradeCountVariant,
}

/// Bounds for the demo Expert Advisor listing generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// How many listings to generate.
    pub count: usize,
    /// Length range of each performance history, in days.
    pub min_days: usize,
    pub max_days: usize,
    /// ROI range in percent.
    pub min_roi_pct: f64,
    pub max_roi_pct: f64,
    /// Win rate range in percent.
    pub min_win_rate_pct: u32,
    pub max_win_rate_pct: u32,
    /// Account value on day zero.
    pub initial_value: f64,
    /// Upper bound for the listing price.
    pub max_price: u32,
    /// Fixes the random sequence so the same listings are produced every run.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// These allow a user to omit any section from their toml and still have it
// work with sensible defaults.

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            count: 50,
            min_days: 30,
            max_days: 365,
            min_roi_pct: 5.0,
            max_roi_pct: 50.0,
            min_win_rate_pct: 50,
            max_win_rate_pct: 95,
            initial_value: 5000.0,
            max_price: 2000,
            seed: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Parses a TOML document on its own, without environment overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.analytics.risk_free_rate.is_finite() {
            return Err(ConfigError::invalid(
                "analytics",
                "risk_free_rate must be a finite number",
            ));
        }
        self.generator.validate()
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::invalid("generator", reason))
        };

        if self.count == 0 {
            return invalid("count must be at least 1");
        }
        if self.min_days == 0 || self.min_days > self.max_days {
            return invalid("min_days must be positive and not exceed max_days");
        }
        if !(self.min_roi_pct.is_finite() && self.max_roi_pct.is_finite())
            || self.min_roi_pct > self.max_roi_pct
        {
            return invalid("min_roi_pct must not exceed max_roi_pct");
        }
        if self.min_win_rate_pct > self.max_win_rate_pct || self.max_win_rate_pct > 100 {
            return invalid("win rate range must be ordered and within 0..=100");
        }
        // A daily move of 100% or more can take the account to zero or below.
        let widest_roi = self.min_roi_pct.abs().max(self.max_roi_pct.abs());
        if (widest_roi / 100.0) * (f64::from(self.max_win_rate_pct) / 100.0) >= 1.0 {
            return invalid("roi_pct * max_win_rate_pct must stay below 100% per day");
        }
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return invalid("initial_value must be strictly positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.analytics.risk_free_rate, 0.0);
        assert_eq!(config.analytics.trade_count, TradeCountVariant::ObservationCount);
        assert_eq!(config.generator.count, 50);
        assert_eq!(config.generator.initial_value, 5000.0);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [analytics]
            risk_free_rate = 0.0001
            trade_count = "transition_count"

            [generator]
            count = 5
            seed = 42

            [logging]
            level = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.risk_free_rate, 0.0001);
        assert_eq!(config.analytics.trade_count, TradeCountVariant::TransitionCount);
        assert_eq!(config.generator.count, 5);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.max_days, 365);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
    }

    #[test]
    fn inverted_day_range_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [generator]
            min_days = 400
            max_days = 30
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { section: "generator", .. }));
    }

    #[test]
    fn non_positive_initial_value_is_rejected() {
        let settings = GeneratorSettings {
            initial_value: 0.0,
            ..GeneratorSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn daily_move_of_a_full_account_is_rejected() {
        let settings = GeneratorSettings {
            min_roi_pct: 100.0,
            max_roi_pct: 300.0,
            min_win_rate_pct: 100,
            max_win_rate_pct: 100,
            ..GeneratorSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { section: "generator", .. }));

        let at_the_limit = GeneratorSettings {
            max_roi_pct: 100.0,
            max_win_rate_pct: 100,
            ..GeneratorSettings::default()
        };
        assert!(at_the_limit.validate().is_err());

        let just_below = GeneratorSettings {
            max_roi_pct: 99.0,
            max_win_rate_pct: 100,
            ..GeneratorSettings::default()
        };
        assert!(just_below.validate().is_ok());
    }

    #[test]
    fn unknown_trade_count_variant_fails_to_load() {
        let err = Config::from_toml_str(
            r#"
            [analytics]
            trade_count = "per_week"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
