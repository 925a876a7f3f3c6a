use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Constants that drive the budget and benefit formulas.
///
/// The engine never reads these from globals. Callers build one (usually via
/// `Default`) and hand it to every calculation, which lets a deployment tune the card
/// terms without touching the formulas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Average number of weeks in a month. Monthly catalog costs are turned into
    /// weekly costs with this, and every benefit formula reuses it.
    pub weeks_per_month: Decimal,
    pub weeks_in_year: u32,
    pub annual_interest_rate: Decimal,
    pub cashback_rate: Decimal,
    /// Bonus on the exchange rate, as a fraction of the monthly spend.
    pub exchange_rate_benefit: Decimal,
    pub transfers_per_month: Decimal,
    /// Fee avoided per international transfer, in the reference currency.
    pub transfer_cost_reference: Decimal,
    pub max_trip_weeks: u32,
    // Accepted departure years, inclusive
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("could not parse engine configuration: {0}")]
    Parse(String),
    #[error("invalid engine configuration: {0}")]
    Invalid(&'static str),
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            weeks_per_month: dec!(4.345),
            weeks_in_year: 52,
            annual_interest_rate: dec!(0.05),
            cashback_rate: dec!(0.03),
            exchange_rate_benefit: dec!(0.05),
            transfers_per_month: dec!(2),
            transfer_cost_reference: dec!(200),
            max_trip_weeks: 104,
            min_year: 2025,
            max_year: 2030,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing keys keep their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weeks_per_month <= Decimal::ZERO {
            return Err(ConfigError::Invalid("weeksPerMonth must be greater than zero"));
        }
        if self.weeks_in_year == 0 {
            return Err(ConfigError::Invalid("weeksInYear must be greater than zero"));
        }
        if self.max_trip_weeks == 0 {
            return Err(ConfigError::Invalid("maxTripWeeks must be greater than zero"));
        }
        if self.min_year > self.max_year {
            return Err(ConfigError::Invalid("minYear must not be after maxYear"));
        }

        let non_negative = [
            self.annual_interest_rate,
            self.cashback_rate,
            self.exchange_rate_benefit,
            self.transfers_per_month,
            self.transfer_cost_reference,
        ];
        if non_negative.iter().any(|v| *v < Decimal::ZERO) {
            return Err(ConfigError::Invalid("rates and fees must not be negative"));
        }

        Ok(())
    }

    pub fn is_year_accepted(&self, year: i32) -> bool {
        year >= self.min_year && year <= self.max_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn from_json_partial_override() {
        let config =
            EngineConfig::from_json(r#"{ "transferCostReference": "150", "maxYear": 2032 }"#)
                .unwrap();
        assert_eq!(config.transfer_cost_reference, dec!(150));
        assert_eq!(config.max_year, 2032);
        assert_eq!(config.weeks_per_month, dec!(4.345));
        assert_eq!(config.cashback_rate, dec!(0.03));
    }

    #[test]
    fn from_json_empty_object_is_default() {
        assert_eq!(EngineConfig::from_json("{}"), Ok(EngineConfig::default()));
    }

    #[test]
    fn from_json_malformed() {
        let result = EngineConfig::from_json("{ weeksPerMonth: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn from_json_zero_weeks_per_month() {
        let result = EngineConfig::from_json(r#"{ "weeksPerMonth": "0" }"#);
        assert_eq!(
            result,
            Err(ConfigError::Invalid("weeksPerMonth must be greater than zero"))
        );
    }

    #[test]
    fn inverted_year_window() {
        let config = EngineConfig {
            min_year: 2030,
            max_year: 2025,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Invalid("minYear must not be after maxYear"))
        );
    }

    #[test]
    fn negative_cashback() {
        let config = EngineConfig {
            cashback_rate: dec!(-0.01),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn year_window_is_inclusive() {
        let config = EngineConfig::default();
        assert!(config.is_year_accepted(2025));
        assert!(config.is_year_accepted(2030));
        assert!(!config.is_year_accepted(2024));
        assert!(!config.is_year_accepted(2031));
    }
}
