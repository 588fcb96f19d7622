use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::LoanSimResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rates expressed in percent (12 = 12% p.a.), matching how
/// lenders quote them. Converted to a monthly fraction only inside the engine.
pub type Percent = Decimal;

/// Upper bound on the EMI decimal places a caller may request.
const MAX_DECIMAL_PLACES: u32 = 10;

/// How the EMI is rounded to the currency's smallest unit.
///
/// Rounding happens once per EMI computation (at loan start and at each rate
/// change). Monthly interest and principal components are kept unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingConfig {
    /// 0 rounds to whole currency units (e.g. whole rupees), 2 to cents/paise.
    #[serde(default)]
    pub emi_decimal_places: u32,
}

impl RoundingConfig {
    pub fn validate(&self) -> LoanSimResult<()> {
        if self.emi_decimal_places > MAX_DECIMAL_PLACES {
            return Err(LoanSimError::invalid(
                "emi_decimal_places",
                format!("Must be at most {MAX_DECIMAL_PLACES}"),
            ));
        }
        Ok(())
    }

    /// Round half away from zero to the configured number of places.
    pub fn round(&self, amount: Money) -> Money {
        amount.round_dp_with_strategy(
            self.emi_decimal_places,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rounds_to_whole_units() {
        let cfg = RoundingConfig::default();
        assert_eq!(cfg.round(dec!(8884.88)), dec!(8885));
        assert_eq!(cfg.round(dec!(8884.5)), dec!(8885));
        assert_eq!(cfg.round(dec!(8884.49)), dec!(8884));
    }

    #[test]
    fn test_two_places() {
        let cfg = RoundingConfig {
            emi_decimal_places: 2,
        };
        assert_eq!(cfg.round(dec!(23072.4566)), dec!(23072.46));
        assert_eq!(cfg.round(dec!(10.125)), dec!(10.13));
    }

    #[test]
    fn test_too_many_places_rejected() {
        let cfg = RoundingConfig {
            emi_decimal_places: 11,
        };
        assert!(cfg.validate().is_err());
    }
}
