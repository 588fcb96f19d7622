use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::emi::compute_emi_with;
use crate::error::LoanSimError;
use crate::types::{Money, Percent, RoundingConfig};
use crate::LoanSimResult;

/// Terms of a reducing-balance loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate in percent (10 = 10% p.a.)
    pub annual_interest_rate: Percent,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    /// Instalment agreed with the lender. Computed from the other terms when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_emi: Option<Money>,
}

impl LoanTerms {
    /// Build terms with the baseline EMI pre-computed at whole-unit rounding.
    pub fn new(
        principal: Money,
        annual_interest_rate: Percent,
        tenure_months: u32,
        start_date: NaiveDate,
    ) -> LoanSimResult<Self> {
        let emi = compute_emi_with(
            principal,
            annual_interest_rate,
            tenure_months,
            &RoundingConfig::default(),
        )?;
        Ok(Self {
            principal,
            annual_interest_rate,
            tenure_months,
            start_date,
            baseline_emi: Some(emi),
        })
    }

    pub fn validate(&self) -> LoanSimResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "principal",
                "Principal must be positive",
            ));
        }
        if self.tenure_months == 0 {
            return Err(LoanSimError::invalid(
                "tenure_months",
                "Tenure must be at least 1 month",
            ));
        }
        if self.annual_interest_rate < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                "annual_interest_rate",
                "Interest rate cannot be negative",
            ));
        }
        if let Some(emi) = self.baseline_emi {
            if emi <= Decimal::ZERO {
                return Err(LoanSimError::invalid(
                    "baseline_emi",
                    "Baseline EMI must be positive",
                ));
            }
        }
        Ok(())
    }

    /// The supplied baseline EMI, or the annuity EMI for these terms.
    pub fn emi(&self, rounding: &RoundingConfig) -> LoanSimResult<Money> {
        match self.baseline_emi {
            Some(emi) => Ok(emi),
            None => compute_emi_with(
                self.principal,
                self.annual_interest_rate,
                self.tenure_months,
                rounding,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_new_precomputes_emi() {
        let terms = LoanTerms::new(dec!(100000), dec!(12), 12, start()).unwrap();
        assert_eq!(terms.baseline_emi, Some(dec!(8885)));
        assert!(terms.validate().is_ok());
    }

    #[test]
    fn test_supplied_emi_takes_precedence() {
        let mut terms = LoanTerms::new(dec!(100000), dec!(12), 12, start()).unwrap();
        terms.baseline_emi = Some(dec!(9000));
        assert_eq!(terms.emi(&RoundingConfig::default()).unwrap(), dec!(9000));

        terms.baseline_emi = None;
        let cents = RoundingConfig {
            emi_decimal_places: 2,
        };
        assert_eq!(terms.emi(&cents).unwrap(), dec!(8884.88));
    }

    #[test]
    fn test_validate_rejects_bad_terms() {
        let good = LoanTerms::new(dec!(100000), dec!(12), 12, start()).unwrap();

        let mut t = good.clone();
        t.principal = dec!(0);
        assert!(t.validate().is_err());

        let mut t = good.clone();
        t.tenure_months = 0;
        assert!(t.validate().is_err());

        let mut t = good.clone();
        t.annual_interest_rate = dec!(-1);
        assert!(t.validate().is_err());

        let mut t = good;
        t.baseline_emi = Some(dec!(0));
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_deserialize_without_emi() {
        let json = r#"{
            "principal": "500000",
            "annual_interest_rate": "10",
            "tenure_months": 24,
            "start_date": "2024-01-01"
        }"#;
        let terms: LoanTerms = serde_json::from_str(json).unwrap();
        assert_eq!(terms.baseline_emi, None);
        assert_eq!(terms.emi(&RoundingConfig::default()).unwrap(), dec!(23072));
    }
}
