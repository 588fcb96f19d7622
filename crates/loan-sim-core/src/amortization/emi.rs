use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::LoanSimError;
use crate::types::{Money, Percent, RoundingConfig};
use crate::LoanSimResult;

/// Percent per annum to a monthly fraction: 12 -> 0.01.
pub fn monthly_rate(annual_rate_percent: Percent) -> Decimal {
    annual_rate_percent / dec!(1200)
}

/// Equated monthly instalment, rounded to whole currency units.
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate.
/// A zero rate degenerates to P / n.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> LoanSimResult<Money> {
    compute_emi_with(
        principal,
        annual_rate_percent,
        tenure_months,
        &RoundingConfig::default(),
    )
}

/// [`compute_emi`] with an explicit rounding configuration.
pub fn compute_emi_with(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
    rounding: &RoundingConfig,
) -> LoanSimResult<Money> {
    rounding.validate()?;
    Ok(rounding.round(unrounded_emi(
        principal,
        annual_rate_percent,
        tenure_months,
    )?))
}

fn unrounded_emi(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> LoanSimResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(LoanSimError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if tenure_months == 0 {
        return Err(LoanSimError::invalid(
            "tenure_months",
            "Tenure must be at least 1 month",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanSimError::invalid(
            "annual_interest_rate",
            "Interest rate cannot be negative",
        ));
    }

    let n = Decimal::from(tenure_months);
    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(principal / n);
    }

    let factor = (Decimal::ONE + r)
        .checked_powi(i64::from(tenure_months))
        .ok_or_else(|| {
            LoanSimError::invalid(
                "annual_interest_rate",
                "Compounding factor overflows for this rate and tenure",
            )
        })?;

    // Rates below decimal resolution leave the factor at exactly 1.
    if factor <= Decimal::ONE {
        return Ok(principal / n);
    }

    // P * r / (1 - (1 + r)^-n), same value as the textbook form without the
    // P * (1 + r)^n intermediate.
    let discount = Decimal::ONE - Decimal::ONE / factor;
    principal
        .checked_mul(r)
        .and_then(|x| x.checked_div(discount))
        .ok_or_else(|| LoanSimError::invalid("principal", "EMI computation overflows"))
}
