//! Prepayment and interest-rate-change events fed into the schedule generator.
//!
//! Events are matched to schedule months by calendar month and year only.
//! When several events of the same type fall in one month, the first in input
//! order is applied and the rest are ignored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::same_month;
use crate::error::LoanSimError;
use crate::types::{Money, Percent};
use crate::LoanSimResult;

/// How often a recurring prepayment is meant to repeat.
///
/// Stored for the caller's benefit; the schedule generator applies a recurring
/// prepayment once, in the month of its effective date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Monthly,
    Yearly,
    Custom,
}

/// An extra payment applied directly to principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrepaymentEvent {
    OneTime {
        amount: Money,
        effective_date: NaiveDate,
    },
    Recurring {
        amount: Money,
        effective_date: NaiveDate,
        frequency: RecurrenceFrequency,
    },
}

impl PrepaymentEvent {
    pub fn one_time(amount: Money, effective_date: NaiveDate) -> Self {
        PrepaymentEvent::OneTime {
            amount,
            effective_date,
        }
    }

    pub fn recurring(
        amount: Money,
        effective_date: NaiveDate,
        frequency: RecurrenceFrequency,
    ) -> Self {
        PrepaymentEvent::Recurring {
            amount,
            effective_date,
            frequency,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            PrepaymentEvent::OneTime { amount, .. } | PrepaymentEvent::Recurring { amount, .. } => {
                *amount
            }
        }
    }

    pub fn frequency(&self) -> Option<RecurrenceFrequency> {
        match self {
            PrepaymentEvent::OneTime { .. } => None,
            PrepaymentEvent::Recurring { frequency, .. } => Some(*frequency),
        }
    }

    pub fn validate(&self, index: usize) -> LoanSimResult<()> {
        if self.amount() <= Decimal::ZERO {
            return Err(LoanSimError::invalid(
                &format!("prepayments[{index}].amount"),
                "Prepayment amount must be positive",
            ));
        }
        Ok(())
    }
}

/// A change to the annual interest rate from a given month onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChangeEvent {
    pub new_annual_rate: Percent,
    pub effective_date: NaiveDate,
}

impl RateChangeEvent {
    pub fn new(new_annual_rate: Percent, effective_date: NaiveDate) -> Self {
        Self {
            new_annual_rate,
            effective_date,
        }
    }

    pub fn validate(&self, index: usize) -> LoanSimResult<()> {
        if self.new_annual_rate < Decimal::ZERO {
            return Err(LoanSimError::invalid(
                &format!("rate_changes[{index}].new_annual_rate"),
                "Interest rate cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Anything placed on the calendar by an effective date.
pub trait DatedEvent {
    fn effective_date(&self) -> NaiveDate;
}

impl DatedEvent for PrepaymentEvent {
    fn effective_date(&self) -> NaiveDate {
        match self {
            PrepaymentEvent::OneTime { effective_date, .. }
            | PrepaymentEvent::Recurring { effective_date, .. } => *effective_date,
        }
    }
}

impl DatedEvent for RateChangeEvent {
    fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }
}

/// All events falling in the calendar month of `date`, in input order.
pub fn events_in_month<E: DatedEvent>(
    events: &[E],
    date: NaiveDate,
) -> impl Iterator<Item = (usize, &E)> {
    events
        .iter()
        .enumerate()
        .filter(move |(_, e)| same_month(e.effective_date(), date))
}

/// The event that applies in the month of `date`: the first match in input order.
pub fn event_for_month<E: DatedEvent>(events: &[E], date: NaiveDate) -> Option<(usize, &E)> {
    events_in_month(events, date).next()
}
