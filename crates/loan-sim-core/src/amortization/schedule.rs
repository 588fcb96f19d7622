use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::emi::{compute_emi_with, monthly_rate};
use super::events::{
    event_for_month, events_in_month, DatedEvent, PrepaymentEvent, RateChangeEvent,
};
use super::loan::LoanTerms;
use crate::dates::add_months;
use crate::error::LoanSimError;
use crate::types::{Money, Percent, RoundingConfig};
use crate::LoanSimResult;

/// One month of an amortisation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based
    pub month_index: u32,
    pub date: NaiveDate,
    pub annual_rate: Percent,
    pub opening_balance: Money,
    /// Instalment actually charged: principal plus interest components
    pub emi: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment_applied: Option<Money>,
    pub closing_balance: Money,
}

/// Month-by-month schedule in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest_component).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.entries.iter().map(|e| e.principal_component).sum()
    }

    pub fn total_prepaid(&self) -> Money {
        self.entries
            .iter()
            .filter_map(|e| e.prepayment_applied)
            .sum()
    }

    /// Everything paid to the lender: instalments plus prepayments.
    ///
    /// Checked, since a schedule handed in from outside the generator may
    /// carry amounts whose sum exceeds the decimal range.
    pub fn total_paid(&self) -> LoanSimResult<Money> {
        checked_sum(
            self.entries
                .iter()
                .flat_map(|e| std::iter::once(e.emi).chain(e.prepayment_applied)),
            "total_paid",
        )
    }

    /// Date of the final entry; `None` for an empty schedule.
    pub fn debt_free_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }

    pub fn final_balance(&self) -> Option<Money> {
        self.entries.last().map(|e| e.closing_balance)
    }
}

/// Headline figures for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub months: usize,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_prepaid: Money,
    pub total_paid: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_free_date: Option<NaiveDate>,
}

impl TryFrom<&Schedule> for ScheduleTotals {
    type Error = LoanSimError;

    /// All sums checked, so schedules deserialised from callers are safe to total.
    fn try_from(schedule: &Schedule) -> LoanSimResult<Self> {
        let entries = &schedule.entries;
        Ok(Self {
            months: schedule.len(),
            total_interest: checked_sum(
                entries.iter().map(|e| e.interest_component),
                "total_interest",
            )?,
            total_principal: checked_sum(
                entries.iter().map(|e| e.principal_component),
                "total_principal",
            )?,
            total_prepaid: checked_sum(
                entries.iter().filter_map(|e| e.prepayment_applied),
                "total_prepaid",
            )?,
            total_paid: schedule.total_paid()?,
            debt_free_date: schedule.debt_free_date(),
        })
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>, field: &str) -> LoanSimResult<Money> {
    amounts
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(x))
        .ok_or_else(|| overflow(field))
}

/// Expand a loan into its monthly schedule, applying prepayments and rate changes.
///
/// EMIs are rounded to whole currency units. See [`generate_schedule_with`].
pub fn generate_schedule(
    terms: &LoanTerms,
    prepayments: &[PrepaymentEvent],
    rate_changes: &[RateChangeEvent],
) -> LoanSimResult<Schedule> {
    generate_schedule_with(terms, prepayments, rate_changes, &RoundingConfig::default())
}

/// Expand a loan into its monthly schedule under an explicit rounding configuration.
///
/// Each month, in order:
/// 1. a rate change dated in the month resets the rate and recomputes the EMI
///    over the outstanding balance and the months remaining (this one included);
/// 2. interest accrues on the opening balance at the current rate;
/// 3. the EMI net of interest repays principal, capped at the balance; in the
///    final tenure month the whole balance is repaid;
/// 4. a prepayment dated in the month is applied, capped at what is left.
///
/// The schedule stops at the first month the balance reaches zero.
pub fn generate_schedule_with(
    terms: &LoanTerms,
    prepayments: &[PrepaymentEvent],
    rate_changes: &[RateChangeEvent],
    rounding: &RoundingConfig,
) -> LoanSimResult<Schedule> {
    Ok(run_schedule(terms, prepayments, rate_changes, rounding)?.0)
}

/// Schedule plus the diagnostics gathered while building it.
pub(crate) fn run_schedule(
    terms: &LoanTerms,
    prepayments: &[PrepaymentEvent],
    rate_changes: &[RateChangeEvent],
    rounding: &RoundingConfig,
) -> LoanSimResult<(Schedule, Vec<String>)> {
    terms.validate()?;
    rounding.validate()?;
    for (i, p) in prepayments.iter().enumerate() {
        p.validate(i)?;
    }
    for (i, rc) in rate_changes.iter().enumerate() {
        rc.validate(i)?;
    }

    let mut notes: Vec<String> = Vec::new();
    let tenure = terms.tenure_months;
    let mut entries = Vec::with_capacity(tenure as usize);

    let mut balance = terms.principal;
    let mut current_rate = terms.annual_interest_rate;
    let mut current_emi = terms.emi(rounding)?;
    // Instalments plus prepayments so far. Interest, principal and prepayment
    // are each at most what was paid, so keeping this in range keeps every
    // `Schedule` total in range too.
    let mut paid = Decimal::ZERO;

    for month in 1..=tenure {
        let date = add_months(terms.start_date, month - 1)?;
        let opening = balance;

        if let Some((idx, change)) = event_for_month(rate_changes, date) {
            note_collisions(&mut notes, "Rate change", rate_changes, idx, date);
            let remaining = tenure - month + 1;
            current_rate = change.new_annual_rate;
            current_emi = compute_emi_with(balance, current_rate, remaining, rounding)?;
            debug!(
                month,
                rate = %current_rate,
                emi = %current_emi,
                remaining,
                "rate change applied"
            );
        }

        let interest = balance
            .checked_mul(monthly_rate(current_rate))
            .ok_or_else(|| overflow("interest_component"))?;

        let settle = balance
            .checked_add(interest)
            .ok_or_else(|| overflow("interest_component"))?;

        let (principal, charged) = if month == tenure {
            let charged = settle;
            if charged > current_emi {
                notes.push(format!(
                    "Month {month}: final instalment of {charged} exceeds the EMI of {current_emi}; residual balance settled"
                ));
            }
            (balance, charged)
        } else if current_emi < interest {
            notes.push(format!(
                "Month {month}: EMI of {current_emi} does not cover interest of {interest}; no principal repaid"
            ));
            warn!(month, emi = %current_emi, interest = %interest, "EMI below interest");
            (Decimal::ZERO, interest)
        } else if current_emi - interest >= balance {
            (balance, settle)
        } else {
            (current_emi - interest, current_emi)
        };

        let after_principal = balance - principal;
        let prepayment = event_for_month(prepayments, date).map(|(idx, event)| {
            note_collisions(&mut notes, "Prepayment", prepayments, idx, date);
            let applied = event.amount().min(after_principal);
            debug!(month, requested = %event.amount(), applied = %applied, "prepayment applied");
            applied
        });

        balance = after_principal - prepayment.unwrap_or(Decimal::ZERO);
        paid = paid
            .checked_add(charged)
            .and_then(|p| p.checked_add(prepayment.unwrap_or(Decimal::ZERO)))
            .ok_or_else(|| overflow("total_paid"))?;

        entries.push(ScheduleEntry {
            month_index: month,
            date,
            annual_rate: current_rate,
            opening_balance: opening,
            emi: charged,
            principal_component: principal,
            interest_component: interest,
            prepayment_applied: prepayment,
            closing_balance: balance.max(Decimal::ZERO),
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    Ok((Schedule { entries }, notes))
}

fn overflow(field: &str) -> LoanSimError {
    LoanSimError::invalid(field, "Amount exceeds the decimal range for these terms")
}

fn note_collisions<E: DatedEvent>(
    notes: &mut Vec<String>,
    label: &str,
    events: &[E],
    applied: usize,
    date: NaiveDate,
) {
    let ignored: Vec<usize> = events_in_month(events, date)
        .map(|(i, _)| i)
        .filter(|i| *i != applied)
        .collect();
    if ignored.is_empty() {
        return;
    }
    warn!(%date, applied, ?ignored, "{label} events collide in one month");
    notes.push(format!(
        "{label} events {ignored:?} fall in the same month as event {applied} ({}); only event {applied} applied",
        date.format("%Y-%m")
    ));
}
