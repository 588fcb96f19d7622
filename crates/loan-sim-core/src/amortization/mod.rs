//! Reducing-balance loan amortisation with prepayments and rate changes.
//!
//! [`emi`] prices the instalment, [`schedule`] expands a loan month by month,
//! [`savings`] diffs two schedules, and [`simulation`] wires the three into
//! the baseline-versus-modified comparison callers usually want.

pub mod emi;
pub mod events;
pub mod loan;
pub mod savings;
pub mod schedule;
pub mod simulation;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use emi::{compute_emi, compute_emi_with};
pub use events::{PrepaymentEvent, RateChangeEvent, RecurrenceFrequency};
pub use loan::LoanTerms;
pub use savings::{compare_schedules, SavingsSummary};
pub use schedule::{generate_schedule, generate_schedule_with, Schedule, ScheduleEntry};
pub use simulation::{build_schedule, simulate, SimulationInput};
