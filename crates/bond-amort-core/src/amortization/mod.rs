//! Bond amortization engine.
//!
//! Pure, synchronous functions from [`BondTerms`] to a schedule of
//! [`AmortizationRow`]s and a [`BondSummary`]. Nothing here holds state, so
//! schedules for many bonds can be computed concurrently without coordination.

pub mod calculation;
pub mod fees;
pub mod schedule;
pub mod summary;
pub mod terms;

pub use calculation::{
    calculate_bond, yield_metrics, BondCalculation, BondCalculationInput, YieldMetrics,
};
pub use fees::{
    recurring_charges, upfront_costs, FeeSchedule, RecurringCharges, UpfrontCosts,
    PAR_PLACEMENT_PRICE,
};
pub use schedule::{generate_schedule, AmortizationMethod, AmortizationRow, ScheduleOptions};
pub use summary::{summarize, BondSummary};
pub use terms::{
    duration_years, payment_date, periodic_rate, resolve_total_periods, BondTerms,
    PaymentFrequency, ScheduleLimits,
};
