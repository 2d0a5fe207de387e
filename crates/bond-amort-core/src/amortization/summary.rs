//! Aggregate metrics over a generated schedule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondAmortError;
use crate::types::{Money, Percent, Years};
use crate::BondAmortResult;

use super::schedule::AmortizationRow;

/// Decimal places kept on yield figures (percent).
pub const YIELD_DP: u32 = 6;

/// Totals and headline metrics of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondSummary {
    pub total_interest: Money,
    pub total_amortization: Money,
    pub total_recurring_charges: Money,
    pub total_cash_flow: Money,
    /// Linear annualization of total return, in percent. Not an IRR.
    pub approximate_yield: Percent,
    pub duration_years: Years,
    /// Sum of the rows' discounted cash flows
    pub present_value: Money,
}

/// Summarize `rows` in a single pass.
///
/// `approximate_yield = ((total_cash_flow / principal - 1) / duration_years) * 100`.
pub fn summarize(
    rows: &[AmortizationRow],
    principal: Money,
    duration_years: Years,
) -> BondAmortResult<BondSummary> {
    if rows.is_empty() {
        return Err(BondAmortError::InsufficientData(
            "Cannot summarize an empty schedule".into(),
        ));
    }
    if principal <= Decimal::ZERO {
        return Err(BondAmortError::invalid_term("principal", "Principal must be positive"));
    }
    if duration_years <= Decimal::ZERO {
        return Err(BondAmortError::invalid_term(
            "duration_years",
            "Duration must be positive",
        ));
    }

    let mut summary = BondSummary {
        total_interest: Decimal::ZERO,
        total_amortization: Decimal::ZERO,
        total_recurring_charges: Decimal::ZERO,
        total_cash_flow: Decimal::ZERO,
        approximate_yield: Decimal::ZERO,
        duration_years,
        present_value: Decimal::ZERO,
    };

    for row in rows {
        summary.total_interest += row.interest;
        summary.total_amortization += row.amortization;
        summary.total_recurring_charges += row.recurring_charges;
        summary.total_cash_flow += row.total_cash_flow;
        summary.present_value += row.present_value;
    }

    summary.approximate_yield = ((summary.total_cash_flow / principal - Decimal::ONE)
        / duration_years
        * Decimal::ONE_HUNDRED)
        .round_dp(YIELD_DP)
        .normalize();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(period: u32, interest: Money, amortization: Money, pv: Money) -> AmortizationRow {
        AmortizationRow {
            period,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            opening_balance: Decimal::ZERO,
            interest,
            amortization,
            installment: interest + amortization,
            closing_balance: Decimal::ZERO,
            life_insurance: Decimal::ZERO,
            all_risk_insurance: Decimal::ZERO,
            administrative_fee: Decimal::ZERO,
            postage_fee: Decimal::ZERO,
            commission: Decimal::ZERO,
            recurring_charges: Decimal::ZERO,
            total_cash_flow: interest + amortization,
            present_value: pv,
        }
    }

    #[test]
    fn test_summary_totals_and_yield() {
        // Two annual periods on 1000 at 10%
        let rows = vec![
            row(1, dec!(100), dec!(500), dec!(545.45)),
            row(2, dec!(50), dec!(500), dec!(454.55)),
        ];
        let summary = summarize(&rows, dec!(1000), dec!(2)).unwrap();
        assert_eq!(summary.total_interest, dec!(150));
        assert_eq!(summary.total_amortization, dec!(1000));
        assert_eq!(summary.total_cash_flow, dec!(1150));
        assert_eq!(summary.present_value, dec!(1000));
        // (1150 / 1000 - 1) / 2 * 100 = 7.5
        assert_eq!(summary.approximate_yield, dec!(7.5));
        assert_eq!(summary.duration_years, dec!(2));
    }

    #[test]
    fn test_summary_rejects_bad_inputs() {
        let rows = vec![row(1, dec!(10), dec!(100), dec!(100))];
        assert!(summarize(&[], dec!(100), dec!(1)).is_err());
        assert!(summarize(&rows, Decimal::ZERO, dec!(1)).is_err());
        assert!(summarize(&rows, dec!(100), Decimal::ZERO).is_err());
    }
}
