//! Period-by-period amortization schedule.
//!
//! The loop carries unrounded balances; every amount is rounded to the minor
//! currency unit only when its row is emitted. Emitted amortization is the
//! difference of the rounded opening and closing balances, so the column sums
//! to the principal exactly and consecutive rows chain without gaps.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BondAmortError;
use crate::time_value;
use crate::types::{pct_to_rate, round_money, Money, Percent, Rate};
use crate::BondAmortResult;

use super::fees::{recurring_charges, RecurringCharges};
use super::terms::{
    payment_date, periodic_rate, resolve_total_periods, validate_principal, BondTerms,
    ScheduleLimits,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How principal is repaid over the life of the bond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmortizationMethod {
    /// Constant principal repayment, declining installments (German)
    #[default]
    EqualPrincipal,
    /// Constant installment (annuity)
    French,
    /// Interest only, principal repaid at maturity
    American,
}

impl AmortizationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AmortizationMethod::EqualPrincipal => "equal-principal",
            AmortizationMethod::French => "french",
            AmortizationMethod::American => "american",
        }
    }
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortizationMethod {
    type Err = BondAmortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "equal-principal" | "german" | "aleman" => Ok(AmortizationMethod::EqualPrincipal),
            "french" | "frances" | "annuity" => Ok(AmortizationMethod::French),
            "american" | "americano" | "bullet" => Ok(AmortizationMethod::American),
            other => Err(BondAmortError::Configuration(format!(
                "unknown amortization method '{other}'; expected equal-principal, french, or american"
            ))),
        }
    }
}

/// Per-call calculation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    pub method: AmortizationMethod,
    /// Investor's holding; replaces the bond principal when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invested_amount: Option<Money>,
    /// Annual discount rate for present values, in percent, compounded per period
    pub discount_rate: Percent,
    pub limits: ScheduleLimits,
}

pub const DEFAULT_DISCOUNT_RATE: Percent = dec!(10);

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            method: AmortizationMethod::default(),
            invested_amount: None,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            limits: ScheduleLimits::default(),
        }
    }
}

impl ScheduleOptions {
    pub fn with_method(method: AmortizationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    fn validate(&self) -> BondAmortResult<()> {
        if let Some(amount) = self.invested_amount {
            validate_principal("invested_amount", amount, &self.limits)?;
        }
        if self.discount_rate <= dec!(-100) {
            return Err(BondAmortError::Configuration(
                "discount_rate must be greater than -100%".into(),
            ));
        }
        if self.limits.max_periods == 0 || self.limits.max_term_years == 0 {
            return Err(BondAmortError::Configuration(
                "limits.max_periods and limits.max_term_years must be at least 1".into(),
            ));
        }
        if self.limits.min_placement_price <= Decimal::ZERO
            || self.limits.min_placement_price > self.limits.max_placement_price
        {
            return Err(BondAmortError::Configuration(
                "limits placement price range must be positive and ordered".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One payment period. Amounts are positive flows from issuer to investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub date: NaiveDate,
    pub opening_balance: Money,
    /// Coupon on the opening balance
    pub interest: Money,
    pub amortization: Money,
    /// Interest plus amortization
    pub installment: Money,
    pub closing_balance: Money,
    pub life_insurance: Money,
    pub all_risk_insurance: Money,
    pub administrative_fee: Money,
    pub postage_fee: Money,
    pub commission: Money,
    pub recurring_charges: Money,
    pub total_cash_flow: Money,
    pub present_value: Money,
}

/// Validated inputs of one schedule run.
#[derive(Debug, Clone)]
pub(crate) struct SchedulePlan {
    pub principal: Money,
    pub total_periods: u32,
    pub rate: Rate,
    pub discount_rate: Rate,
    /// Equal-principal quantum or French installment
    pub level_amount: Money,
}

impl SchedulePlan {
    pub(crate) fn resolve(terms: &BondTerms, options: &ScheduleOptions) -> BondAmortResult<Self> {
        options.validate()?;
        terms.validate(&options.limits)?;

        let principal = options.invested_amount.unwrap_or(terms.principal);
        let total_periods = resolve_total_periods(terms, &options.limits)?;
        // Fail on unreachable dates before any row exists
        payment_date(terms.issue_date, total_periods, terms.payment_frequency)?;

        let rate = periodic_rate(terms);
        let periods_per_year = Decimal::from(terms.periods_per_year());
        let discount_rate = pct_to_rate(options.discount_rate) / periods_per_year;

        let equal_principal = || round_money(principal / Decimal::from(total_periods));
        let level_amount = match options.method {
            AmortizationMethod::EqualPrincipal => equal_principal(),
            // Without interest the annuity is the equal-principal quantum
            AmortizationMethod::French if rate.is_zero() => equal_principal(),
            AmortizationMethod::French => {
                time_value::pmt(rate, total_periods, -principal, Decimal::ZERO)?
            }
            AmortizationMethod::American => Decimal::ZERO,
        };

        Ok(Self {
            principal,
            total_periods,
            rate,
            discount_rate,
            level_amount,
        })
    }
}

/// Build the full schedule for `terms`.
///
/// Either every row is returned or an error is raised before the first one.
pub fn generate_schedule(
    terms: &BondTerms,
    options: &ScheduleOptions,
) -> BondAmortResult<Vec<AmortizationRow>> {
    let plan = SchedulePlan::resolve(terms, options)?;
    build_rows(terms, options.method, &plan)
}

pub(crate) fn build_rows(
    terms: &BondTerms,
    method: AmortizationMethod,
    plan: &SchedulePlan,
) -> BondAmortResult<Vec<AmortizationRow>> {
    let mut rows = Vec::with_capacity(plan.total_periods as usize);
    let mut balance = plan.principal;

    for period in 1..=plan.total_periods {
        let opening = balance;
        let interest = opening * plan.rate;

        let scheduled = match method {
            AmortizationMethod::EqualPrincipal => plan.level_amount,
            AmortizationMethod::French => plan.level_amount - interest,
            AmortizationMethod::American => Decimal::ZERO,
        };

        // Last period absorbs whatever remains
        let closing = if period == plan.total_periods {
            Decimal::ZERO
        } else {
            (opening - scheduled).max(Decimal::ZERO)
        };

        let charges = recurring_charges(&terms.fees, period, opening);
        let date = payment_date(terms.issue_date, period, terms.payment_frequency)?;

        rows.push(emit_row(period, date, opening, closing, interest, &charges, plan)?);

        balance = closing;
    }

    Ok(rows)
}

fn emit_row(
    period: u32,
    date: NaiveDate,
    opening: Money,
    closing: Money,
    interest: Money,
    charges: &RecurringCharges,
    plan: &SchedulePlan,
) -> BondAmortResult<AmortizationRow> {
    let opening_balance = round_money(opening);
    let closing_balance = round_money(closing);
    let amortization = opening_balance - closing_balance;
    let interest = round_money(interest);
    let installment = interest + amortization;

    let charges = charges.rounded();
    let recurring = charges.total();
    let total_cash_flow = installment + recurring;
    let present_value = round_money(time_value::discount(
        total_cash_flow,
        plan.discount_rate,
        period,
    )?);

    Ok(AmortizationRow {
        period,
        date,
        opening_balance,
        interest,
        amortization,
        installment,
        closing_balance,
        life_insurance: charges.life_insurance,
        all_risk_insurance: charges.all_risk_insurance,
        administrative_fee: charges.administrative_fee,
        postage_fee: charges.postage_fee,
        commission: charges.commission,
        recurring_charges: recurring,
        total_cash_flow,
        present_value,
    })
}
