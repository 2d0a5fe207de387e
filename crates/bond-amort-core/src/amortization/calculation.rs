//! Full bond calculation: schedule, summary, upfront costs and solved yields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::BondAmortResult;

use super::fees::{upfront_costs, UpfrontCosts};
use super::schedule::{build_rows, AmortizationMethod, AmortizationRow, SchedulePlan, ScheduleOptions};
use super::summary::{summarize, BondSummary, YIELD_DP};
use super::terms::{duration_years, BondTerms, PaymentFrequency};

/// Terms plus options, the shape every front end submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondCalculationInput {
    pub terms: BondTerms,
    #[serde(default)]
    pub options: ScheduleOptions,
}

/// Internal rates solved from the schedule's cash flows, in percent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldMetrics {
    /// Investor return per period (pays the placement proceeds, receives every row's flow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_periodic_irr: Option<Percent>,
    /// Effective annual investor return (TREA)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor_annual_yield: Option<Percent>,
    /// Issuer cost per period (receives net proceeds, pays every row's flow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_periodic_cost: Option<Percent>,
    /// Effective annual issuer cost (TCEA)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_annual_cost: Option<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondCalculation {
    pub method: AmortizationMethod,
    pub principal: Money,
    pub total_periods: u32,
    pub upfront_costs: UpfrontCosts,
    pub schedule: Vec<AmortizationRow>,
    pub summary: BondSummary,
    pub yields: YieldMetrics,
}

/// Build the schedule, summarize it, and solve investor and issuer yields.
pub fn calculate_bond(
    input: &BondCalculationInput,
) -> BondAmortResult<ComputationOutput<BondCalculation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = &input.terms;
    let options = &input.options;

    let plan = SchedulePlan::resolve(terms, options)?;
    let schedule = build_rows(terms, options.method, &plan)?;
    let duration = duration_years(plan.total_periods, terms.payment_frequency);
    let summary = summarize(&schedule, plan.principal, duration)?;
    let costs = upfront_costs(&terms.fees, plan.principal);

    if costs.net_proceeds <= Decimal::ZERO {
        warnings.push(format!(
            "Upfront costs {} consume the placement proceeds {}; issuer cost is undefined",
            costs.total, costs.placement_proceeds
        ));
    }

    let yields = yield_metrics(
        &schedule,
        &costs,
        terms.payment_frequency,
        plan.rate,
        &mut warnings,
    );

    let output = BondCalculation {
        method: options.method,
        principal: costs.principal,
        total_periods: plan.total_periods,
        upfront_costs: costs,
        schedule,
        summary,
        yields,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        methodology(options.method),
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn methodology(method: AmortizationMethod) -> &'static str {
    match method {
        AmortizationMethod::EqualPrincipal => {
            "Equal-principal amortization on declining balance, Newton-Raphson IRR"
        }
        AmortizationMethod::French => "French annuity amortization, Newton-Raphson IRR",
        AmortizationMethod::American => {
            "American (bullet) amortization, interest only until maturity, Newton-Raphson IRR"
        }
    }
}

/// Solve investor and issuer internal rates over the schedule's flows.
///
/// `guess` is the Newton-Raphson starting rate per period for both solves.
/// [`calculate_bond`] passes the coupon rate; callers working from their own
/// schedule can use [`periodic_rate`](super::terms::periodic_rate) of the
/// same terms. A rate that cannot be solved is left empty and explained in
/// `warnings`.
///
/// ```
/// use bond_amort_core::amortization::{
///     generate_schedule, periodic_rate, upfront_costs, yield_metrics, BondTerms,
///     ScheduleOptions,
/// };
///
/// let terms: BondTerms = serde_json::from_str(r#"{
///     "principal": "10000", "annual_rate": "8.5",
///     "issue_date": "2024-01-15", "maturity_date": "2026-01-15",
///     "term_periods": 24, "payment_frequency": "monthly"
/// }"#).unwrap();
/// let rows = generate_schedule(&terms, &ScheduleOptions::default()).unwrap();
/// let costs = upfront_costs(&terms.fees, terms.principal);
///
/// let mut warnings = Vec::new();
/// let yields = yield_metrics(
///     &rows,
///     &costs,
///     terms.payment_frequency,
///     periodic_rate(&terms),
///     &mut warnings,
/// );
/// assert!(yields.investor_annual_yield.is_some());
/// assert!(warnings.is_empty());
/// ```
pub fn yield_metrics(
    rows: &[AmortizationRow],
    costs: &UpfrontCosts,
    frequency: PaymentFrequency,
    guess: Rate,
    warnings: &mut Vec<String>,
) -> YieldMetrics {
    let mut metrics = YieldMetrics::default();

    let mut investor_flows = Vec::with_capacity(rows.len() + 1);
    investor_flows.push(-costs.placement_proceeds);
    investor_flows.extend(rows.iter().map(|r| r.total_cash_flow));

    match time_value::irr(&investor_flows, guess) {
        Ok(periodic) => {
            metrics.investor_periodic_irr = Some(as_percent(periodic));
            metrics.investor_annual_yield = annualize(periodic, frequency).map(as_percent);
        }
        Err(e) => warnings.push(format!("Investor IRR not solved: {e}")),
    }

    if costs.net_proceeds > Decimal::ZERO {
        let mut issuer_flows = Vec::with_capacity(rows.len() + 1);
        issuer_flows.push(costs.net_proceeds);
        issuer_flows.extend(rows.iter().map(|r| -r.total_cash_flow));

        match time_value::irr(&issuer_flows, guess) {
            Ok(periodic) => {
                metrics.issuer_periodic_cost = Some(as_percent(periodic));
                metrics.issuer_annual_cost = annualize(periodic, frequency).map(as_percent);
            }
            Err(e) => warnings.push(format!("Issuer cost not solved: {e}")),
        }
    }

    metrics
}

/// Effective annual rate `(1 + periodic)^frequency - 1`.
fn annualize(periodic: Rate, frequency: PaymentFrequency) -> Option<Rate> {
    let one_plus = Decimal::ONE + periodic;
    let mut factor = Decimal::ONE;
    for _ in 0..frequency.periods_per_year() {
        factor = factor.checked_mul(one_plus)?;
    }
    Some(factor - Decimal::ONE)
}

fn as_percent(rate: Rate) -> Percent {
    (rate * Decimal::ONE_HUNDRED).round_dp(YIELD_DP).normalize()
}
