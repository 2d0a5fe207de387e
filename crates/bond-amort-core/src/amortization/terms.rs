//! Bond terms as entered by an issuer, and the period arithmetic derived from them.
//!
//! Terms are immutable value objects. Every schedule calculation validates them
//! against [`ScheduleLimits`] before a single row is produced.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BondAmortError;
use crate::types::{pct_to_rate, Money, Percent, Rate, Years};
use crate::BondAmortResult;

use super::fees::FeeSchedule;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

// ---------------------------------------------------------------------------
// Payment frequency
// ---------------------------------------------------------------------------

/// How many coupon payments fall in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[serde(alias = "mensual")]
    Monthly,
    #[serde(alias = "trimestral")]
    Quarterly,
    #[serde(alias = "semestral")]
    Semiannual,
    #[serde(alias = "anual")]
    Annual,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 4] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Semiannual,
        PaymentFrequency::Annual,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Semiannual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    pub fn months_per_period(self) -> u32 {
        12 / self.periods_per_year()
    }

    pub fn from_periods_per_year(periods: u32) -> BondAmortResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.periods_per_year() == periods)
            .ok_or_else(|| {
                BondAmortError::invalid_term(
                    "payment_frequency",
                    format!("{periods} payments per year is not supported; use 1, 2, 4, or 12"),
                )
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Semiannual => "semiannual",
            PaymentFrequency::Annual => "annual",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = BondAmortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(periods) = normalized.parse::<u32>() {
            return Self::from_periods_per_year(periods);
        }
        match normalized.as_str() {
            "monthly" | "mensual" => Ok(PaymentFrequency::Monthly),
            "quarterly" | "trimestral" => Ok(PaymentFrequency::Quarterly),
            "semiannual" | "semi-annual" | "semestral" => Ok(PaymentFrequency::Semiannual),
            "annual" | "anual" => Ok(PaymentFrequency::Annual),
            other => Err(BondAmortError::invalid_term(
                "payment_frequency",
                format!("unknown payment frequency '{other}'"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Terms and limits
// ---------------------------------------------------------------------------

/// Input terms of a single bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Face amount financed / invested
    pub principal: Money,
    /// Nominal annual coupon rate in percent (8.5 = 8.5%)
    pub annual_rate: Percent,
    pub issue_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// Explicit number of periods; derived from the date span when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_periods: Option<u32>,
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub fees: FeeSchedule,
}

/// Business bounds enforced on every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleLimits {
    pub max_periods: u32,
    /// Longest term in years, whatever the frequency
    pub max_term_years: u32,
    pub max_principal: Money,
    /// Upper bound on the annual rate, in percent
    pub max_annual_rate: Percent,
    /// Placement price range, percent of nominal
    pub min_placement_price: Percent,
    pub max_placement_price: Percent,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            max_periods: 180,
            max_term_years: 15,
            max_principal: dec!(1000000),
            max_annual_rate: dec!(100),
            min_placement_price: dec!(50),
            max_placement_price: dec!(150),
        }
    }
}

impl BondTerms {
    /// Check the terms against `limits` without building anything.
    pub fn validate(&self, limits: &ScheduleLimits) -> BondAmortResult<()> {
        validate_principal("principal", self.principal, limits)?;
        if self.annual_rate < Decimal::ZERO {
            return Err(BondAmortError::invalid_term(
                "annual_rate",
                "Annual rate cannot be negative",
            ));
        }
        if self.annual_rate > limits.max_annual_rate {
            return Err(BondAmortError::invalid_term(
                "annual_rate",
                format!("Annual rate cannot exceed {}%", limits.max_annual_rate),
            ));
        }
        if self.maturity_date <= self.issue_date {
            return Err(BondAmortError::invalid_term(
                "maturity_date",
                "Maturity date must be after issue date",
            ));
        }
        self.fees.validate(limits)?;
        Ok(())
    }

    pub fn periods_per_year(&self) -> u32 {
        self.payment_frequency.periods_per_year()
    }
}

pub(crate) fn validate_principal(
    field: &str,
    amount: Money,
    limits: &ScheduleLimits,
) -> BondAmortResult<()> {
    if amount <= Decimal::ZERO {
        return Err(BondAmortError::invalid_term(field, "Principal must be positive"));
    }
    if amount > limits.max_principal {
        return Err(BondAmortError::invalid_term(
            field,
            format!("Principal cannot exceed {}", limits.max_principal),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Period arithmetic
// ---------------------------------------------------------------------------

/// Number of payment periods in the schedule.
///
/// An explicit `term_periods` wins; otherwise the date span in years
/// (365.25-day years) times the frequency, rounded up so the schedule always
/// reaches maturity.
pub fn resolve_total_periods(terms: &BondTerms, limits: &ScheduleLimits) -> BondAmortResult<u32> {
    if terms.maturity_date <= terms.issue_date {
        return Err(BondAmortError::invalid_term(
            "maturity_date",
            "Maturity date must be after issue date",
        ));
    }

    let periods = match terms.term_periods {
        Some(n) => n,
        None => {
            let days = (terms.maturity_date - terms.issue_date).num_days();
            let years = Decimal::from(days) / DAYS_PER_YEAR;
            let raw = (years * Decimal::from(terms.periods_per_year())).ceil();
            raw.to_u32().ok_or_else(|| {
                BondAmortError::invalid_term("term_periods", "Period count out of range")
            })?
        }
    };

    if periods == 0 {
        return Err(BondAmortError::invalid_term(
            "term_periods",
            "Schedule must have at least one period",
        ));
    }
    if periods > limits.max_periods {
        return Err(BondAmortError::invalid_term(
            "term_periods",
            format!(
                "{periods} periods exceeds the supported maximum of {}",
                limits.max_periods
            ),
        ));
    }

    let years = duration_years(periods, terms.payment_frequency);
    if years > Decimal::from(limits.max_term_years) {
        return Err(BondAmortError::invalid_term(
            "term_periods",
            format!(
                "{periods} {} periods span {years} years, beyond the supported maximum of {}",
                terms.payment_frequency, limits.max_term_years
            ),
        ));
    }

    Ok(periods)
}

/// Coupon rate per period: nominal annual rate split pro rata.
pub fn periodic_rate(terms: &BondTerms) -> Rate {
    pct_to_rate(terms.annual_rate) / Decimal::from(terms.periods_per_year())
}

/// Schedule length in years.
pub fn duration_years(total_periods: u32, frequency: PaymentFrequency) -> Years {
    Decimal::from(total_periods) / Decimal::from(frequency.periods_per_year())
}

/// Payment date of `period`, clamped to the last day of shorter months.
pub fn payment_date(
    issue_date: NaiveDate,
    period: u32,
    frequency: PaymentFrequency,
) -> BondAmortResult<NaiveDate> {
    period
        .checked_mul(frequency.months_per_period())
        .and_then(|months| issue_date.checked_add_months(Months::new(months)))
        .ok_or_else(|| {
            BondAmortError::DateError(format!(
                "payment date for period {period} from {issue_date} is out of range"
            ))
        })
}
