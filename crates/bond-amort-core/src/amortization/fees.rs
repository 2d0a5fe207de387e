//! Fee structure of a bond: one-time issuance costs and per-period charges.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondAmortError;
use crate::types::{pct_to_rate, round_money, Money, Percent};
use crate::BondAmortResult;

use super::terms::ScheduleLimits;

/// Placement at par.
pub const PAR_PLACEMENT_PRICE: Percent = dec!(100);

/// Placement price, one-time costs (percent of principal) and recurring per-period charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub issuance_pct: Percent,
    /// Price the issue is placed at, percent of nominal: below 100 is a discount,
    /// above 100 a premium
    pub placement_price: Percent,
    pub structuring_pct: Percent,
    /// Settlement / registry (CAVALI) cost
    pub settlement_pct: Percent,

    /// Life/disability insurance (desgravamen), percent of the opening balance per period
    pub life_insurance_pct: Percent,
    /// All-risk insurance amount charged every period
    pub all_risk_insurance: Money,
    pub administrative_fee: Money,
    pub postage_fee: Money,
    /// Charged in the first period only
    pub commission: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            issuance_pct: Decimal::ZERO,
            placement_price: PAR_PLACEMENT_PRICE,
            structuring_pct: Decimal::ZERO,
            settlement_pct: Decimal::ZERO,
            life_insurance_pct: Decimal::ZERO,
            all_risk_insurance: Decimal::ZERO,
            administrative_fee: Decimal::ZERO,
            postage_fee: Decimal::ZERO,
            commission: Decimal::ZERO,
        }
    }
}

impl FeeSchedule {
    pub fn validate(&self, limits: &ScheduleLimits) -> BondAmortResult<()> {
        if self.placement_price < limits.min_placement_price
            || self.placement_price > limits.max_placement_price
        {
            return Err(BondAmortError::invalid_term(
                "fees.placement_price",
                format!(
                    "Placement price must be between {}% and {}% of nominal",
                    limits.min_placement_price, limits.max_placement_price
                ),
            ));
        }

        let fields = [
            ("fees.issuance_pct", self.issuance_pct),
            ("fees.structuring_pct", self.structuring_pct),
            ("fees.settlement_pct", self.settlement_pct),
            ("fees.life_insurance_pct", self.life_insurance_pct),
            ("fees.all_risk_insurance", self.all_risk_insurance),
            ("fees.administrative_fee", self.administrative_fee),
            ("fees.postage_fee", self.postage_fee),
            ("fees.commission", self.commission),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(BondAmortError::invalid_term(field, "Fees cannot be negative"));
            }
        }
        Ok(())
    }
}

/// Charges levied in one period, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCharges {
    pub life_insurance: Money,
    pub all_risk_insurance: Money,
    pub administrative_fee: Money,
    pub postage_fee: Money,
    pub commission: Money,
}

impl RecurringCharges {
    pub fn total(&self) -> Money {
        self.life_insurance
            + self.all_risk_insurance
            + self.administrative_fee
            + self.postage_fee
            + self.commission
    }

    /// Each component rounded to the minor currency unit.
    pub fn rounded(&self) -> RecurringCharges {
        RecurringCharges {
            life_insurance: round_money(self.life_insurance),
            all_risk_insurance: round_money(self.all_risk_insurance),
            administrative_fee: round_money(self.administrative_fee),
            postage_fee: round_money(self.postage_fee),
            commission: round_money(self.commission),
        }
    }
}

/// Charges for `period`, with insurance levied on that period's opening balance.
pub fn recurring_charges(fees: &FeeSchedule, period: u32, opening_balance: Money) -> RecurringCharges {
    RecurringCharges {
        life_insurance: pct_to_rate(fees.life_insurance_pct) * opening_balance,
        all_risk_insurance: fees.all_risk_insurance,
        administrative_fee: fees.administrative_fee,
        postage_fee: fees.postage_fee,
        commission: if period == 1 {
            fees.commission
        } else {
            Decimal::ZERO
        },
    }
}

/// Placement and one-time costs of an issue, kept out of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpfrontCosts {
    pub principal: Money,
    /// Amount raised at the placement price
    pub placement_proceeds: Money,
    /// Premium (positive) or discount (negative) against principal
    pub placement_premium: Money,
    pub issuance: Money,
    pub structuring: Money,
    pub settlement: Money,
    /// Issuance, structuring and settlement costs
    pub total: Money,
    /// Placement proceeds less all one-time costs
    pub net_proceeds: Money,
}

/// Placement proceeds and one-time costs as amounts of `principal`.
pub fn upfront_costs(fees: &FeeSchedule, principal: Money) -> UpfrontCosts {
    let amount = |pct: Percent| round_money(pct_to_rate(pct) * principal);

    let principal = round_money(principal);
    let placement_proceeds = amount(fees.placement_price);
    let issuance = amount(fees.issuance_pct);
    let structuring = amount(fees.structuring_pct);
    let settlement = amount(fees.settlement_pct);
    let total = issuance + structuring + settlement;

    UpfrontCosts {
        principal,
        placement_proceeds,
        placement_premium: placement_proceeds - principal,
        issuance,
        structuring,
        settlement,
        total,
        net_proceeds: placement_proceeds - total,
    }
}
