use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::BondAmortError;
use crate::types::{Money, Rate};
use crate::BondAmortResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const MIN_RATE: Decimal = dec!(-0.99);
const MAX_RATE: Decimal = dec!(10);

/// Discount a single amount received `periods` periods from now.
pub fn discount(amount: Money, rate: Rate, periods: u32) -> BondAmortResult<Money> {
    if rate <= dec!(-1) {
        return Err(BondAmortError::InvalidTerm {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for t in 0..periods {
        factor = factor
            .checked_mul(one_plus_r)
            .ok_or_else(|| BondAmortError::DivisionByZero {
                context: format!("discount factor overflow at period {}", t + 1),
            })?;
    }

    Ok(amount / factor)
}

/// Internal Rate of Return using Newton-Raphson.
///
/// Discount factors are built by iterative multiplication so that long
/// monthly schedules stay exact in 128-bit decimal arithmetic.
pub fn irr(cash_flows: &[Money], guess: Rate) -> BondAmortResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(BondAmortError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = guess.clamp(MIN_RATE, MAX_RATE);
    let mut npv_val = Decimal::ZERO;

    for i in 0..MAX_IRR_ITERATIONS {
        let (value, derivative) =
            npv_and_derivative(rate, cash_flows).ok_or_else(|| {
                BondAmortError::ConvergenceFailure {
                    function: "IRR".into(),
                    iterations: i,
                    last_delta: npv_val,
                }
            })?;
        npv_val = value;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if derivative.is_zero() {
            return Err(BondAmortError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        rate -= npv_val / derivative;

        // Guard against divergence
        rate = rate.clamp(MIN_RATE, MAX_RATE);
    }

    Err(BondAmortError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv_val,
    })
}

/// NPV and dNPV/dr at `rate`; `None` when a discount factor overflows.
fn npv_and_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        if discount.is_zero() {
            return None;
        }
        value += cf.checked_div(discount)?;
        if t > 0 {
            let t_dec = Decimal::from(t as u64);
            let next = discount.checked_mul(one_plus_r)?;
            derivative -= t_dec.checked_mul(*cf)?.checked_div(next)?;
        }
    }

    Some((value, derivative))
}

/// Payment (PMT)
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> BondAmortResult<Money> {
    if nper == 0 {
        return Err(BondAmortError::InvalidTerm {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..nper {
        factor = factor
            .checked_mul(one_plus_r)
            .ok_or_else(|| BondAmortError::DivisionByZero {
                context: "PMT compounding factor overflow".into(),
            })?;
    }
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(BondAmortError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    Ok(-(present_value * factor + future_value) / annuity_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_discount_single_amount() {
        let result = discount(dec!(121), dec!(0.10), 2).unwrap();
        assert_eq!(result, dec!(100));
        assert_eq!(discount(dec!(55), dec!(0.10), 0).unwrap(), dec!(55));
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_par_bond_equals_coupon() {
        // 1000 par, 5% coupon, 3 periods
        let cfs = vec![dec!(-1000), dec!(50), dec!(50), dec!(1050)];
        let result = irr(&cfs, dec!(0.01)).unwrap();
        assert!((result - dec!(0.05)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_irr_requires_two_flows() {
        assert!(matches!(
            irr(&[dec!(-100)], dec!(0.1)),
            Err(BondAmortError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_pmt_annuity() {
        // 10000 over 24 months at 8.5% nominal: ~454.56
        let rate = dec!(0.085) / dec!(12);
        let result = pmt(rate, 24, dec!(-10000), Decimal::ZERO).unwrap();
        assert!((result - dec!(454.56)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate() {
        let result = pmt(Decimal::ZERO, 4, dec!(-1000), Decimal::ZERO).unwrap();
        assert_eq!(result, dec!(250));
    }

    #[test]
    fn test_pmt_zero_periods() {
        assert!(pmt(dec!(0.01), 0, dec!(-1000), Decimal::ZERO).is_err());
    }
}
