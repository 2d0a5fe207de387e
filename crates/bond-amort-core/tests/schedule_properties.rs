use bond_amort_core::amortization::{
    generate_schedule, AmortizationMethod, BondTerms, FeeSchedule, PaymentFrequency,
    ScheduleOptions,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn method_strategy() -> impl Strategy<Value = AmortizationMethod> {
    prop_oneof![
        Just(AmortizationMethod::EqualPrincipal),
        Just(AmortizationMethod::French),
        Just(AmortizationMethod::American),
    ]
}

fn frequency_strategy() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Monthly),
        Just(PaymentFrequency::Quarterly),
        Just(PaymentFrequency::Semiannual),
        Just(PaymentFrequency::Annual),
    ]
}

/// Longest schedule the default limits allow at `frequency` (15 years).
fn max_periods(frequency: PaymentFrequency) -> u32 {
    15 * frequency.periods_per_year()
}

fn terms(
    principal_cents: u64,
    rate_bp: u32,
    periods: u32,
    frequency: PaymentFrequency,
    insurance_bp: u32,
    admin_fee: u32,
) -> BondTerms {
    let issue = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    BondTerms {
        principal: Decimal::new(principal_cents as i64, 2),
        annual_rate: Decimal::new(rate_bp as i64, 2),
        issue_date: issue,
        maturity_date: NaiveDate::from_ymd_opt(2040, 1, 31).unwrap(),
        term_periods: Some(periods),
        payment_frequency: frequency,
        fees: FeeSchedule {
            life_insurance_pct: Decimal::new(insurance_bp as i64, 3),
            administrative_fee: Decimal::from(admin_fee),
            commission: dec!(50),
            ..FeeSchedule::default()
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_schedule_invariants_hold(
        principal_cents in 100_000u64..100_000_000,
        rate_bp in 0u32..3_000,
        periods in 1u32..=180,
        frequency in frequency_strategy(),
        method in method_strategy(),
        insurance_bp in 0u32..200,
        admin_fee in 0u32..30,
    ) {
        let periods = periods.min(max_periods(frequency));
        let terms = terms(principal_cents, rate_bp, periods, frequency, insurance_bp, admin_fee);
        let rows = generate_schedule(&terms, &ScheduleOptions::with_method(method)).unwrap();

        prop_assert_eq!(rows.len() as u32, periods);

        let total: Decimal = rows.iter().map(|r| r.amortization).sum();
        prop_assert!((total - terms.principal).abs() <= dec!(0.01));

        for (i, row) in rows.iter().enumerate() {
            prop_assert_eq!(row.period, i as u32 + 1);
            prop_assert!(row.closing_balance >= Decimal::ZERO);
            prop_assert!(row.amortization >= Decimal::ZERO);
            prop_assert_eq!(
                row.total_cash_flow,
                row.interest + row.amortization + row.recurring_charges
            );
        }
        for pair in rows.windows(2) {
            prop_assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
            prop_assert!(pair[1].date > pair[0].date);
        }
        prop_assert_eq!(rows[rows.len() - 1].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn prop_equal_principal_amortization_constant_until_last(
        principal_cents in 100_000u64..100_000_000,
        rate_bp in 0u32..3_000,
        periods in 2u32..=180,
        frequency in frequency_strategy(),
    ) {
        let periods = periods.min(max_periods(frequency));
        let terms = terms(principal_cents, rate_bp, periods, frequency, 0, 0);
        let rows = generate_schedule(&terms, &ScheduleOptions::default()).unwrap();
        let first = rows[0].amortization;
        for row in &rows[..rows.len() - 1] {
            prop_assert_eq!(row.amortization, first);
        }
    }

    #[test]
    fn prop_french_zero_rate_matches_equal_principal(
        principal_cents in 100_000u64..100_000_000,
        periods in 1u32..=180,
    ) {
        let terms = terms(principal_cents, 0, periods, PaymentFrequency::Monthly, 0, 0);
        let french = generate_schedule(
            &terms,
            &ScheduleOptions::with_method(AmortizationMethod::French),
        )
        .unwrap();
        let equal_principal = generate_schedule(&terms, &ScheduleOptions::default()).unwrap();
        prop_assert_eq!(french, equal_principal);
    }

    #[test]
    fn prop_generation_is_deterministic(
        principal_cents in 100_000u64..100_000_000,
        rate_bp in 0u32..3_000,
        periods in 1u32..=180,
        method in method_strategy(),
    ) {
        let periods = periods.min(max_periods(PaymentFrequency::Quarterly));
        let terms = terms(principal_cents, rate_bp, periods, PaymentFrequency::Quarterly, 10, 5);
        let options = ScheduleOptions::with_method(method);
        let a = serde_json::to_vec(&generate_schedule(&terms, &options).unwrap()).unwrap();
        let b = serde_json::to_vec(&generate_schedule(&terms, &options).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }
}
