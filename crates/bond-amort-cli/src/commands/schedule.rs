use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use bond_amort_core::amortization::{
    calculate_bond, duration_years, generate_schedule, resolve_total_periods, summarize,
    AmortizationMethod, BondCalculationInput,
};

use crate::config::CliConfig;
use crate::input;

/// Arguments shared by the schedule, summary and calculate commands
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file ({"terms": {...}, "options": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Amortization method: equal-principal, french or american
    #[arg(long)]
    pub method: Option<String>,

    /// Annual discount rate for present values, in percent
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Investor's holding, replacing the bond principal
    #[arg(long)]
    pub invested_amount: Option<Decimal>,
}

/// Read the calculation input and layer stored defaults and flags over it.
///
/// Precedence: flags, then options in the input file, then stored config.
fn load_input(
    args: &ScheduleArgs,
    settings: &CliConfig,
) -> Result<BondCalculationInput, Box<dyn std::error::Error>> {
    let raw = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required")?;

    let has_option = |key: &str| {
        raw.get("options")
            .and_then(|o| o.get(key))
            .is_some_and(|v| !v.is_null())
    };
    let method_in_input = has_option("method");
    let discount_in_input = has_option("discount_rate");

    let mut calc: BondCalculationInput = serde_json::from_value(raw)?;

    if !method_in_input {
        if let Some(method) = settings.method {
            calc.options.method = method;
        }
    }
    if !discount_in_input {
        if let Some(rate) = settings.discount_rate {
            calc.options.discount_rate = rate;
        }
    }

    if let Some(ref method) = args.method {
        calc.options.method = method.parse::<AmortizationMethod>()?;
    }
    if let Some(rate) = args.discount_rate {
        calc.options.discount_rate = rate;
    }
    if let Some(amount) = args.invested_amount {
        calc.options.invested_amount = Some(amount);
    }

    debug!(
        method = %calc.options.method,
        discount_rate = %calc.options.discount_rate,
        principal = %calc.terms.principal,
        frequency = %calc.terms.payment_frequency,
        "resolved calculation input"
    );
    Ok(calc)
}

pub fn run_schedule(
    args: ScheduleArgs,
    settings: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc = load_input(&args, settings)?;
    let rows = generate_schedule(&calc.terms, &calc.options)?;
    info!(periods = rows.len(), "schedule generated");
    Ok(serde_json::to_value(rows)?)
}

pub fn run_summary(
    args: ScheduleArgs,
    settings: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc = load_input(&args, settings)?;
    let rows = generate_schedule(&calc.terms, &calc.options)?;
    let periods = resolve_total_periods(&calc.terms, &calc.options.limits)?;
    let principal = calc.options.invested_amount.unwrap_or(calc.terms.principal);
    let summary = summarize(
        &rows,
        principal,
        duration_years(periods, calc.terms.payment_frequency),
    )?;
    info!(approximate_yield = %summary.approximate_yield, "summary computed");
    Ok(serde_json::to_value(summary)?)
}

pub fn run_calculate(
    args: ScheduleArgs,
    settings: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc = load_input(&args, settings)?;
    let result = calculate_bond(&calc)?;
    for warning in &result.warnings {
        info!(%warning, "calculation warning");
    }
    Ok(serde_json::to_value(result)?)
}
