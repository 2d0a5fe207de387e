use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::plain;

/// Schedule columns, in display order.
const SCHEDULE_COLUMNS: [(&str, &str); 9] = [
    ("period", "Period"),
    ("date", "Date"),
    ("opening_balance", "Opening"),
    ("interest", "Interest"),
    ("amortization", "Amortization"),
    ("recurring_charges", "Charges"),
    ("total_cash_flow", "Cash flow"),
    ("closing_balance", "Closing"),
    ("present_value", "PV"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Array(rows) => print_schedule(rows),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_envelope(result, map),
            _ => print_object(map),
        },
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_object(result);

    if let Some(Value::Array(rows)) = result.get("schedule") {
        println!();
        print_schedule(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalar fields as a two-column table, nested objects as their own sections.
fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Object(_) | Value::Array(_) => continue,
            _ => builder.push_record([key.clone(), plain(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        if let Value::Object(section) = val {
            println!("\n{}", key);
            print_object(section);
        }
    }
}

fn print_schedule(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS.iter().map(|(_, title)| *title));

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|(key, _)| map.get(*key).map(plain).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
