use serde_json::Value;

use super::{plain, unwrap_result};

/// Headline fields in order of priority.
const PRIORITY_KEYS: [&str; 5] = [
    "investor_annual_yield",
    "approximate_yield",
    "total_cash_flow",
    "present_value",
    "path",
];

/// Print just the key answer value from the output.
///
/// Schedules print their period count; summaries and full calculations print
/// the first headline field present, searching nested objects one level down.
pub fn print_minimal(value: &Value) {
    let result = unwrap_result(value);

    if let Value::Array(rows) = result {
        println!("{}", rows.len());
        return;
    }

    if let Value::Object(map) = result {
        let nested = map.values().filter_map(Value::as_object);
        let scopes: Vec<_> = std::iter::once(map).chain(nested).collect();

        for key in PRIORITY_KEYS {
            for scope in &scopes {
                if let Some(val) = scope.get(key).filter(|v| !v.is_null()) {
                    println!("{}", plain(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    println!("{}", plain(result));
}
