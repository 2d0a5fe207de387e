use serde_json::Value;
use std::io;

use super::{plain, unwrap_result};

/// Write output as CSV to stdout.
///
/// A schedule (bare, or the `schedule` field of a full calculation) becomes
/// one row per period; anything else becomes `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = unwrap_result(value);
    match result {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("schedule") {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &plain(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&plain(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
