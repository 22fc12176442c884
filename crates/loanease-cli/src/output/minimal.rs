use serde_json::Value;

use super::display_value;

/// Headline field of each command, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "emi",
    "decision",
    "risk_score",
    "final_probability",
    "probability",
    "total_payable",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return display_value(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, display_value(val));
        }
    }

    if let Value::Array(rows) = result_obj {
        return format!("{} rows", rows.len());
    }

    display_value(result_obj)
}
