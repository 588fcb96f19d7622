use serde_json::Value;

use super::{cell, result_of};

/// Key answer per command, most specific first.
const PRIORITY_KEYS: [&str; 5] = [
    "best_scenario",
    "savings.interest_saved",
    "emi",
    "baseline_emi",
    "totals.total_interest",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    for key in PRIORITY_KEYS {
        if let Some(val) = lookup(result, key) {
            if !val.is_null() {
                println!("{}", cell(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    println!("{}", cell(result));
}

/// Follow a dotted path through nested objects.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_dotted() {
        let v = json!({"savings": {"interest_saved": "14211.65"}});
        assert_eq!(lookup(&v, "savings.interest_saved"), Some(&json!("14211.65")));
        assert_eq!(lookup(&v, "savings.months_saved"), None);
    }
}
