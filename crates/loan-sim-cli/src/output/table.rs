use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{cell, result_of, row_headers, split_result};

/// Format output as tables: headline fields first, then one table per
/// schedule-like array.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            let (scalars, tables) = split_result(map);

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in &scalars {
                builder.push_record([key.clone(), cell(val)]);
            }
            println!("{}", Table::from(builder));

            for (name, rows) in &tables {
                println!("\n{name}:");
                print_rows(rows);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", cell(result)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", cell(w));
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    let headers = match rows.first() {
        Some(Value::Object(_)) => row_headers(rows),
        Some(_) => {
            for item in rows {
                println!("{}", cell(item));
            }
            return;
        }
        None => {
            println!("(empty)");
            return;
        }
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}
