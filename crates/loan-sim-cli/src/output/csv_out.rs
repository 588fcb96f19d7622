use serde_json::Value;
use std::io;

use super::{cell, result_of, row_headers, split_result};

/// Write output as CSV to stdout.
///
/// A result carrying a schedule is written as one row per month (the last
/// schedule when there are several, i.e. the modified one); anything else as
/// field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => {
            let (scalars, tables) = split_result(map);
            if let Some((_, rows)) = tables.last() {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in &scalars {
                    let _ = wtr.write_record([key.as_str(), &cell(val)]);
                }
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let headers = row_headers(rows);
    if headers.is_empty() {
        return;
    }

    let _ = wtr.write_record(&headers);
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_use_union_of_keys() {
        let rows = vec![
            json!({"month_index": 1, "closing_balance": "900"}),
            json!({"month_index": 2, "prepayment_applied": "100", "closing_balance": "0"}),
        ];
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, &rows);
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        // serde_json maps iterate in key order
        assert_eq!(lines[0], "closing_balance,month_index,prepayment_applied");
        assert_eq!(lines[1], "900,1,");
        assert_eq!(lines[2], "0,2,100");
    }
}
