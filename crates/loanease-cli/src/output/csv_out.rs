use serde_json::Value;
use std::io;

use super::{display_value, split_rows};

/// Write output as CSV to stdout. Scalar result fields come out as
/// `field,value` pairs; row collections follow as their own header + rows
/// block, separated by an empty record.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    if let Err(e) = write_csv(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> Result<(), csv::Error> {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => {
            let (scalars, tables) = split_rows(map);
            wtr.write_record(["field", "value"])?;
            for (key, val) in scalars {
                wtr.write_record([key.to_string(), display_value(val)])?;
            }
            for (_, rows) in tables {
                wtr.write_record([""])?;
                write_rows(wtr, rows)?;
            }
        }
        Value::Array(rows) => write_rows(wtr, rows)?,
        other => wtr.write_record([display_value(other)])?,
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([display_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(display_value).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_result_scalars_then_rows() {
        let out = json!({
            "result": {
                "emi": "100",
                "schedule": [
                    {"period": 3, "remaining_balance": "50"},
                    {"period": 6, "remaining_balance": "0"}
                ]
            },
            "warnings": []
        });
        assert_eq!(
            render(&out),
            "field,value\nemi,100\n\"\"\nperiod,remaining_balance\n3,50\n6,0\n"
        );
    }

    #[test]
    fn test_bare_rows() {
        let rows = json!([{"period": 3}, {"period": 6}]);
        assert_eq!(render(&rows), "period\n3\n6\n");
    }
}
