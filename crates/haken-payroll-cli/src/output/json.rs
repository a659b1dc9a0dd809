use serde_json::Value;

/// Print JSON to stdout. Calculation envelopes are pretty-printed; a bare
/// list of labels or numbers (`sort-periods`) stays on one line.
pub fn print_json(value: &Value) {
    match render_json(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn render_json(value: &Value) -> serde_json::Result<String> {
    match value {
        Value::Array(items) if items.iter().all(is_scalar) => serde_json::to_string(value),
        _ => serde_json::to_string_pretty(value),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_list_on_one_line() {
        let labels = json!(["2025年2月", "2025年10月"]);
        assert_eq!(render_json(&labels).unwrap(), r#"["2025年2月","2025年10月"]"#);
    }

    #[test]
    fn test_envelope_pretty_printed() {
        let envelope = json!({ "result": { "gross_profit": "43400" }, "warnings": [] });
        assert!(render_json(&envelope).unwrap().contains('\n'));
    }
}
