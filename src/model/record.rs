use indexmap::IndexMap;
use serde_json::Value;

/// A record as returned by the record endpoint: field name to value, in the
/// order the server sent them.
pub type Record = IndexMap<String, Value>;

/// Render a field value as text for the detail panel.
///
/// Whole floats print without a fractional part (`1500.0` → `1500`), the
/// way the board page shows amounts.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        format!("{}", f as i64)
                    }
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
