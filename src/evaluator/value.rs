use serde_json::Value;

/// Coerces a resolved value to the string form every comparison works on.
///
/// Missing values and `null` become the empty string.
pub fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && fits_i64(f) => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Whether a value counts as "nothing there": missing, `null`, `false`, zero or `""`.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn fits_i64(f: f64) -> bool {
    (i64::MIN as f64..i64::MAX as f64).contains(&f)
}
