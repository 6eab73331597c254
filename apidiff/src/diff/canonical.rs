use serde_json::{Number, Value};

/// Copy of `values` ordered by [`canonical_key`].
pub fn sorted_by_canonical_form(values: &[Value]) -> Vec<Value> {
    let mut sorted = values.to_vec();
    sorted.sort_by_cached_key(canonical_key);
    sorted
}

/// Compact JSON encoding with object keys in sorted order and integral
/// numbers written without a fraction. Values that are [`deep_equal`] share a key.
pub fn canonical_key(value: &Value) -> String {
    let mut key = String::new();
    write_canonical(value, &mut key);
    key
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Number(number) => out.push_str(&canonical_number(number)),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

            out.push('{');
            for (index, (key, item)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn canonical_number(number: &Number) -> String {
    match integral_value(number) {
        Some(integer) => integer.to_string(),
        None => number.to_string(),
    }
}

/// Structural equality. Numbers compare by value, so `1` equals `1.0`.
pub fn deep_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => numbers_equal(lhs, rhs),
        (Value::Array(lhs), Value::Array(rhs)) => {
            lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(lhs), Value::Object(rhs)) => {
            lhs.len() == rhs.len()
                && lhs
                    .iter()
                    .all(|(key, l)| rhs.get(key).map_or(false, |r| deep_equal(l, r)))
        }
        _ => lhs == rhs,
    }
}

fn numbers_equal(lhs: &Number, rhs: &Number) -> bool {
    if lhs.is_f64() && rhs.is_f64() {
        return lhs.as_f64() == rhs.as_f64();
    }

    match (integral_value(lhs), integral_value(rhs)) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

// exact for every i64, every u64 and every float with no fractional part
fn integral_value(number: &Number) -> Option<i128> {
    if let Some(value) = number.as_i64() {
        return Some(i128::from(value));
    }
    if let Some(value) = number.as_u64() {
        return Some(i128::from(value));
    }

    const LIMIT: f64 = 1.7014118346046923e38; // 2^127
    number
        .as_f64()
        .filter(|value| value.is_finite() && value.fract() == 0.0 && value.abs() < LIMIT)
        .map(|value| value as i128)
}
