//! Total ordering over JSON values, shared by range checks and sorting.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// Compares two optional JSON values.
///
/// Ordering rules:
/// - missing < null < bool < number < string < array < object
/// - For same types, natural ordering
/// - Two strings that both parse as RFC 3339 compare as instants
/// - Arrays and objects compare equal among themselves
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_rank(a_val);
            let b_type = type_rank(b_val);

            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => {
                    match (parse_timestamp(a_s), parse_timestamp(b_s)) {
                        (Some(a_ts), Some(b_ts)) => a_ts.cmp(&b_ts),
                        _ => a_s.cmp(b_s),
                    }
                }
                _ => Ordering::Equal,
            }
        }
    }
}

/// True when both values share a scalar type that has a natural order.
pub fn comparable(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Bool(_), Value::Bool(_))
    )
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    // Cheap shape check before a full parse: "YYYY-MM-DDT..."
    let bytes = s.as_bytes();
    if bytes.len() < 20 || bytes[4] != b'-' || bytes[10] != b'T' {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
