use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::data::error::InvalidFilter;
use crate::{Record, Result};

/// Resolves a dotted path inside a record.
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Evaluates `filter` against `record`.
///
/// `null` and `{}` match everything. Anything other than an object is an
/// invalid filter.
pub fn matches(record: &Record, filter: &Value) -> Result<bool> {
    match filter {
        Value::Null => Ok(true),
        Value::Object(conditions) => matches_all(record, conditions),
        other => Err(InvalidFilter(format!("expected an object, got {}", other)).into()),
    }
}

fn matches_all(record: &Record, conditions: &Map<String, Value>) -> Result<bool> {
    for (key, condition) in conditions {
        let matched = match key.as_str() {
            "$and" => {
                let mut all = true;
                for clause in clauses(key, condition)? {
                    if !matches(record, clause)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => any_clause(record, key, condition)?,
            "$nor" => !any_clause(record, key, condition)?,
            op if op.starts_with('$') => {
                return Err(InvalidFilter(format!("unknown top-level operator {}", op)).into());
            }
            path => matches_condition(lookup(record, path), condition)?,
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn clauses<'a>(key: &str, condition: &'a Value) -> Result<&'a Vec<Value>> {
    match condition {
        Value::Array(items) if !items.is_empty() => Ok(items),
        _ => Err(InvalidFilter(format!("{} expects a non-empty array", key)).into()),
    }
}

fn any_clause(record: &Record, key: &str, condition: &Value) -> Result<bool> {
    for clause in clauses(key, condition)? {
        if matches(record, clause)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_operator_object(condition: &Value) -> bool {
    match condition {
        Value::Object(map) => !map.is_empty() && map.keys().all(|k| k.starts_with('$')),
        _ => false,
    }
}

fn matches_condition(field: Option<&Value>, condition: &Value) -> Result<bool> {
    let Value::Object(operators) = condition else {
        return Ok(equals_or_contains(field, condition));
    };
    if !is_operator_object(condition) {
        return Ok(equals_or_contains(field, condition));
    }

    for (op, operand) in operators {
        let matched = match op.as_str() {
            "$eq" => equals_or_contains(field, operand),
            "$ne" => !equals_or_contains(field, operand),
            "$gt" => any_ordered(field, operand, |o| o == Ordering::Greater),
            "$gte" => any_ordered(field, operand, |o| o != Ordering::Less),
            "$lt" => any_ordered(field, operand, |o| o == Ordering::Less),
            "$lte" => any_ordered(field, operand, |o| o != Ordering::Greater),
            "$in" => in_list(field, op, operand)?,
            "$nin" => !in_list(field, op, operand)?,
            "$exists" => match operand {
                Value::Bool(expected) => field.is_some() == *expected,
                _ => return Err(InvalidFilter("$exists expects a boolean".to_string()).into()),
            },
            other => {
                return Err(InvalidFilter(format!("unknown operator {}", other)).into());
            }
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn in_list(field: Option<&Value>, op: &str, operand: &Value) -> Result<bool> {
    match operand {
        Value::Array(candidates) => Ok(candidates.iter().any(|c| equals_or_contains(field, c))),
        _ => Err(InvalidFilter(format!("{} expects an array", op)).into()),
    }
}

/// Equality where a missing field equals null and an array field matches
/// when any element does.
fn equals_or_contains(field: Option<&Value>, expected: &Value) -> bool {
    match field {
        None => expected.is_null(),
        Some(value) if values_equal(value, expected) => true,
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, expected)),
        Some(_) => false,
    }
}

/// Range comparisons only hold between values of the same kind.
fn any_ordered(field: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    let check = |value: &Value| type_rank(value) == type_rank(operand) && accept(compare_values(value, operand));
    match field {
        None => false,
        Some(Value::Array(items)) if !operand.is_array() => items.iter().any(check),
        Some(value) => check(value),
    }
}

pub fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Ordering::Equal
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Total order over JSON values: null, numbers, strings, objects, arrays,
/// booleans. Numbers compare by magnitude regardless of representation.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ord = compare_values(left, right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            for ((lk, lv), (rk, rv)) in x.iter().zip(y.iter()) {
                let ord = lk.cmp(rk).then_with(|| compare_values(lv, rv));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    match (exact_integer(x), exact_integer(y)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_integer_float(x, y.as_f64().unwrap_or(0.0)),
        (None, Some(y)) => compare_integer_float(y, x.as_f64().unwrap_or(0.0)).reverse(),
        (None, None) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    }
}

fn exact_integer(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Compares without rounding the integer through `f64`.
fn compare_integer_float(int: i128, float: f64) -> Ordering {
    // Every u64 and i64 lies strictly inside +-2^127.
    const BOUND: f64 = 170141183460469231731687303715884105728.0;
    if float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    int.cmp(&(whole as i128)).then_with(|| {
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}
