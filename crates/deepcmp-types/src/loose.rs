//! Coercing ("loose") equality.
//!
//! Used by the comparator only when strict comparison is turned off. The
//! coercions, applied until both sides share a type:
//!
//! - `null` equals only `null`.
//! - A boolean becomes the number `1` or `0`.
//! - Text compared with a number is parsed as a number.
//! - A list or record compared with a scalar becomes its rendered text.
//! - Two containers are equal only when identical.

use crate::render::render;
use crate::value::Value;

/// Returns `true` if `a` and `b` are equal after coercion.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (x, y) if x.is_container() && y.is_container() => x.is_identical(y),
        (Value::Bool(x), other) => loose_eq(&bool_to_number(*x), other),
        (other, Value::Bool(y)) => loose_eq(other, &bool_to_number(*y)),
        (Value::Number(n), Value::Text(s)) | (Value::Text(s), Value::Number(n)) => {
            text_to_number(s) == Some(*n)
        }
        (container, scalar) if container.is_container() => {
            loose_eq(&Value::Text(render(container)), scalar)
        }
        (scalar, container) => loose_eq(scalar, &Value::Text(render(container))),
    }
}

fn bool_to_number(b: bool) -> Value {
    Value::Number(if b { 1.0 } else { 0.0 })
}

/// Parse text as a number the way coercing equality does.
///
/// Surrounding whitespace is ignored and empty text is `0`. Accepts decimal
/// literals with optional sign and exponent, `0x`/`0o`/`0b` integers, and
/// `Infinity` with optional sign. Anything else is `None`.
pub fn text_to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return radix_to_number(digits, radix);
        }
    }

    let well_formed = unsigned.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !well_formed {
        return None;
    }
    unsigned.parse::<f64>().ok().map(|n| sign * n)
}

fn radix_to_number(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
