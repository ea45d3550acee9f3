//! Text rendering of values for human-readable messages.
//!
//! The rendering is the primitive text form of a value: numbers in shortest
//! round-trip form, text verbatim, lists as their comma-joined elements and
//! records as `[object Object]`. It is also the form a container takes when
//! loosely compared against a scalar.

use std::collections::HashSet;

use crate::value::{Identity, Value};

/// Pending output while rendering.
enum Piece {
    Item(Value),
    Comma,
    /// The list with this identity is fully written.
    Leave(Identity),
}

/// Render a value as message text.
///
/// Lists are expanded with an explicit stack, so arbitrarily deep nesting
/// does not grow the call stack.
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    let mut ancestors = HashSet::new();
    let mut pending = vec![Piece::Item(value.clone())];

    while let Some(piece) = pending.pop() {
        let value = match piece {
            Piece::Item(value) => value,
            Piece::Comma => {
                out.push(',');
                continue;
            }
            Piece::Leave(id) => {
                ancestors.remove(&id);
                continue;
            }
        };
        match &value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::Text(s) => out.push_str(s),
            Value::Record(_) => out.push_str("[object Object]"),
            Value::List(list) => {
                let Some(id) = value.identity() else { continue };
                // A list that contains itself renders the back-reference as empty.
                if !ancestors.insert(id) {
                    continue;
                }
                pending.push(Piece::Leave(id));
                for (index, item) in list.borrow().iter().enumerate().rev() {
                    if !matches!(item, Value::Null) {
                        pending.push(Piece::Item(item.clone()));
                    }
                    if index > 0 {
                        pending.push(Piece::Comma);
                    }
                }
            }
        }
    }
    out
}

/// Render a number the way messages show it: shortest round-trip digits,
/// integral values without a fraction, `NaN`, `Infinity` and `-Infinity`
/// spelled out, `-0` as `0`.
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent notation with an
/// explicit exponent sign (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        "0".to_owned()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((digits, exponent)) if !exponent.starts_with('-') => {
                format!("{digits}e+{exponent}")
            }
            _ => text,
        }
    } else {
        format!("{n}")
    }
}
