//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON has no cycles and no non-finite numbers. [`Value::to_json_lossy`]
//! writes a back-reference to an enclosing container as the string
//! `"[Circular]"` and a non-finite number as its rendered text. `Serialize`
//! goes through the same form.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};

use crate::render::format_number;
use crate::value::{Identity, Value};

const CIRCULAR: &str = "[Circular]";

impl Value {
    /// Convert to JSON, replacing what JSON cannot express.
    pub fn to_json_lossy(&self) -> serde_json::Value {
        to_json(self, &mut HashSet::new())
    }
}

/// `ancestors` holds the containers on the current descent, so shared but
/// acyclic sub-values are written out in full at every occurrence.
fn to_json(value: &Value, ancestors: &mut HashSet<Identity>) -> serde_json::Value {
    let id = value.identity();
    if let Some(id) = id {
        if !ancestors.insert(id) {
            return serde_json::Value::String(CIRCULAR.to_owned());
        }
    }

    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::List(list) => serde_json::Value::Array(
            list.borrow().iter().map(|item| to_json(item, ancestors)).collect(),
        ),
        Value::Record(record) => {
            let mut out = Map::new();
            for (key, item) in record.borrow().iter() {
                out.insert(key.clone(), to_json(item, ancestors));
            }
            serde_json::Value::Object(out)
        }
    };

    if let Some(id) = id {
        ancestors.remove(&id);
    }
    json
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(format_number(n)))
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::list(items.iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::record(map.iter().map(|(k, v)| (k.clone(), Value::from(v))))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_lossy().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
