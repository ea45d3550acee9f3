//! Comparison output: the result and its difference records.

use std::fmt;

use deepcmp_types::{render, Kind, Value};
use serde::{Serialize, Serializer};

const MISSING: &str = "(missing)";

/// The outcome of comparing two values.
///
/// `==` compares the recorded operands structurally and terminates on
/// cyclic operands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// `true` iff no divergence was found.
    pub equal: bool,
    /// Every divergence in discovery order. Empty unless verbose reporting
    /// was requested.
    pub differences: Vec<Difference>,
}

impl ComparisonResult {
    /// Number of recorded differences.
    pub fn len(&self) -> usize {
        self.differences.len()
    }

    /// Returns `true` if no differences were recorded.
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Number of recorded differences of one kind.
    pub fn count(&self, kind: DifferenceKind) -> usize {
        self.differences.iter().filter(|d| d.kind == kind).count()
    }

    /// The first recorded difference at a rendered path.
    pub fn at_path(&self, path: &str) -> Option<&Difference> {
        self.differences.iter().find(|d| d.path == path)
    }
}

/// The category of a divergence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// The two sides have different type tags.
    TypeMismatch,
    /// One side is a list and the other a record.
    ContainerKindMismatch,
    /// A key or index exists on only one side.
    MissingKey,
    /// Two scalars of the same type differ.
    ValueMismatch,
    /// A container already paired with one value met a different one.
    CircularReferenceMismatch,
}

/// One side of a difference: the sub-value found there, or nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Present(Value),
    Missing,
}

impl Operand {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Operand::Present(v) => Some(v),
            Operand::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Operand::Missing)
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Present(v)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Present(v) => f.write_str(&render(v)),
            Operand::Missing => f.write_str(MISSING),
        }
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Present(v) => v.serialize(serializer),
            Operand::Missing => serializer.serialize_str(MISSING),
        }
    }
}

/// One recorded divergence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Difference {
    /// Rendered location, empty for the root.
    pub path: String,
    pub value1: Operand,
    pub value2: Operand,
    pub kind: DifferenceKind,
    /// Human-readable explanation.
    pub message: String,
}

impl Difference {
    pub(crate) fn type_mismatch(path: String, a: &Value, b: &Value) -> Self {
        Self::between(
            path,
            a,
            b,
            DifferenceKind::TypeMismatch,
            format!("Types differ: {} vs {}", a.kind(), b.kind()),
        )
    }

    pub(crate) fn container_kind_mismatch(path: String, a: &Value, b: &Value) -> Self {
        Self::between(
            path,
            a,
            b,
            DifferenceKind::ContainerKindMismatch,
            format!("Container kinds differ: {} vs {}", a.kind(), b.kind()),
        )
    }

    pub(crate) fn value_mismatch(path: String, a: &Value, b: &Value) -> Self {
        Self::between(
            path,
            a,
            b,
            DifferenceKind::ValueMismatch,
            format!("Values differ: {} vs {}", render(a), render(b)),
        )
    }

    pub(crate) fn circular_mismatch(path: String, a: &Value, b: &Value) -> Self {
        Self::between(
            path,
            a,
            b,
            DifferenceKind::CircularReferenceMismatch,
            "Circular reference mismatch detected".to_owned(),
        )
    }

    pub(crate) fn missing_key(path: String, key: &str, value1: Operand, value2: Operand) -> Self {
        Self {
            path,
            value1,
            value2,
            kind: DifferenceKind::MissingKey,
            message: format!("Key \"{key}\" is missing in one of the objects"),
        }
    }

    fn between(path: String, a: &Value, b: &Value, kind: DifferenceKind, message: String) -> Self {
        Self {
            path,
            value1: Operand::Present(a.clone()),
            value2: Operand::Present(b.clone()),
            kind,
            message,
        }
    }

    /// Returns `true` if both sides hold a value of the same container kind.
    pub fn is_structural(&self) -> bool {
        matches!(
            (self.value1.value().map(Value::kind), self.value2.value().map(Value::kind)),
            (Some(Kind::List), Some(Kind::List)) | (Some(Kind::Record), Some(Kind::Record))
        )
    }
}
