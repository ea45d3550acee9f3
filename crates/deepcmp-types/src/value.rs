//! The dynamically-shaped value compared by deepcmp.
//!
//! Scalars are held inline. Lists and records are shared handles
//! (`Rc<RefCell<..>>`), which gives every container an allocation identity and
//! lets a container hold itself, directly or through other containers.
//!
//! # Invariants
//!
//! - Two container values are *identical* iff they point at the same allocation.
//! - Record keys are unique and iterate in sorted order.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::mem;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Shared handle to an ordered list.
pub type List = Rc<RefCell<Vec<Value>>>;

/// Shared handle to a keyed record.
pub type Record = Rc<RefCell<BTreeMap<String, Value>>>;

/// A dynamically-typed value: scalar, list, or record.
///
/// Cloning a container clones the handle, not the contents; the clone is
/// identical to the original.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(List),
    Record(Record),
}

/// The type tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Bool,
    Number,
    Text,
    List,
    Record,
}

impl Kind {
    /// The name used for this kind in messages.
    pub fn type_name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::Text => "string",
            Kind::List => "array",
            Kind::Record => "object",
        }
    }

    /// Returns `true` for lists and records.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::List | Kind::Record)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Allocation identity of a list or record.
///
/// Only meaningful while the container it was taken from is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Value {
    /// Build a list from its elements.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Build a record from key/value pairs. Later duplicates win.
    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// An empty record.
    pub fn empty_record() -> Self {
        Value::Record(Rc::default())
    }

    /// An empty list.
    pub fn empty_list() -> Self {
        Value::List(Rc::default())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::Text(_) => Kind::Text,
            Value::List(_) => Kind::List,
            Value::Record(_) => Kind::Record,
        }
    }

    /// Returns `true` for lists and records.
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// The allocation identity of a container, or `None` for scalars.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::List(list) => Some(Identity(Rc::as_ptr(list).cast::<()>() as usize)),
            Value::Record(record) => Some(Identity(Rc::as_ptr(record).cast::<()>() as usize)),
            _ => None,
        }
    }

    /// Strict identity: same scalar value, or the very same container.
    ///
    /// Numbers follow IEEE-754 equality, so `NaN` is never identical to
    /// itself and `0.0` is identical to `-0.0`.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Insert into a record, returning the previous value under `key`.
    ///
    /// Inserting a record into itself is how self-referential values are built.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Result<Option<Value>, TypeError> {
        let record = self.as_record().ok_or(TypeError::UnexpectedKind {
            expected: Kind::Record,
            actual: self.kind(),
        })?;
        Ok(record.borrow_mut().insert(key.into(), value))
    }

    /// Append to a list.
    pub fn push(&self, value: Value) -> Result<(), TypeError> {
        let list = self.as_list().ok_or(TypeError::UnexpectedKind {
            expected: Kind::List,
            actual: self.kind(),
        })?;
        list.borrow_mut().push(value);
        Ok(())
    }

    /// Look up a record entry by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_record()?.borrow().get(key).cloned()
    }

    /// Look up a list element by index.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        self.as_list()?.borrow().get(index).cloned()
    }

    /// Number of elements or entries; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::List(list) => list.borrow().len(),
            Value::Record(record) => record.borrow().len(),
            _ => 0,
        }
    }

    /// Returns `true` for scalars and for empty containers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structural equality with an identity shortcut for containers.
///
/// Two values are equal when unfolding them yields the same tree, so
/// distinct cyclic values compare without looping: a container pair met a
/// second time is taken as equal. Numbers follow IEEE-754, so a `NaN`
/// anywhere makes the values unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((a, b)) = pending.pop() {
            if a.is_identical(&b) {
                continue;
            }
            if a.is_container() && !seen.insert((a.identity(), b.identity())) {
                continue;
            }
            match (&a, &b) {
                (Value::List(x), Value::List(y)) => {
                    let (x, y) = (x.borrow(), y.borrow());
                    if x.len() != y.len() {
                        return false;
                    }
                    pending.extend(x.iter().cloned().zip(y.iter().cloned()));
                }
                (Value::Record(x), Value::Record(y)) => {
                    let (x, y) = (x.borrow(), y.borrow());
                    if x.len() != y.len() || !x.keys().eq(y.keys()) {
                        return false;
                    }
                    pending.extend(x.values().cloned().zip(y.values().cloned()));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Frees nested containers without recursing once per level.
///
/// Children of a container this value owns alone are moved onto a heap
/// stack before the container is released. Shared containers are left to
/// their other owners.
impl Drop for Value {
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        take_children(self, &mut orphans);
        while let Some(mut orphan) = orphans.pop() {
            take_children(&mut orphan, &mut orphans);
        }
    }
}

fn take_children(value: &mut Value, into: &mut Vec<Value>) {
    match value {
        Value::List(list) => {
            if let Some(items) = Rc::get_mut(list) {
                into.extend(mem::take(items.get_mut()));
            }
        }
        Value::Record(record) => {
            if let Some(entries) = Rc::get_mut(record) {
                into.extend(mem::take(entries.get_mut()).into_values());
            }
        }
        _ => {}
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json_lossy())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
