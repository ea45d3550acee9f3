//! The depth-first structural comparator.
//!
//! Every visited pair `(a, b)` goes through the same decision policy, in order:
//!
//! 1. Non-strict mode: pairs equal after coercion are equal.
//! 2. Different type tags are a type mismatch (a list against a record is a
//!    container-kind mismatch). Stop.
//! 3. Identical scalars, or the very same container, are equal.
//! 4. Containers descend over the union of their keys, unless the side-1
//!    container was already paired with some side-2 value: the same one is
//!    equal, another one is a circular-reference mismatch.
//! 5. Anything else is a value mismatch.
//!
//! Keys are enumerated side-1 first in natural order, then keys found only on
//! side 2. A key missing on one side is reported and the walk continues with
//! the remaining keys.
//!
//! The walk keeps its own stack instead of recursing, so nesting depth is
//! bounded by memory rather than by the thread's call stack. Frames are
//! pushed in reverse so they pop in the order a recursive walk would visit
//! them, which keeps the reported order identical.

use deepcmp_types::{loose_eq, Value};
use tracing::{debug, trace};

use crate::options::CompareOptions;
use crate::path::{Path, Segment};
use crate::result::{ComparisonResult, Difference, Operand};
use crate::visited::{Pairing, PairingLedger};

/// Compare two values with the given options.
pub fn compare(value1: &Value, value2: &Value, options: &CompareOptions) -> ComparisonResult {
    Comparator::new(options.clone()).compare(value1, value2)
}

/// A reusable comparator bound to one set of options.
///
/// Each call to [`Comparator::compare`] starts from fresh traversal state.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    /// The options this comparator applies.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare two values. Never fails; inputs are not modified.
    pub fn compare(&self, value1: &Value, value2: &Value) -> ComparisonResult {
        let mut walk = Walk::new(&self.options);
        walk.run(value1, value2);

        debug!(
            found = walk.found,
            containers = walk.ledger.len(),
            strict = self.options.strict,
            "comparison finished"
        );

        ComparisonResult {
            equal: walk.found == 0,
            differences: walk.differences,
        }
    }
}

/// A unit of pending work.
struct Frame {
    /// Length of the parent's path.
    depth: usize,
    /// Step from the parent, `None` for the root.
    segment: Option<Segment>,
    step: Step,
}

enum Step {
    Pair(Value, Value),
    Missing { left: Operand, right: Operand },
}

/// Traversal state for a single comparison.
struct Walk<'a> {
    options: &'a CompareOptions,
    ledger: PairingLedger,
    path: Path,
    stack: Vec<Frame>,
    found: usize,
    differences: Vec<Difference>,
}

impl<'a> Walk<'a> {
    fn new(options: &'a CompareOptions) -> Self {
        Self {
            options,
            ledger: PairingLedger::default(),
            path: Path::root(),
            stack: Vec::new(),
            found: 0,
            differences: Vec::new(),
        }
    }

    fn run(&mut self, value1: &Value, value2: &Value) {
        self.stack.push(Frame {
            depth: 0,
            segment: None,
            step: Step::Pair(value1.clone(), value2.clone()),
        });

        while let Some(frame) = self.stack.pop() {
            self.path.truncate(frame.depth);
            let label = frame.segment.as_ref().map(Segment::label);
            if let Some(segment) = frame.segment {
                self.path.push(segment);
            }
            match frame.step {
                Step::Pair(a, b) => self.visit(&a, &b),
                Step::Missing { left, right } => {
                    let key = label.unwrap_or_default();
                    self.record(|path| Difference::missing_key(path, &key, left, right));
                }
            }
        }
    }

    fn visit(&mut self, a: &Value, b: &Value) {
        if !self.options.strict && loose_eq(a, b) {
            return;
        }

        if a.kind() != b.kind() {
            if a.is_container() && b.is_container() {
                self.record(|path| Difference::container_kind_mismatch(path, a, b));
            } else {
                self.record(|path| Difference::type_mismatch(path, a, b));
            }
            return;
        }

        if a.is_identical(b) {
            return;
        }

        if !a.is_container() {
            self.record(|path| Difference::value_mismatch(path, a, b));
            return;
        }

        match self.ledger.pair(a, b) {
            Pairing::Consistent => {}
            Pairing::Conflict => {
                self.record(|path| Difference::circular_mismatch(path, a, b));
            }
            Pairing::First => self.descend(a, b),
        }
    }

    /// Queue the union of both containers' keys.
    fn descend(&mut self, a: &Value, b: &Value) {
        let depth = self.path.len();
        let mut children = Vec::new();

        match (a, b) {
            (Value::List(left), Value::List(right)) => {
                let (left, right) = (left.borrow(), right.borrow());
                for index in 0..left.len().max(right.len()) {
                    let step = match (left.get(index), right.get(index)) {
                        (Some(x), Some(y)) => Step::Pair(x.clone(), y.clone()),
                        (x, y) => missing(x, y),
                    };
                    children.push(Frame {
                        depth,
                        segment: Some(Segment::Index(index)),
                        step,
                    });
                }
            }
            (Value::Record(left), Value::Record(right)) => {
                let (left, right) = (left.borrow(), right.borrow());
                let keys = left
                    .keys()
                    .chain(right.keys().filter(|k| !left.contains_key(*k)));
                for key in keys {
                    let step = match (left.get(key), right.get(key)) {
                        (Some(x), Some(y)) => Step::Pair(x.clone(), y.clone()),
                        (x, y) => missing(x, y),
                    };
                    children.push(Frame {
                        depth,
                        segment: Some(Segment::Key(key.clone())),
                        step,
                    });
                }
            }
            _ => unreachable!("descend is only called on containers of one kind"),
        }

        self.stack.extend(children.into_iter().rev());
    }

    /// Count a divergence; build and keep its record only when verbose.
    fn record(&mut self, build: impl FnOnce(String) -> Difference) {
        self.found += 1;
        if !self.options.verbose {
            return;
        }
        let difference = build(self.path.render(self.options.path_format));
        trace!(path = %difference.path, kind = ?difference.kind, "difference");
        self.differences.push(difference);
    }
}

fn missing(left: Option<&Value>, right: Option<&Value>) -> Step {
    let operand = |side: Option<&Value>| side.cloned().map_or(Operand::Missing, Operand::Present);
    Step::Missing {
        left: operand(left),
        right: operand(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PathFormat;
    use crate::result::DifferenceKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn verbose(a: serde_json::Value, b: serde_json::Value) -> ComparisonResult {
        compare(&v(a), &v(b), &CompareOptions::default())
    }

    #[test]
    fn identical_structures_are_equal() {
        let result = verbose(
            json!({"a": 1, "b": {"c": 2, "d": [3, 4]}}),
            json!({"a": 1, "b": {"c": 2, "d": [3, 4]}}),
        );
        assert!(result.equal);
        assert!(result.is_empty());
    }

    #[test]
    fn nested_value_mismatch() {
        let result = verbose(json!({"a": 1, "b": {"c": 2}}), json!({"a": 1, "b": {"c": 3}}));
        assert!(!result.equal);
        assert_eq!(
            result.differences,
            vec![Difference {
                path: r#"["b"]["c"]"#.into(),
                value1: Operand::Present(Value::from(2)),
                value2: Operand::Present(Value::from(3)),
                kind: DifferenceKind::ValueMismatch,
                message: "Values differ: 2 vs 3".into(),
            }]
        );
    }

    #[test]
    fn list_element_mismatch() {
        let result = verbose(json!({"a": [1, 2, 3]}), json!({"a": [1, 2, 4]}));
        assert_eq!(result.len(), 1);
        let d = &result.differences[0];
        assert_eq!(d.path, r#"["a"][2]"#);
        assert_eq!(d.value1, Operand::Present(Value::from(3)));
        assert_eq!(d.value2, Operand::Present(Value::from(4)));
        assert_eq!(d.message, "Values differ: 3 vs 4");
    }

    #[test]
    fn missing_key_on_right() {
        let result = verbose(json!({"a": 1, "b": 2}), json!({"a": 1}));
        assert_eq!(result.len(), 1);
        let d = &result.differences[0];
        assert_eq!(d.path, r#"["b"]"#);
        assert_eq!(d.value1, Operand::Present(Value::from(2)));
        assert_eq!(d.value2, Operand::Missing);
        assert_eq!(d.kind, DifferenceKind::MissingKey);
        assert_eq!(d.message, r#"Key "b" is missing in one of the objects"#);
    }

    #[test]
    fn missing_key_with_container_value() {
        let result = verbose(json!({"a": 1, "b": {"c": 2}}), json!({"a": 1}));
        let d = result.at_path(r#"["b"]"#).unwrap();
        assert_eq!(d.value1, Operand::Present(v(json!({"c": 2}))));
        assert!(d.value2.is_missing());
    }

    #[test]
    fn missing_keys_do_not_stop_sibling_comparison() {
        let left = json!({"a": [{
            "name": "Adeel Solangi",
            "language": "Sindhi",
            "version": 6.1
        }]});
        let right = json!({"a": [{
            "name": "Adeel Solangie",
            "ide": "143",
            "language": "Sindhi",
            "version": 6.1
        }]});
        let result = verbose(left, right);
        assert!(!result.equal);
        assert_eq!(result.len(), 2);

        let renamed = result.at_path(r#"["a"][0]["name"]"#).unwrap();
        assert_eq!(renamed.message, "Values differ: Adeel Solangi vs Adeel Solangie");

        let added = result.at_path(r#"["a"][0]["ide"]"#).unwrap();
        assert_eq!(added.value1, Operand::Missing);
        assert_eq!(added.value2, Operand::Present(Value::from("143")));
        assert_eq!(added.message, r#"Key "ide" is missing in one of the objects"#);
    }

    #[test]
    fn side_one_keys_come_first() {
        let result = verbose(json!({"b": 1, "d": 1}), json!({"a": 2, "c": 2, "d": 2}));
        let paths: Vec<&str> = result.differences.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, [r#"["b"]"#, r#"["d"]"#, r#"["a"]"#, r#"["c"]"#]);
    }

    #[test]
    fn missing_key_is_reported_between_siblings() {
        let result = verbose(
            json!({"a": {"x": 1}, "b": 1, "c": {"y": 1}}),
            json!({"a": {"x": 2}, "c": {"y": 2}}),
        );
        let paths: Vec<&str> = result.differences.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, [r#"["a"]["x"]"#, r#"["b"]"#, r#"["c"]["y"]"#]);
    }

    #[test]
    fn shorter_list_reports_missing_indices() {
        let result = verbose(json!([1]), json!([1, 2, 3]));
        assert_eq!(result.count(DifferenceKind::MissingKey), 2);
        let d = result.at_path("[2]").unwrap();
        assert_eq!(d.message, r#"Key "2" is missing in one of the objects"#);
        assert_eq!(d.value2, Operand::Present(Value::from(3)));
    }

    #[test]
    fn type_mismatch_stops_descent() {
        let result = verbose(json!({"a": 1, "b": "hello"}), json!({"a": 1, "b": 123}));
        assert_eq!(result.len(), 1);
        let d = &result.differences[0];
        assert_eq!(d.path, r#"["b"]"#);
        assert_eq!(d.kind, DifferenceKind::TypeMismatch);
        assert_eq!(d.message, "Types differ: string vs number");
    }

    #[test]
    fn null_against_record_is_a_type_mismatch() {
        let result = verbose(json!({"a": null}), json!({"a": {"b": 1}}));
        assert_eq!(result.differences[0].message, "Types differ: null vs object");
    }

    #[test]
    fn list_against_record_is_a_container_kind_mismatch() {
        let result = verbose(json!({"a": [1]}), json!({"a": {"0": 1}}));
        assert_eq!(result.len(), 1);
        let d = &result.differences[0];
        assert_eq!(d.kind, DifferenceKind::ContainerKindMismatch);
        assert_eq!(d.message, "Container kinds differ: array vs object");
    }

    #[test]
    fn root_scalars() {
        let result = verbose(json!(1), json!(2));
        assert_eq!(result.differences[0].path, "");
        assert!(verbose(json!("x"), json!("x")).equal);
    }

    #[test]
    fn deeply_nested_difference() {
        let result = verbose(
            json!({"a": {"b": {"c": {"d": {"e": 5}}}}}),
            json!({"a": {"b": {"c": {"d": {"e": 10}}}}}),
        );
        let d = &result.differences[0];
        assert_eq!(d.path, r#"["a"]["b"]["c"]["d"]["e"]"#);
        assert_eq!(d.message, "Values differ: 5 vs 10");
    }

    #[test]
    fn dot_paths() {
        let opts = CompareOptions::default().with_path_format(PathFormat::Dot);
        let result = compare(&v(json!({"a": {"b": 1}})), &v(json!({"a": {"b": 2}})), &opts);
        assert_eq!(result.differences[0].path, "a.b");

        let result = compare(
            &v(json!({"a": [{"name": 1}]})),
            &v(json!({"a": [{"name": 2}]})),
            &opts,
        );
        assert_eq!(result.differences[0].path, "a.0.name");

        let structured = verbose(json!({"a": {"b": 1}}), json!({"a": {"b": 2}}));
        assert_eq!(structured.differences[0].path, r#"["a"]["b"]"#);
    }

    #[test]
    fn strict_and_loose() {
        let a = v(json!({"a": 1, "b": "2"}));
        let b = v(json!({"a": 1, "b": 2}));
        assert!(!compare(&a, &b, &CompareOptions::default()).equal);
        assert!(compare(&a, &b, &CompareOptions::loose()).equal);
    }

    #[test]
    fn loose_mode_still_reports_real_differences() {
        let result = compare(
            &v(json!({"a": "1", "b": [true], "c": "x"})),
            &v(json!({"a": 1, "b": [1], "c": 0})),
            &CompareOptions::loose(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.differences[0].path, r#"["c"]"#);
        assert_eq!(result.differences[0].kind, DifferenceKind::TypeMismatch);
    }

    #[test]
    fn loose_short_circuit_applies_to_containers_against_scalars() {
        let result = compare(&v(json!([1, 2])), &v(json!("1,2")), &CompareOptions::loose());
        assert!(result.equal);
        let strict = compare(&v(json!([1, 2])), &v(json!("1,2")), &CompareOptions::default());
        assert_eq!(strict.differences[0].message, "Types differ: array vs string");
    }

    #[test]
    fn quiet_mode_keeps_equality_but_drops_records() {
        let result = compare(&v(json!({"a": 1})), &v(json!({"a": 2})), &CompareOptions::quiet());
        assert!(!result.equal);
        assert!(result.differences.is_empty());
    }

    #[test]
    fn nan_is_a_value_mismatch() {
        let result = compare(
            &Value::Number(f64::NAN),
            &Value::Number(f64::NAN),
            &CompareOptions::default(),
        );
        assert_eq!(result.differences[0].message, "Values differ: NaN vs NaN");
    }

    #[test]
    fn self_referential_equal_structures() {
        let a = Value::record([("a", Value::from(1))]);
        a.insert("self", a.clone()).unwrap();
        let b = Value::record([("a", Value::from(1))]);
        b.insert("self", b.clone()).unwrap();

        let result = compare(&a, &b, &CompareOptions::default());
        assert!(result.equal);
        assert!(result.is_empty());

        assert!(compare(&a, &a, &CompareOptions::default()).equal);
    }

    #[test]
    fn mutually_cyclic_lists_are_equal() {
        let a = Value::list([Value::from("x")]);
        let a2 = Value::list([Value::from("y"), a.clone()]);
        a.push(a2).unwrap();
        let b = Value::list([Value::from("x")]);
        let b2 = Value::list([Value::from("y"), b.clone()]);
        b.push(b2).unwrap();

        assert!(compare(&a, &b, &CompareOptions::default()).equal);
    }

    #[test]
    fn inconsistent_cycle_is_reported() {
        // a.self closes on a; b.self points to a copy of b that closes on b.
        let a = Value::record([("x", Value::from(1))]);
        a.insert("self", a.clone()).unwrap();
        let b = Value::record([("x", Value::from(1))]);
        let copy = Value::record([("x", Value::from(1)), ("self", b.clone())]);
        b.insert("self", copy).unwrap();

        let result = compare(&a, &b, &CompareOptions::default());
        assert!(!result.equal);
        let d = result.at_path(r#"["self"]"#).unwrap();
        assert_eq!(d.kind, DifferenceKind::CircularReferenceMismatch);
        assert_eq!(d.message, "Circular reference mismatch detected");
    }

    #[test]
    fn cycle_against_different_shape() {
        let a = Value::record([("x", Value::from(1))]);
        a.insert("self", a.clone()).unwrap();
        let b = Value::record([("x", Value::from(1)), ("self", v(json!({"x": 2})))]);

        let result = compare(&a, &b, &CompareOptions::default());
        assert!(!result.equal);
        assert_eq!(result.count(DifferenceKind::CircularReferenceMismatch), 1);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        const DEPTH: usize = 100_000;
        let mut left = Value::from(1);
        let mut right = Value::from(2);
        for _ in 0..DEPTH {
            left = Value::list([left]);
            right = Value::list([right]);
        }

        let result = compare(&left, &right, &CompareOptions::quiet());
        assert!(!result.equal);
    }

    #[test]
    fn deep_nesting_against_a_scalar_in_loose_mode() {
        let mut left = Value::from(1);
        for _ in 0..100_000 {
            left = Value::list([left]);
        }

        // The nested list coerces to its leaf's text, "1".
        assert!(compare(&left, &Value::from(1), &CompareOptions::loose()).equal);

        let result = compare(&left, &Value::from(2), &CompareOptions::loose());
        assert!(!result.equal);
        assert_eq!(result.differences[0].message, "Types differ: array vs number");
    }

    #[test]
    fn comparator_is_reusable() {
        let comparator = Comparator::new(CompareOptions::quiet());
        let a = v(json!({"k": [1]}));
        assert!(comparator.compare(&a, &v(json!({"k": [1]}))).equal);
        assert!(!comparator.compare(&a, &v(json!({"k": [2]}))).equal);
        assert!(!comparator.options().verbose);
    }

    #[test]
    fn inputs_are_not_modified() {
        let a = v(json!({"a": [1, {"b": 2}]}));
        let b = v(json!({"a": [1, {"c": 2}], "d": 3}));
        let before = (a.to_json_lossy(), b.to_json_lossy());
        compare(&a, &b, &CompareOptions::default());
        assert_eq!((a.to_json_lossy(), b.to_json_lossy()), before);
    }

    fn json_value() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            (-50_i64..50).prop_map(serde_json::Value::from),
            "[a-c]{0,2}".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn reflexive_on_structural_copies(doc in json_value()) {
            let result = compare(&v(doc.clone()), &v(doc), &CompareOptions::default());
            prop_assert!(result.equal);
            prop_assert!(result.differences.is_empty());
        }

        #[test]
        fn verbose_flag_only_gates_records(a in json_value(), b in json_value()) {
            let (a, b) = (v(a), v(b));
            let loud = compare(&a, &b, &CompareOptions::default());
            let quiet = compare(&a, &b, &CompareOptions::quiet());
            prop_assert_eq!(loud.equal, quiet.equal);
            prop_assert!(quiet.differences.is_empty());
            prop_assert_eq!(loud.equal, loud.differences.is_empty());
        }

        #[test]
        fn equality_matches_json_equality(a in json_value(), b in json_value()) {
            let result = compare(&v(a.clone()), &v(b.clone()), &CompareOptions::default());
            prop_assert_eq!(result.equal, a == b);
        }
    }
}
