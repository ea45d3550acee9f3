//! Identity pairing of containers for cycle-safe traversal.

use std::collections::HashMap;

use deepcmp_types::{Identity, Value};

/// What the ledger knew about a side-1 container before this visit.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Pairing {
    /// Not seen before; now paired with the given side-2 value.
    First,
    /// Seen before, paired with this same side-2 value.
    Consistent,
    /// Seen before, paired with a different side-2 value.
    Conflict,
}

/// Map from side-1 container identity to the side-2 value it was first
/// paired with. Holding the side-2 handle keeps its identity valid.
#[derive(Default)]
pub(crate) struct PairingLedger {
    pairs: HashMap<Identity, Value>,
}

impl PairingLedger {
    /// Look up `left` and register `left -> right` if it is new.
    ///
    /// Scalars are never registered and always report [`Pairing::First`].
    pub(crate) fn pair(&mut self, left: &Value, right: &Value) -> Pairing {
        let Some(id) = left.identity() else {
            return Pairing::First;
        };
        match self.pairs.get(&id) {
            Some(partner) if partner.is_identical(right) => Pairing::Consistent,
            Some(_) => Pairing::Conflict,
            None => {
                self.pairs.insert(id, right.clone());
                Pairing::First
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }
}
