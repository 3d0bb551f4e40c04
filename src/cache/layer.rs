//! One scope of the gate cache.
//!
//! A layer owns the interning table for the gates created while it was the top of the
//! scope stack, plus the simplification memo for those gates. Lookups that miss here are
//! delegated to the layer below by [`GateCache`][super::GateCache].

use std::collections::HashMap;

use crate::gate::Gate;
use crate::reference::GateRef;

/// Interning table and simplification memo of one cache scope.
#[derive(Debug, Default)]
pub struct Layer {
    /// Arena length when the scope was opened.
    base: usize,
    table: HashMap<Gate, GateRef>,
    simplified: HashMap<GateRef, GateRef>,
    hits: usize,
    misses: usize,
}

impl Layer {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    /// Arena length when the scope was opened.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Returns the number of gates interned in this layer.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of lookups answered by this layer.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of lookups this layer could not answer.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn lookup(&mut self, gate: &Gate) -> Option<GateRef> {
        match self.table.get(gate) {
            Some(&r) => {
                self.hits += 1;
                Some(r)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn intern(&mut self, gate: Gate, r: GateRef) {
        self.table.insert(gate, r);
    }

    pub fn simplified(&self, r: GateRef) -> Option<GateRef> {
        self.simplified.get(&r).copied()
    }

    pub fn set_simplified(&mut self, r: GateRef, result: GateRef) {
        self.simplified.insert(r, result);
    }
}
