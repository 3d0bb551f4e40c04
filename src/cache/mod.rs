//! Scoped structural cache for gates.
//!
//! Every gate the [`Algebra`][crate::algebra::Algebra] creates is interned here: structurally
//! equal gates get the same [`GateRef`], so handle equality *is* structural equality and
//! handles can key other tables (code labels, memo tables).
//!
//! # Scopes
//!
//! The cache is a stack of [`Layer`]s over one arena:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`push`][GateCache::push] | opens a new layer; new gates are interned there |
//! | lookup | walks the layers from top to bottom |
//! | [`pop`][GateCache::pop] | drops the top layer and truncates the arena to its base |
//!
//! Gates of a layer are visible to the layers above it but never modified by them.
//! After a pop, all handles created in the popped scope are dangling; the code generator
//! opens one scope per event so per-event label gates never leak into the next event.
//!
//! The root layer is never popped.

mod layer;

pub use layer::Layer;

use crate::gate::Gate;
use crate::reference::GateRef;

/// Arena of interned gates with a stack of scopes.
#[derive(Debug)]
pub struct GateCache {
    gates: Vec<Gate>,
    layers: Vec<Layer>,
}

impl Default for GateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GateCache {
    pub fn new() -> Self {
        Self {
            gates: Vec::new(),
            layers: vec![Layer::new(0)],
        }
    }

    /// Returns the number of live gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Current scope depth; the root scope has depth 1.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the gate behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a popped scope.
    pub fn gate(&self, r: GateRef) -> &Gate {
        assert!(r.index() < self.gates.len(), "gate {} belongs to a popped scope", r);
        &self.gates[r.index()]
    }

    /// Interns a gate, returning the existing handle for a structurally equal gate.
    pub fn intern(&mut self, gate: Gate) -> GateRef {
        for layer in self.layers.iter_mut().rev() {
            if let Some(r) = layer.lookup(&gate) {
                return r;
            }
        }
        let r = GateRef::new(self.gates.len() as u32);
        self.gates.push(gate.clone());
        self.top_mut().intern(gate, r);
        r
    }

    /// Returns the memoized simplification of `r`, if any scope knows it.
    pub fn simplified(&self, r: GateRef) -> Option<GateRef> {
        self.layers.iter().rev().find_map(|layer| layer.simplified(r))
    }

    /// Records `result` as the simplification of `r`. The result is a fixpoint itself.
    pub fn set_simplified(&mut self, r: GateRef, result: GateRef) {
        let top = self.top_mut();
        top.set_simplified(r, result);
        top.set_simplified(result, result);
    }

    /// Opens a new scope and returns its depth.
    pub fn push(&mut self) -> usize {
        self.layers.push(Layer::new(self.gates.len()));
        log::debug!("cache: push scope {} at {} gates", self.layers.len(), self.gates.len());
        self.layers.len()
    }

    /// Closes the scope opened by the matching [`push`][GateCache::push].
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not the current top scope or is the root scope.
    pub fn pop(&mut self, depth: usize) {
        assert!(depth > 1, "the root cache scope cannot be popped");
        assert_eq!(depth, self.layers.len(), "cache scopes must be popped in stack order");
        if let Some(layer) = self.layers.pop() {
            log::debug!(
                "cache: pop scope {} ({} gates, {} hits, {} misses)",
                depth,
                self.gates.len() - layer.base(),
                layer.hits(),
                layer.misses()
            );
            self.gates.truncate(layer.base());
        }
    }

    fn top_mut(&mut self) -> &mut Layer {
        let n = self.layers.len();
        &mut self.layers[n - 1]
    }
}
