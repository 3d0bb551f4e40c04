//! # Gate algebra over multi-valued state variables
//!
//! The [`Algebra`] manager owns the declared variables and the scoped [`GateCache`]. All
//! expressions are built and simplified through it, the same way a BDD manager owns its
//! nodes: handles ([`GateRef`]) are cheap to copy, structurally equal gates share one
//! handle, and every operation takes `&self`.
//!
//! ## Inputs
//!
//! An elementary input asserts that a variable is in one state:
//!
//! - a boolean variable `f` has a single wire, `f` means state `1` and `!f` state `0`;
//! - a simple variable `s` has one wire per state, `s(b)` means "in state `b`" and `!s(b)`
//!   means "in any state but `b`".
//!
//! Inverting `s(b)` therefore yields the disjunction of the remaining states, not a
//! negation symbol.
//!
//! ## Canonical form
//!
//! [`simplify`][Algebra::simplify] brings every gate into a canonical *sum of products*:
//!
//! - a product is an AND of inputs sorted by variable, with at most one factor per variable;
//! - a sum is an OR of products sorted by their *signature*, where no product implies
//!   another and no two products can be merged.
//!
//! AND over sums is distributed, then the resulting sum is minimized by two rules applied
//! to a fixpoint:
//!
//! ```text
//! absorption/merge:  P + P·Q => P       A·x + A·y => A·(x ∪ y)      x + x'·R => x + (x ∪ x')·R
//! common factor:     x·A + x·B + C => x·(A + B)' + C     (inner sum minimized recursively)
//! ```
//!
//! The common factor is multiplied back into the minimized inner terms, so simplified gates
//! always stay flat.
//!
//! ## Rendering
//!
//! [`display`][Algebra::display] renders canonical strings: `AB + !X!Z + s(b)`, `0`, `1`.
//! Products are juxtaposed, sums joined by ` + `, and a sum nested in a product is
//! parenthesized.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use log::debug;

use crate::bitset::StateSet;
use crate::cache::GateCache;
use crate::gate::{Gate, GateKind, Input, Wire};
use crate::product::{Factor, Group, Product};
use crate::reference::GateRef;
use crate::types::{LabelId, VarId};
use crate::variable::{StateType, Variable};

/// Manager of variables and gates.
pub struct Algebra {
    variables: RefCell<Vec<Variable>>,
    next_address: Cell<u32>,
    cache: RefCell<GateCache>,
    /// The constant `0`.
    pub zero: GateRef,
    /// The constant `1`.
    pub one: GateRef,
}

impl Default for Algebra {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Algebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("Algebra")
            .field("variables", &self.variables.borrow().len())
            .field("gates", &cache.len())
            .field("scopes", &cache.depth())
            .finish()
    }
}

impl Algebra {
    pub fn new() -> Self {
        let mut cache = GateCache::new();
        let zero = cache.intern(Gate::Fixed(false));
        let one = cache.intern(Gate::Fixed(true));
        Self {
            variables: RefCell::new(Vec::new()),
            next_address: Cell::new(0),
            cache: RefCell::new(cache),
            zero,
            one,
        }
    }

    // ------------------------------------------------------------------------
    // Variables

    /// Declares a new variable. Its address follows the wires of all previous variables.
    pub fn add_variable(&self, name: impl Into<String>, ty: StateType) -> VarId {
        let mut variables = self.variables.borrow_mut();
        let index = VarId::new(variables.len() as u32);
        let address = self.next_address.get();
        self.next_address.set(address + ty.width());
        let var = Variable {
            name: name.into(),
            ty,
            index,
            address,
        };
        debug!("add_variable({}: {}) at address {}", var.name, var.ty, address);
        variables.push(var);
        index
    }

    /// Returns a copy of the variable.
    pub fn variable(&self, v: VarId) -> Variable {
        self.variables.borrow()[v.index()].clone()
    }

    pub fn num_vars(&self) -> usize {
        self.variables.borrow().len()
    }

    fn is_boolean(&self, v: VarId) -> bool {
        self.variables.borrow()[v.index()].is_boolean()
    }

    fn cardinality(&self, v: VarId) -> usize {
        self.variables.borrow()[v.index()].cardinality()
    }

    // ------------------------------------------------------------------------
    // Cache access

    /// Returns a copy of the gate behind `r`.
    pub fn node(&self, r: GateRef) -> Gate {
        self.cache.borrow().gate(r).clone()
    }

    pub fn kind(&self, r: GateRef) -> GateKind {
        self.cache.borrow().gate(r).kind()
    }

    pub fn is_zero(&self, r: GateRef) -> bool {
        r == self.zero
    }

    pub fn is_one(&self, r: GateRef) -> bool {
        r == self.one
    }

    pub fn is_fixed(&self, r: GateRef) -> bool {
        self.is_zero(r) || self.is_one(r)
    }

    pub fn constant(&self, value: bool) -> GateRef {
        if value {
            self.one
        } else {
            self.zero
        }
    }

    /// Number of live gates in all scopes.
    pub fn size(&self) -> usize {
        self.cache.borrow().len()
    }

    fn intern(&self, gate: Gate) -> GateRef {
        self.cache.borrow_mut().intern(gate)
    }

    /// Opens a cache scope that is closed when the guard drops.
    ///
    /// Gates created inside the scope become invalid once it closes.
    pub fn scope(&self) -> CacheScope<'_> {
        let depth = self.cache.borrow_mut().push();
        CacheScope { algebra: self, depth }
    }

    // ------------------------------------------------------------------------
    // Inputs

    pub fn mk_input(&self, input: Input) -> GateRef {
        self.intern(Gate::Input(input))
    }

    /// Elementary condition "`v` is in `state`".
    ///
    /// # Panics
    ///
    /// Panics if `state` is not a state of the variable.
    pub fn state(&self, v: VarId, state: usize) -> GateRef {
        let n = self.cardinality(v);
        assert!(state < n, "state {} out of range for variable {} with {} states", state, v, n);
        let input = if self.is_boolean(v) {
            Input::new(Wire::State { var: v, state: 0 }, state == 0)
        } else {
            Input::new(
                Wire::State {
                    var: v,
                    state: state as u32,
                },
                false,
            )
        };
        self.mk_input(input)
    }

    /// Condition "`v` is in any of `states`".
    pub fn states(&self, v: VarId, states: &[usize]) -> GateRef {
        self.or_many(states.iter().map(|&s| self.state(v, s)))
    }

    /// The input gate standing for a code label.
    pub fn label(&self, label: LabelId) -> GateRef {
        self.mk_input(Input::label(label))
    }

    /// Returns the label if `r` is a plain label input.
    pub fn as_label(&self, r: GateRef) -> Option<LabelId> {
        self.cache.borrow().gate(r).as_input().and_then(|i| i.as_label())
    }

    // ------------------------------------------------------------------------
    // Composition

    /// Orders operands so that the left one has the higher kind.
    fn exchange(&self, a: GateRef, b: GateRef) -> (GateRef, GateRef) {
        if self.kind(a) < self.kind(b) {
            (b, a)
        } else {
            (a, b)
        }
    }

    pub fn and(&self, a: GateRef, b: GateRef) -> GateRef {
        debug!("and(a = {}, b = {})", a, b);
        let (a, b) = self.exchange(a, b);

        // and(F,0) => 0
        // and(F,1) => F
        if self.is_zero(b) || self.is_zero(a) {
            debug!("and(F,0) => 0");
            return self.zero;
        }
        if self.is_one(b) {
            debug!("and(F,1) => F");
            return self.simplify(a);
        }
        if a == b {
            debug!("and(F,F) => F");
            return self.simplify(a);
        }

        let mut children = Vec::new();
        for r in [a, b] {
            match self.node(r) {
                Gate::And(inner) => children.extend(inner.iter().copied()),
                _ => children.push(r),
            }
        }
        let raw = self.intern(Gate::logical(GateKind::And, children));
        self.simplify(raw)
    }

    pub fn or(&self, a: GateRef, b: GateRef) -> GateRef {
        debug!("or(a = {}, b = {})", a, b);
        let (a, b) = self.exchange(a, b);

        // or(F,1) => 1
        // or(F,0) => F
        if self.is_one(b) || self.is_one(a) {
            debug!("or(F,1) => 1");
            return self.one;
        }
        if self.is_zero(b) {
            debug!("or(F,0) => F");
            return self.simplify(a);
        }
        if a == b {
            debug!("or(F,F) => F");
            return self.simplify(a);
        }

        let mut children = Vec::new();
        for r in [a, b] {
            match self.node(r) {
                Gate::Or(inner) => children.extend(inner.iter().copied()),
                _ => children.push(r),
            }
        }
        let raw = self.intern(Gate::logical(GateKind::Or, children));
        self.simplify(raw)
    }

    pub fn and_many(&self, gates: impl IntoIterator<Item = GateRef>) -> GateRef {
        let mut res = self.one;
        for g in gates {
            res = self.and(res, g);
        }
        res
    }

    pub fn or_many(&self, gates: impl IntoIterator<Item = GateRef>) -> GateRef {
        let mut res = self.zero;
        for g in gates {
            res = self.or(res, g);
        }
        res
    }

    /// Builds a logical gate from already composed operands, then simplifies it.
    pub fn compose(&self, kind: GateKind, children: Vec<GateRef>) -> GateRef {
        match children.len() {
            0 => self.constant(kind == GateKind::And),
            1 => self.simplify(children[0]),
            _ => {
                let raw = self.intern(Gate::logical(kind, children));
                self.simplify(raw)
            }
        }
    }

    /// Negates a gate down to the input level.
    pub fn invert(&self, r: GateRef) -> GateRef {
        debug!("invert({})", r);
        let s = self.simplify(r);
        match self.node(s) {
            Gate::Fixed(value) => self.constant(!value),
            Gate::Input(input) => self.invert_input(input),
            Gate::And(children) => self.or_many(children.iter().map(|&c| self.invert(c))),
            Gate::Or(children) => self.and_many(children.iter().map(|&c| self.invert(c))),
        }
    }

    fn invert_input(&self, input: Input) -> GateRef {
        match input.wire {
            Wire::State { var, state } if !self.is_boolean(var) && !input.inverted => {
                // !s(k) as the sum of the other states
                let n = self.cardinality(var);
                let others: Vec<usize> = (0..n).filter(|&i| i != state as usize).collect();
                self.states(var, &others)
            }
            _ => self.mk_input(input.negate()),
        }
    }

    // ------------------------------------------------------------------------
    // Simplification

    /// Brings a gate into canonical sum-of-products form.
    ///
    /// Results are memoized in the current cache scope; simplified gates are fixpoints.
    pub fn simplify(&self, r: GateRef) -> GateRef {
        if let Some(s) = self.cache.borrow().simplified(r) {
            return s;
        }
        let result = match self.node(r) {
            Gate::Fixed(_) => r,
            Gate::Input(input) => self.simplify_input(r, input),
            Gate::And(children) => {
                debug!("simplify and {}", r);
                let mut terms = vec![Product::one()];
                for &c in children.iter() {
                    terms = self.multiply(&terms, &self.sop(c));
                    if terms.is_empty() {
                        break;
                    }
                }
                if terms.len() == 1 {
                    self.product_gate(&terms[0])
                } else {
                    let terms = self.minimize(terms);
                    self.sum_gate(&terms)
                }
            }
            Gate::Or(children) => {
                debug!("simplify or {}", r);
                let terms: Vec<Product> = children.iter().flat_map(|&c| self.sop(c)).collect();
                let terms = self.minimize(terms);
                self.sum_gate(&terms)
            }
        };
        self.cache.borrow_mut().set_simplified(r, result);
        result
    }

    fn simplify_input(&self, r: GateRef, input: Input) -> GateRef {
        match input.wire {
            // A simple variable with a single state is always in it.
            Wire::State { var, .. } if !self.is_boolean(var) && self.cardinality(var) == 1 => {
                self.constant(!input.inverted)
            }
            _ => r,
        }
    }

    /// Returns the sum-of-products view of a gate.
    ///
    /// `0` has no products, `1` is the single empty product.
    pub fn sop(&self, r: GateRef) -> Vec<Product> {
        let s = self.simplify(r);
        match self.node(s) {
            Gate::Fixed(false) => vec![],
            Gate::Fixed(true) => vec![Product::one()],
            Gate::Input(input) => vec![self.product_of(&[input])],
            Gate::And(children) => vec![self.product_of(&self.child_inputs(&children))],
            Gate::Or(children) => children
                .iter()
                .map(|&c| match self.node(c) {
                    Gate::Input(input) => self.product_of(&[input]),
                    Gate::And(inner) => self.product_of(&self.child_inputs(&inner)),
                    other => panic!("non-canonical sum term {:?}", other),
                })
                .collect(),
        }
    }

    fn child_inputs(&self, children: &[GateRef]) -> Vec<Input> {
        children
            .iter()
            .map(|&c| {
                self.node(c)
                    .as_input()
                    .unwrap_or_else(|| panic!("non-canonical product operand {}", c))
            })
            .collect()
    }

    /// Products of inputs of a canonical product never collapse to `0`.
    fn product_of(&self, inputs: &[Input]) -> Product {
        let mut p = Product::one();
        for &input in inputs {
            let merged = p.and_factor(self.input_factor(input));
            assert!(merged, "canonical product collapsed to 0");
        }
        p
    }

    fn multiply(&self, lhs: &[Product], rhs: &[Product]) -> Vec<Product> {
        let mut terms = Vec::with_capacity(lhs.len() * rhs.len());
        for p in lhs {
            for q in rhs {
                if let Some(pq) = p.and(q) {
                    terms.push(pq);
                }
            }
        }
        terms
    }

    /// Factor of a single input.
    pub fn input_factor(&self, input: Input) -> Factor {
        let polar_state = if input.inverted { 0 } else { 1 };
        match input.wire {
            Wire::Label(label) => Factor::new(Group::Label(label), StateSet::single(polar_state), 2, true),
            Wire::State { var, .. } if self.is_boolean(var) => {
                Factor::new(Group::Var(var), StateSet::single(polar_state), 2, true)
            }
            Wire::State { var, state } => {
                let n = self.cardinality(var);
                let single = StateSet::single(state as usize);
                let allowed = if input.inverted { single.complement(n) } else { single };
                Factor::new(Group::Var(var), allowed, n, false)
            }
        }
    }

    /// Inputs expressing a factor, in state order.
    pub fn factor_inputs(&self, factor: &Factor) -> Vec<Input> {
        assert!(!factor.is_empty(), "empty factor has no inputs");
        if factor.is_full() {
            return vec![];
        }
        match factor.group {
            Group::Label(label) => vec![Input::new(Wire::Label(label), !factor.allowed.contains(1))],
            Group::Var(var) if factor.polar => {
                vec![Input::new(Wire::State { var, state: 0 }, !factor.allowed.contains(1))]
            }
            Group::Var(var) => match factor.allowed.single_state() {
                Some(state) => vec![Input::new(
                    Wire::State {
                        var,
                        state: state as u32,
                    },
                    false,
                )],
                None => factor
                    .allowed
                    .complement(factor.width)
                    .iter()
                    .map(|state| {
                        Input::new(
                            Wire::State {
                                var,
                                state: state as u32,
                            },
                            true,
                        )
                    })
                    .collect(),
            },
        }
    }

    /// The canonical gate of a product.
    pub fn product_gate(&self, p: &Product) -> GateRef {
        let inputs: Vec<GateRef> = p
            .factors()
            .iter()
            .flat_map(|f| self.factor_inputs(f))
            .map(|i| self.mk_input(i))
            .collect();
        let r = match inputs.len() {
            0 => self.one,
            1 => inputs[0],
            _ => self.intern(Gate::logical(GateKind::And, inputs)),
        };
        self.cache.borrow_mut().set_simplified(r, r);
        r
    }

    /// The canonical gate of a minimized sum.
    fn sum_gate(&self, terms: &[Product]) -> GateRef {
        if terms.iter().any(|p| p.is_empty()) {
            return self.one;
        }
        let r = match terms.len() {
            0 => self.zero,
            1 => self.product_gate(&terms[0]),
            _ => {
                let children = terms.iter().map(|p| self.product_gate(p)).collect();
                self.intern(Gate::logical(GateKind::Or, children))
            }
        };
        self.cache.borrow_mut().set_simplified(r, r);
        r
    }

    /// Ordering key of a product: one character per wire address up to its last input,
    /// `+` for a plain input, `-` for an inverted one and `0` for an unused wire.
    pub fn signature(&self, p: &Product) -> String {
        let mut wires: Vec<(u32, bool)> = p
            .factors()
            .iter()
            .flat_map(|f| self.factor_inputs(f))
            .map(|i| (self.address(i), i.inverted))
            .collect();
        wires.sort();
        let mut s = String::new();
        for (address, inverted) in wires {
            while s.len() < address as usize {
                s.push('0');
            }
            s.push(if inverted { '-' } else { '+' });
        }
        s
    }

    /// Wire address of an input.
    pub fn address(&self, input: Input) -> u32 {
        match input.wire {
            Wire::Label(label) => label.index() as u32,
            Wire::State { var, state } => self.variables.borrow()[var.index()].address + state,
        }
    }

    /// Sorts products by signature and removes duplicates.
    fn normalize(&self, terms: Vec<Product>) -> Vec<Product> {
        let mut keyed: Vec<(String, Product)> = terms.into_iter().map(|p| (self.signature(&p), p)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.1 == b.1);
        keyed.into_iter().map(|(_, p)| p).collect()
    }

    /// Minimizes a sum of products. A result holding the empty product means `1`.
    pub fn minimize(&self, terms: Vec<Product>) -> Vec<Product> {
        if terms.iter().any(|p| p.is_empty()) {
            return vec![Product::one()];
        }
        let mut terms = self.extract_common_factor(self.normalize(terms));
        loop {
            if is_tautology(&terms) {
                return vec![Product::one()];
            }
            let (reduced, changed) = self.reduce(terms);
            terms = reduced;
            if !changed || is_tautology(&terms) {
                break;
            }
            terms = self.extract_common_factor(terms);
        }
        if is_tautology(&terms) {
            return vec![Product::one()];
        }
        self.normalize(terms)
    }

    /// Pairwise absorption, reduction and merging of products, to a fixpoint.
    ///
    /// Returns the new terms and whether anything changed.
    fn reduce(&self, terms: Vec<Product>) -> (Vec<Product>, bool) {
        let mut terms: Vec<Option<Product>> = terms.into_iter().map(Some).collect();
        let mut changed_any = false;
        loop {
            let mut changed = false;
            for i in 0..terms.len() {
                for j in 0..terms.len() {
                    if i == j {
                        continue;
                    }
                    let (Some(p), Some(q)) = (terms[i].clone(), terms[j].clone()) else {
                        continue;
                    };

                    // P·Q + Q => Q
                    if p.implies(&q) {
                        debug!("reduce: P·Q + Q => Q");
                        terms[i] = None;
                        changed = true;
                        continue;
                    }

                    // A·x + A·y => A·(x ∪ y)
                    if let Some(group) = p.single_difference(&q) {
                        debug!("reduce: A·x + A·y => A·(x ∪ y) on {}", group);
                        let (Some(pf), Some(qf)) = (p.get(group), q.get(group)) else {
                            continue;
                        };
                        let mut merged = p.clone();
                        merged.set_factor(pf.unite(qf));
                        if merged.is_empty() {
                            return (vec![Product::one()], true);
                        }
                        terms[i] = Some(merged);
                        terms[j] = None;
                        changed = true;
                        continue;
                    }

                    // x + x'·R => x + (x ∪ x')·R
                    if q.len() == 1 {
                        let qf = &q.factors()[0];
                        if let Some(pf) = p.get(qf.group) {
                            if !qf.implies(pf) {
                                debug!("reduce: x + x'·R => x + (x ∪ x')·R on {}", qf.group);
                                let mut widened = p.clone();
                                widened.set_factor(pf.unite(qf));
                                if widened.is_empty() {
                                    return (vec![Product::one()], true);
                                }
                                terms[i] = Some(widened);
                                changed = true;
                            }
                        }
                    }
                }
            }
            if !changed {
                break;
            }
            changed_any = true;
        }
        (terms.into_iter().flatten().collect(), changed_any)
    }

    /// Factors the most frequent factor out of the sum, minimizes the inner sum and
    /// multiplies the factor back in.
    fn extract_common_factor(&self, terms: Vec<Product>) -> Vec<Product> {
        let Some(pivot) = self.common_factor(&terms) else {
            return terms;
        };
        debug!("extract_common_factor: pivot on {}", pivot.group);

        let mut inner = Vec::new();
        let mut others = Vec::new();
        for p in terms {
            if p.get(pivot.group) == Some(&pivot) {
                let mut rest = p;
                rest.remove(pivot.group);
                inner.push(rest);
            } else {
                others.push(p);
            }
        }

        for mut p in self.minimize(inner) {
            if p.and_factor(pivot.clone()) {
                others.push(p);
            }
        }
        others
    }

    /// The factor shared by most products, at least two. Ties go to the lower group.
    fn common_factor(&self, terms: &[Product]) -> Option<Factor> {
        let mut counts: BTreeMap<(Group, Vec<usize>), (usize, &Factor)> = BTreeMap::new();
        for p in terms {
            for f in p.factors() {
                let key = (f.group, f.allowed.iter().collect());
                counts.entry(key).or_insert((0, f)).0 += 1;
            }
        }
        let mut best: Option<(usize, &Factor)> = None;
        for (_, &(count, f)) in &counts {
            if count >= 2 && best.map_or(true, |(c, _)| count > c) {
                best = Some((count, f));
            }
        }
        best.map(|(_, f)| f.clone())
    }

    // ------------------------------------------------------------------------
    // Traversal

    /// Replaces inputs bottom-up and simplifies the result.
    ///
    /// `f` returns the replacement of an input, or `None` to keep it.
    pub fn replace_inputs(&self, r: GateRef, f: &mut dyn FnMut(Input) -> Option<GateRef>) -> GateRef {
        let s = self.simplify(r);
        let replaced = self.replace_rec(s, f);
        self.simplify(replaced)
    }

    fn replace_rec(&self, r: GateRef, f: &mut dyn FnMut(Input) -> Option<GateRef>) -> GateRef {
        match self.node(r) {
            Gate::Fixed(_) => r,
            Gate::Input(input) => f(input).unwrap_or(r),
            Gate::And(children) | Gate::Or(children) => {
                let kind = self.kind(r);
                let replaced: Vec<GateRef> = children.iter().map(|&c| self.replace_rec(c, f)).collect();
                if replaced[..] == children[..] {
                    r
                } else {
                    self.compose(kind, replaced)
                }
            }
        }
    }

    /// Replaces every input of the given variables with `value`.
    pub fn project(&self, r: GateRef, vars: &dyn Fn(VarId) -> bool, value: bool) -> GateRef {
        let c = self.constant(value);
        self.replace_inputs(r, &mut |input| match input.var() {
            Some(v) if vars(v) => Some(c),
            _ => None,
        })
    }

    /// Distinct inputs of a gate, in traversal order.
    pub fn inputs(&self, r: GateRef) -> Vec<Input> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![r];
        while let Some(g) = stack.pop() {
            match self.node(g) {
                Gate::Fixed(_) => {}
                Gate::Input(input) => {
                    if seen.insert(input) {
                        result.push(input);
                    }
                }
                Gate::And(children) | Gate::Or(children) => stack.extend(children.iter().rev()),
            }
        }
        result
    }

    /// Variables referenced by a gate.
    pub fn variables(&self, r: GateRef) -> BTreeSet<VarId> {
        self.inputs(r).into_iter().filter_map(|i| i.var()).collect()
    }

    /// Every gate reachable from `r`, children before parents.
    pub fn descendants(&self, r: GateRef) -> Vec<GateRef> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        self.descendants_rec(r, &mut seen, &mut order);
        order
    }

    fn descendants_rec(&self, r: GateRef, seen: &mut HashSet<GateRef>, order: &mut Vec<GateRef>) {
        if !seen.insert(r) {
            return;
        }
        for &c in self.node(r).children() {
            self.descendants_rec(c, seen, order);
        }
        order.push(r);
    }

    // ------------------------------------------------------------------------
    // Rendering

    /// Canonical rendering of a gate.
    pub fn display(&self, r: GateRef) -> GateDisplay<'_> {
        GateDisplay { algebra: self, gate: r }
    }

    /// Renders a single input.
    pub fn input_name(&self, input: Input) -> String {
        let neg = if input.inverted { "!" } else { "" };
        match input.wire {
            Wire::Label(label) => format!("{}<{}>", neg, label),
            Wire::State { var, state } => {
                let v = &self.variables.borrow()[var.index()];
                if v.is_boolean() {
                    format!("{}{}", neg, v.name)
                } else {
                    format!("{}{}({})", neg, v.name, v.state_name(state as usize))
                }
            }
        }
    }

    fn write_gate(&self, r: GateRef, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gate = self.node(r);
        match &gate {
            Gate::Fixed(value) => write!(f, "{}", if *value { "1" } else { "0" }),
            Gate::Input(input) => write!(f, "{}", self.input_name(*input)),
            Gate::And(children) | Gate::Or(children) => {
                let kind = gate.kind();
                for (i, &c) in children.iter().enumerate() {
                    if i > 0 && kind == GateKind::Or {
                        write!(f, " + ")?;
                    }
                    if self.kind(c) > kind {
                        write!(f, "(")?;
                        self.write_gate(c, f)?;
                        write!(f, ")")?;
                    } else {
                        self.write_gate(c, f)?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn is_tautology(terms: &[Product]) -> bool {
    terms.iter().any(|p| p.is_empty())
}

/// Guard of a cache scope opened by [`Algebra::scope`].
pub struct CacheScope<'a> {
    algebra: &'a Algebra,
    depth: usize,
}

impl CacheScope<'_> {
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for CacheScope<'_> {
    fn drop(&mut self) {
        self.algebra.cache.borrow_mut().pop(self.depth);
    }
}

/// Displays a gate in canonical notation.
pub struct GateDisplay<'a> {
    algebra: &'a Algebra,
    gate: GateRef,
}

impl fmt::Display for GateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.algebra.write_gate(self.gate, f)
    }
}
