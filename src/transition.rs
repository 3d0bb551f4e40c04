//! State transitions and transition sets.
//!
//! A [`Transition`] moves one variable from any of its pre-states into one of its
//! post-states. A [`TransitionSet`] groups the transitions of a condition or trigger by
//! variable.

use std::collections::BTreeMap;
use std::fmt::Write;

use log::debug;

use crate::algebra::Algebra;
use crate::error::{CompileError, Result};
use crate::product::{Group, Product};
use crate::reference::GateRef;
use crate::types::VarId;

/// A single variable's pre-state-set ⇒ post-state-set pair.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transition {
    pub var: VarId,
    pub pre: Vec<usize>,
    pub post: Vec<usize>,
}

impl Transition {
    pub fn new(var: VarId, mut pre: Vec<usize>, mut post: Vec<usize>) -> Self {
        pre.sort_unstable();
        pre.dedup();
        post.sort_unstable();
        post.dedup();
        Self { var, pre, post }
    }

    /// The unique post-state of a qualified transition.
    pub fn single_post_state(&self) -> Result<usize> {
        match self.post[..] {
            [state] => Ok(state),
            _ => Err(CompileError::ambiguous_post(format!(
                "ambiguous post conditions in state transition [v{} => {:?}].",
                self.var.index(),
                self.post
            ))),
        }
    }

    /// Condition "the variable is in one of the pre-states".
    pub fn pre_condition(&self, alg: &Algebra) -> GateRef {
        alg.states(self.var, &self.pre)
    }

    /// Condition "the variable is in one of the post-states".
    pub fn post_condition(&self, alg: &Algebra) -> GateRef {
        alg.states(self.var, &self.post)
    }

    /// True if every pre- and post-state of `self` is covered by `other`.
    pub fn is_subset_of(&self, other: &Transition) -> bool {
        self.var == other.var
            && self.pre.iter().all(|s| other.pre.contains(s))
            && self.post.iter().all(|s| other.post.contains(s))
    }

    /// Renders the transition as `s(a => b)`.
    pub fn describe(&self, alg: &Algebra) -> String {
        let v = alg.variable(self.var);
        let names = |states: &[usize]| states.iter().map(|&s| v.state_name(s)).collect::<Vec<_>>().join(",");
        format!("{}({} => {})", v.name, names(&self.pre), names(&self.post))
    }
}

/// Transitions grouped by variable.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransitionSet {
    map: BTreeMap<VarId, Vec<Transition>>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transition unless an existing one already covers it.
    pub fn add(&mut self, t: Transition) {
        let list = self.map.entry(t.var).or_default();
        if !list.iter().any(|e| t.is_subset_of(e)) {
            list.push(t);
        }
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = Transition>) {
        for t in iter {
            self.add(t);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn contains(&self, v: VarId) -> bool {
        self.map.contains_key(&v)
    }

    /// Transitions of one variable.
    pub fn get(&self, v: VarId) -> &[Transition] {
        self.map.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Modified variables, in index order.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.map.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.map.values().flatten()
    }

    /// True if both sets modify a common variable.
    pub fn intersects(&self, other: &TransitionSet) -> bool {
        self.variables().any(|v| other.contains(v))
    }

    /// Checks that every variable has exactly one transition with a single post-state.
    pub fn qualify_for_trigger(&self, alg: &Algebra) -> Result<()> {
        for (v, list) in &self.map {
            if list.len() > 1 {
                let all = list.iter().map(|t| t.describe(alg)).collect::<Vec<_>>().join(", ");
                return Err(CompileError::ambiguous_post(format!(
                    "ambiguous post conditions in state transition [{}].",
                    all
                )));
            }
            for t in list {
                if t.post.len() != 1 {
                    return Err(CompileError::ambiguous_post(format!(
                        "ambiguous post conditions in state transition [{}].",
                        t.describe(alg)
                    )));
                }
            }
            debug!("qualified transition on {}", v);
        }
        Ok(())
    }

    /// Narrows the pre-states to what a product term allows.
    ///
    /// Transitions whose pre-states do not meet the product are dropped. A variable the
    /// product does not mention keeps its transitions only if they leave every state.
    pub fn restrict_to(&self, alg: &Algebra, product: &Product) -> TransitionSet {
        let mut result = TransitionSet::new();
        for t in self.iter() {
            match product.get(Group::Var(t.var)) {
                None => {
                    if t.pre.len() == alg.variable(t.var).cardinality() {
                        result.add(t.clone());
                    }
                }
                Some(factor) => {
                    let pre: Vec<usize> = t.pre.iter().copied().filter(|&s| factor.allowed.contains(s)).collect();
                    if !pre.is_empty() {
                        result.add(Transition::new(t.var, pre, t.post.clone()));
                    }
                }
            }
        }
        result
    }

    /// Returns the transitions realizing an edge condition.
    ///
    /// Every factor of the entry product must be met by the pre-states of the variable's
    /// transition; otherwise the edge cannot be taken and nothing is returned.
    pub fn match_edge(&self, alg: &Algebra, genter: GateRef, gleave: GateRef) -> Vec<Transition> {
        debug!(
            "match_edge(genter = {}, gleave = {})",
            alg.display(genter),
            alg.display(gleave)
        );
        let mut result = Vec::new();
        for product in alg.sop(genter) {
            for factor in product.factors() {
                let Group::Var(v) = factor.group else {
                    return vec![];
                };
                let Some(t) = self.get(v).first() else {
                    return vec![];
                };
                if !t.pre.iter().any(|&s| factor.allowed.contains(s)) {
                    return vec![];
                }
                if !result.contains(t) {
                    result.push(t.clone());
                }
            }
        }
        result
    }

    /// Condition under which variable `v` reaches state `post`, expressed on the pre-state.
    ///
    /// Returns `0` if the set does not modify `v`, and the plain post-state condition if
    /// no transition leads into `post`.
    pub fn infer_post_state(&self, alg: &Algebra, v: VarId, post: usize) -> GateRef {
        if !self.contains(v) {
            return alg.zero;
        }
        let pre: Vec<usize> = self
            .get(v)
            .iter()
            .filter(|t| t.post.contains(&post))
            .flat_map(|t| t.pre.iter().copied())
            .collect();
        if pre.is_empty() {
            alg.state(v, post)
        } else {
            alg.states(v, &pre)
        }
    }

    pub fn describe(&self, alg: &Algebra) -> String {
        let mut s = String::new();
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            let _ = write!(s, "{}", t.describe(alg));
        }
        s
    }
}

impl FromIterator<Transition> for TransitionSet {
    fn from_iter<T: IntoIterator<Item = Transition>>(iter: T) -> Self {
        let mut set = TransitionSet::new();
        set.extend(iter);
        set
    }
}
