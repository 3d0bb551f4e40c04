//! Conditions: the front end's view of state predicates.
//!
//! A [`Condition`] is a tree of state tests, transitions and boolean connectives. It is
//! turned into gates by [`decompose`][Condition::decompose] in one of three modes:
//!
//! | Mode | A transition `s(a => b)` yields |
//! |------|---------------------------------|
//! | [`Mode::Pre`] | `s(a)` |
//! | [`Mode::Post`] | `s(b)` |
//! | [`Mode::Static`] | an error, static predicates cannot contain transitions |

use std::fmt;

use log::debug;

use crate::algebra::Algebra;
use crate::error::{CompileError, ErrorCode, Result};
use crate::gate::GateKind;
use crate::product::{Factor, Group, Product};
use crate::reference::GateRef;
use crate::transition::{Transition, TransitionSet};
use crate::types::VarId;

/// Decomposition mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    /// The state before a transition.
    Pre,
    /// The state after a transition.
    Post,
    /// A predicate on a single state.
    Static,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pre => write!(f, "pre"),
            Mode::Post => write!(f, "post"),
            Mode::Static => write!(f, "static"),
        }
    }
}

/// A state test or a per-variable transition.
///
/// An empty side with its wildcard flag set stands for all states not named on the
/// other side, so `s(* => b)` leaves any state but `b` and `s(a => *)` enters any state
/// but `a`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StateCondition {
    pub var: VarId,
    pub pre: Vec<usize>,
    pub post: Vec<usize>,
    pub pre_wildcard: bool,
    pub post_wildcard: bool,
}

impl StateCondition {
    /// `var` is in one of `states`.
    pub fn new(var: VarId, states: Vec<usize>) -> Self {
        Self {
            var,
            pre: states,
            post: vec![],
            pre_wildcard: false,
            post_wildcard: false,
        }
    }

    /// `var` moves from one of `pre` into one of `post`.
    pub fn transition(var: VarId, pre: Vec<usize>, post: Vec<usize>) -> Self {
        Self {
            var,
            pre,
            post,
            pre_wildcard: false,
            post_wildcard: false,
        }
    }

    pub fn is_transition(&self) -> bool {
        !self.post.is_empty() || self.post_wildcard
    }

    /// Resolves wildcards into explicit pre- and post-state lists.
    pub fn freeze(&self, alg: &Algebra) -> Result<(Vec<usize>, Vec<usize>)> {
        let ty = alg.variable(self.var).ty;
        let mut pre = self.pre.clone();
        let mut post = self.post.clone();
        if pre.is_empty() {
            if !self.pre_wildcard || post.is_empty() {
                return Err(CompileError::bad_condition("wildcard requires transition."));
            }
            pre = ty.excluding(&post);
        } else if post.is_empty() && self.post_wildcard {
            post = ty.excluding(&pre);
        }
        Ok((pre, post))
    }

    fn decompose(&self, alg: &Algebra, mode: Mode) -> Result<GateRef> {
        if self.is_transition() && mode == Mode::Static {
            return Err(CompileError::bad_condition(
                "state transition cannot be decomposed into a static gate.",
            ));
        }
        let (pre, post) = self.freeze(alg)?;
        let source = if self.is_transition() && mode == Mode::Post {
            post
        } else {
            pre
        };
        if source.is_empty() {
            return Err(CompileError::bad_condition(format!(
                "state condition on {} has no states in {} mode.",
                alg.variable(self.var).name,
                mode
            )));
        }
        if alg.variable(self.var).is_boolean() && source.len() > 1 {
            return Err(CompileError::new(
                ErrorCode::ConditionNeverSatisfied,
                "boolean state condition never satisfied.",
            ));
        }
        Ok(alg.states(self.var, &source))
    }

    fn transitions(&self, alg: &Algebra) -> Result<Vec<Transition>> {
        if !self.is_transition() {
            return Ok(vec![]);
        }
        let (pre, post) = self.freeze(alg)?;
        Ok(vec![Transition::new(self.var, pre, post)])
    }

    fn describe(&self, alg: &Algebra) -> String {
        let v = alg.variable(self.var);
        let side = |states: &[usize], wildcard: bool| {
            if states.is_empty() && wildcard {
                "*".to_string()
            } else {
                states.iter().map(|&s| v.state_name(s)).collect::<Vec<_>>().join(",")
            }
        };
        if self.is_transition() {
            format!(
                "{}({} => {})",
                v.name,
                side(&self.pre, self.pre_wildcard),
                side(&self.post, self.post_wildcard)
            )
        } else {
            format!("{}({})", v.name, side(&self.pre, self.pre_wildcard))
        }
    }
}

/// `left => right`: every variable of the right-hand product changes from its state on the
/// left into its state on the right.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionCondition {
    pub left: Condition,
    pub right: Condition,
    lgate: GateRef,
    rgate: GateRef,
    transitions: TransitionSet,
}

impl TransitionCondition {
    pub fn new(alg: &Algebra, left: Condition, right: Condition) -> Result<Self> {
        if left.contains_transitions() || right.contains_transitions() {
            return Err(CompileError::bad_condition(
                "arguments to transition condition must not include transitions.",
            ));
        }

        // right hand must be a product
        let rgate = alg.simplify(right.decompose(alg, Mode::Static)?);
        if alg.kind(rgate) == GateKind::Or {
            return Err(CompileError::bad_condition("right side of a transition must be a product."));
        }
        let rproduct = alg.sop(rgate).into_iter().next().unwrap_or_default();

        let lgate = alg.simplify(left.decompose(alg, Mode::Static)?);
        let mut transitions = TransitionSet::new();
        let mut terms = Vec::new();

        // pair each left term with the right product, variable by variable
        for lproduct in alg.sop(lgate) {
            let mut term = alg.one;
            let mut groups: Vec<Group> = lproduct.groups().chain(rproduct.groups()).collect();
            groups.sort();
            groups.dedup();
            for group in groups {
                match (lproduct.get(group), rproduct.get(group)) {
                    (None, Some(r)) => {
                        // right side only: static condition
                        term = alg.and(term, alg.product_gate(&single(r)));
                    }
                    (Some(l), None) => {
                        term = alg.and(term, alg.product_gate(&single(l)));
                    }
                    (Some(l), Some(r)) if l.allowed == r.allowed => {
                        let g = alg.product_gate(&single(l));
                        return Err(CompileError::bad_condition(format!(
                            "variable condition {} used on both sides of a transition.",
                            alg.display(g)
                        )));
                    }
                    (Some(l), Some(r)) => {
                        term = alg.and(term, alg.product_gate(&single(l)));
                        if let Group::Var(v) = group {
                            transitions.add(Transition::new(v, l.allowed.iter().collect(), r.allowed.iter().collect()));
                        }
                    }
                    (None, None) => {}
                }
            }
            terms.push(term);
        }
        let lgate = alg.or_many(terms);
        debug!(
            "transition condition: pre {} post {} [{}]",
            alg.display(lgate),
            alg.display(rgate),
            transitions.describe(alg)
        );

        Ok(Self {
            left,
            right,
            lgate,
            rgate,
            transitions,
        })
    }

    pub fn transitions(&self) -> &TransitionSet {
        &self.transitions
    }
}

fn single(factor: &Factor) -> Product {
    let mut p = Product::one();
    p.and_factor(factor.clone());
    p
}

/// A condition tree.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Condition {
    /// Always true.
    Any,
    State(StateCondition),
    Transition(Box<TransitionCondition>),
    Intersect(Vec<Condition>),
    Union(Vec<Condition>),
    Invert(Box<Condition>),
}

impl Condition {
    /// `var` is in one of `states`.
    pub fn state(var: VarId, states: impl Into<Vec<usize>>) -> Self {
        Condition::State(StateCondition::new(var, states.into()))
    }

    /// Boolean shorthand: `var` is `1`.
    pub fn boolean(var: VarId) -> Self {
        Condition::state(var, vec![1])
    }

    /// `var` moves from one of `pre` into one of `post`.
    pub fn transition(var: VarId, pre: impl Into<Vec<usize>>, post: impl Into<Vec<usize>>) -> Self {
        Condition::State(StateCondition::transition(var, pre.into(), post.into()))
    }

    /// `left => right` over whole products.
    pub fn transition_of(alg: &Algebra, left: Condition, right: Condition) -> Result<Self> {
        Ok(Condition::Transition(Box::new(TransitionCondition::new(alg, left, right)?)))
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::Intersect(mut list) => {
                list.push(other);
                Condition::Intersect(list)
            }
            c => Condition::Intersect(vec![c, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Union(mut list) => {
                list.push(other);
                Condition::Union(list)
            }
            c => Condition::Union(vec![c, other]),
        }
    }

    pub fn not(self) -> Self {
        Condition::Invert(Box::new(self))
    }

    pub fn contains_transitions(&self) -> bool {
        match self {
            Condition::Any => false,
            Condition::State(s) => s.is_transition(),
            Condition::Transition(_) => true,
            Condition::Intersect(list) | Condition::Union(list) => list.iter().any(Condition::contains_transitions),
            Condition::Invert(c) => c.contains_transitions(),
        }
    }

    /// Turns the condition into a gate.
    pub fn decompose(&self, alg: &Algebra, mode: Mode) -> Result<GateRef> {
        match self {
            Condition::Any => Ok(alg.one),
            Condition::State(s) => s.decompose(alg, mode),
            Condition::Transition(t) => match mode {
                Mode::Pre => Ok(t.lgate),
                Mode::Post => Ok(t.rgate),
                Mode::Static => Err(CompileError::bad_condition(
                    "state transition cannot be decomposed into a static gate.",
                )),
            },
            Condition::Intersect(list) => {
                let mut r = alg.one;
                for c in list {
                    r = alg.and(r, c.decompose(alg, mode)?);
                }
                Ok(r)
            }
            Condition::Union(list) => {
                let mut r = alg.zero;
                for c in list {
                    r = alg.or(r, c.decompose(alg, mode)?);
                }
                Ok(r)
            }
            Condition::Invert(c) => Ok(alg.invert(c.decompose(alg, mode)?)),
        }
    }

    /// All transitions of the condition tree.
    pub fn transitions(&self, alg: &Algebra) -> Result<TransitionSet> {
        let mut set = TransitionSet::new();
        self.collect_transitions(alg, &mut set)?;
        Ok(set)
    }

    fn collect_transitions(&self, alg: &Algebra, set: &mut TransitionSet) -> Result<()> {
        match self {
            Condition::Any => {}
            Condition::State(s) => set.extend(s.transitions(alg)?),
            Condition::Transition(t) => set.extend(t.transitions.iter().cloned()),
            Condition::Intersect(list) | Condition::Union(list) => {
                for c in list {
                    c.collect_transitions(alg, set)?;
                }
            }
            Condition::Invert(c) => c.collect_transitions(alg, set)?,
        }
        Ok(())
    }

    /// Renders the condition in source-like notation.
    pub fn describe(&self, alg: &Algebra) -> String {
        match self {
            Condition::Any => "ANY".to_string(),
            Condition::State(s) => s.describe(alg),
            Condition::Transition(t) => format!("({}) => ({})", t.left.describe(alg), t.right.describe(alg)),
            Condition::Intersect(list) => join(alg, list, " AND "),
            Condition::Union(list) => join(alg, list, " OR "),
            Condition::Invert(c) => format!("NOT {}", c.describe(alg)),
        }
    }
}

fn join(alg: &Algebra, list: &[Condition], sep: &str) -> String {
    let parts: Vec<String> = list
        .iter()
        .map(|c| match c {
            Condition::Intersect(_) | Condition::Union(_) => format!("({})", c.describe(alg)),
            _ => c.describe(alg),
        })
        .collect();
    parts.join(sep)
}
