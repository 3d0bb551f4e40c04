//! Evaluation of gates under concrete states.

use std::fmt;

use crate::algebra::Algebra;
use crate::gate::{Gate, Input, Wire};
use crate::reference::GateRef;
use crate::types::VarId;

/// A concrete state for every variable, indexed by [`VarId`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Assignment(Vec<usize>);

impl Assignment {
    pub fn new(states: Vec<usize>) -> Self {
        Self(states)
    }

    pub fn get(&self, v: VarId) -> usize {
        self.0[v.index()]
    }

    pub fn set(&mut self, v: VarId, state: usize) {
        self.0[v.index()] = state;
    }

    pub fn states(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}

impl Algebra {
    /// Evaluates a gate.
    ///
    /// # Panics
    ///
    /// Panics if the gate contains code labels, which have no value outside generated code.
    pub fn eval(&self, r: GateRef, assignment: &Assignment) -> bool {
        match self.node(r) {
            Gate::Fixed(value) => value,
            Gate::Input(input) => self.eval_input(input, assignment),
            Gate::And(children) => children.iter().all(|&c| self.eval(c, assignment)),
            Gate::Or(children) => children.iter().any(|&c| self.eval(c, assignment)),
        }
    }

    fn eval_input(&self, input: Input, assignment: &Assignment) -> bool {
        match input.wire {
            Wire::State { var, state } => {
                let current = assignment.get(var);
                let positive = if self.variable(var).is_boolean() {
                    current == 1
                } else {
                    current == state as usize
                };
                positive != input.inverted
            }
            Wire::Label(label) => panic!("cannot evaluate code label {}", label),
        }
    }

    /// Fixes variable `v` to `state` and simplifies.
    pub fn cofactor(&self, r: GateRef, v: VarId, state: usize) -> GateRef {
        let boolean = self.variable(v).is_boolean();
        self.replace_inputs(r, &mut |input| match input.wire {
            Wire::State { var, state: s } if var == v => {
                let positive = if boolean { state == 1 } else { state == s as usize };
                Some(self.constant(positive != input.inverted))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::variable::StateType;

    #[test]
    fn test_eval_boolean() {
        let alg = Algebra::new();
        let a = alg.add_variable("a", StateType::Boolean);
        let b = alg.add_variable("b", StateType::Boolean);
        let f = alg.and(alg.state(a, 1), alg.state(b, 0));
        assert!(alg.eval(f, &Assignment::new(vec![1, 0])));
        assert!(!alg.eval(f, &Assignment::new(vec![1, 1])));
        assert!(!alg.eval(f, &Assignment::new(vec![0, 0])));
    }

    #[test]
    fn test_eval_multi_state() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let not_b = alg.invert(alg.state(s, 1));
        assert!(alg.eval(not_b, &Assignment::new(vec![0])));
        assert!(!alg.eval(not_b, &Assignment::new(vec![1])));
        assert!(alg.eval(not_b, &Assignment::new(vec![2])));
    }

    #[test]
    fn test_double_negation_semantics() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let g = alg.or(alg.and(alg.state(s, 0), alg.state(f, 1)), alg.state(s, 2));
        let gg = alg.invert(alg.invert(g));
        for si in 0..3 {
            for fi in 0..2 {
                let x = Assignment::new(vec![si, fi]);
                assert_eq!(alg.eval(g, &x), alg.eval(gg, &x), "at {}", x);
                assert_ne!(alg.eval(g, &x), alg.eval(alg.invert(g), &x), "at {}", x);
            }
        }
    }

    #[test]
    fn test_cofactor() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let g = alg.and(alg.state(s, 0), alg.state(f, 1));
        assert_eq!(alg.cofactor(g, s, 1), alg.zero);
        assert_eq!(alg.cofactor(g, s, 0), alg.state(f, 1));
        assert_eq!(alg.cofactor(g, f, 1), alg.state(s, 0));
    }
}
