use std::collections::HashMap;

use num_bigint::BigUint;

use crate::algebra::Algebra;
use crate::eval::Assignment;
use crate::reference::GateRef;
use crate::types::VarId;

impl Algebra {
    /// Returns one state assignment satisfying the gate, if any exists.
    ///
    /// Variables are fixed in declaration order, always picking the lowest state that keeps
    /// the gate satisfiable.
    pub fn one_sat(&self, node: GateRef) -> Option<Assignment> {
        if self.is_zero(node) {
            return None;
        }

        let mut states = Vec::with_capacity(self.num_vars());
        let mut current = self.simplify(node);
        for i in 0..self.num_vars() {
            let v = VarId::new(i as u32);
            let n = self.variable(v).cardinality();
            let (state, next) = (0..n)
                .map(|s| (s, self.cofactor(current, v, s)))
                .find(|&(_, g)| !self.is_zero(g))?;
            states.push(state);
            current = next;
        }

        Some(Assignment::new(states))
    }

    /// Counts the full state assignments satisfying the gate.
    pub fn sat_count(&self, node: GateRef) -> BigUint {
        let vars: Vec<VarId> = (0..self.num_vars()).map(|i| VarId::new(i as u32)).collect();
        let mut cache = HashMap::new();
        self._sat_count(self.simplify(node), &vars, &mut cache)
    }

    fn _sat_count(&self, node: GateRef, vars: &[VarId], cache: &mut HashMap<(GateRef, usize), BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        }
        if self.is_one(node) {
            return vars
                .iter()
                .fold(BigUint::from(1u32), |acc, &v| acc * self.variable(v).cardinality());
        }

        let key = (node, vars.len());
        if let Some(count) = cache.get(&key) {
            return count.clone();
        }

        let Some((&v, rest)) = vars.split_first() else {
            panic!("gate {} is not constant but depends on no variable", node);
        };
        let n = self.variable(v).cardinality();
        let count = if self.variables(node).contains(&v) {
            (0..n)
                .map(|s| self._sat_count(self.cofactor(node, v, s), rest, cache))
                .sum::<BigUint>()
        } else {
            self._sat_count(node, rest, cache) * n
        };

        cache.insert(key, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::variable::StateType;

    #[test]
    fn test_sat_count_constants() {
        let alg = Algebra::new();
        alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        alg.add_variable("f", StateType::Boolean);
        assert_eq!(alg.sat_count(alg.zero), BigUint::ZERO);
        assert_eq!(alg.sat_count(alg.one), BigUint::from(6u32));
    }

    #[test]
    fn test_sat_count_multi_state() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let not_a = alg.invert(alg.state(s, 0));
        assert_eq!(alg.sat_count(not_a), BigUint::from(4u32));
        let g = alg.or(alg.state(s, 0), alg.state(f, 1));
        assert_eq!(alg.sat_count(g), BigUint::from(4u32));
        assert_eq!(alg.sat_count(alg.invert(g)), BigUint::from(2u32));
    }

    #[test]
    fn test_one_sat() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let g = alg.and(alg.state(s, 2), alg.state(f, 0));
        let model = alg.one_sat(g).unwrap();
        assert_eq!(model.states(), &[2, 0]);
        assert!(alg.eval(g, &model));

        let never = alg.and(g, alg.state(s, 1));
        assert_eq!(alg.one_sat(never), None);
    }
}
