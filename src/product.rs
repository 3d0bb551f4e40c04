//! Products and factors: the working form of the simplifier.
//!
//! A [`Product`] is a conjunction of [`Factor`]s, at most one per [`Group`]. A factor
//! records the set of states its group is still allowed to take inside the product:
//!
//! | Factor | Meaning |
//! |--------|---------|
//! | empty set | the product is `0` |
//! | all states | no constraint, the factor is dropped |
//! | anything else | `var ∈ allowed` |
//!
//! Boolean variables and labels are groups with two states, where the non-inverted input
//! allows state `1` and the inverted input allows state `0`. A multi-state input `s(k)`
//! allows `{k}` and its inversion allows every state but `k`.

use std::fmt;

use crate::bitset::StateSet;
use crate::types::{LabelId, VarId};

/// Independent dimension of the state space: a variable or a code label.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Group {
    Var(VarId),
    Label(LabelId),
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Var(v) => write!(f, "{}", v),
            Group::Label(l) => write!(f, "{}", l),
        }
    }
}

/// Allowed states of one group inside a product.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Factor {
    pub group: Group,
    pub allowed: StateSet,
    /// Number of states of the group.
    pub width: usize,
    /// Two-state groups (booleans and labels) render as a polarity.
    pub polar: bool,
}

impl Factor {
    pub fn new(group: Group, allowed: StateSet, width: usize, polar: bool) -> Self {
        Self {
            group,
            allowed,
            width,
            polar,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.allowed.len() >= self.width
    }

    /// Intersects with another factor of the same group.
    pub fn intersect(&self, other: &Factor) -> Factor {
        debug_assert_eq!(self.group, other.group);
        Factor {
            allowed: self.allowed.intersection(&other.allowed),
            ..self.clone()
        }
    }

    /// Unites with another factor of the same group.
    pub fn unite(&self, other: &Factor) -> Factor {
        debug_assert_eq!(self.group, other.group);
        Factor {
            allowed: self.allowed.union(&other.allowed),
            ..self.clone()
        }
    }

    /// Returns true if every state this factor allows is allowed by `other` too.
    pub fn implies(&self, other: &Factor) -> bool {
        self.allowed.is_subset(&other.allowed)
    }
}

/// Conjunction of factors, sorted by group, without empty or full factors.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Product {
    factors: Vec<Factor>,
}

impl Product {
    /// The empty product, i.e. `1`.
    pub fn one() -> Self {
        Self::default()
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, group: Group) -> Option<&Factor> {
        self.factors
            .binary_search_by(|f| f.group.cmp(&group))
            .ok()
            .map(|i| &self.factors[i])
    }

    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.factors.iter().map(|f| f.group)
    }

    /// Conjoins a factor. Returns `false` if the product became `0`.
    pub fn and_factor(&mut self, factor: Factor) -> bool {
        match self.factors.binary_search_by(|f| f.group.cmp(&factor.group)) {
            Ok(i) => {
                let merged = self.factors[i].intersect(&factor);
                if merged.is_empty() {
                    return false;
                }
                self.factors[i] = merged;
            }
            Err(i) => {
                if factor.is_empty() {
                    return false;
                }
                if !factor.is_full() {
                    self.factors.insert(i, factor);
                }
            }
        }
        true
    }

    /// Conjoins two products, or `None` if the result is `0`.
    pub fn and(&self, other: &Product) -> Option<Product> {
        let mut result = self.clone();
        for factor in &other.factors {
            if !result.and_factor(factor.clone()) {
                return None;
            }
        }
        Some(result)
    }

    /// Replaces the factor of its group; a full factor removes the group.
    pub fn set_factor(&mut self, factor: Factor) {
        match self.factors.binary_search_by(|f| f.group.cmp(&factor.group)) {
            Ok(i) if factor.is_full() => {
                self.factors.remove(i);
            }
            Ok(i) => self.factors[i] = factor,
            Err(i) if !factor.is_full() => self.factors.insert(i, factor),
            Err(_) => {}
        }
    }

    pub fn remove(&mut self, group: Group) -> Option<Factor> {
        match self.factors.binary_search_by(|f| f.group.cmp(&group)) {
            Ok(i) => Some(self.factors.remove(i)),
            Err(_) => None,
        }
    }

    /// Returns true if every assignment satisfying `self` satisfies `other`.
    pub fn implies(&self, other: &Product) -> bool {
        other
            .factors
            .iter()
            .all(|q| self.get(q.group).is_some_and(|p| p.implies(q)))
    }

    /// If both products constrain the same groups and differ on exactly one of them,
    /// returns that group.
    pub fn single_difference(&self, other: &Product) -> Option<Group> {
        if self.len() != other.len() {
            return None;
        }
        let mut diff = None;
        for (p, q) in self.factors.iter().zip(other.factors.iter()) {
            if p.group != q.group {
                return None;
            }
            if p.allowed != q.allowed {
                if diff.is_some() {
                    return None;
                }
                diff = Some(p.group);
            }
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: u32) -> Group {
        Group::Var(VarId::new(i))
    }

    fn factor(group: Group, states: &[usize], width: usize) -> Factor {
        Factor::new(group, states.iter().copied().collect(), width, width == 2)
    }

    #[test]
    fn test_merge_intersects() {
        let mut p = Product::one();
        assert!(p.and_factor(factor(var(0), &[0, 1], 3)));
        assert!(p.and_factor(factor(var(0), &[1, 2], 3)));
        assert_eq!(p.get(var(0)).unwrap().allowed, StateSet::single(1));
        assert!(!p.and_factor(factor(var(0), &[2], 3)));
    }

    #[test]
    fn test_full_factor_absorbed() {
        let mut p = Product::one();
        assert!(p.and_factor(factor(var(1), &[0, 1], 2)));
        assert!(p.is_empty());
    }

    #[test]
    fn test_sorted_by_group() {
        let a = Product::one();
        let a = a.and(&{
            let mut q = Product::one();
            q.and_factor(factor(var(2), &[1], 2));
            q
        });
        let mut a = a.unwrap();
        a.and_factor(factor(var(0), &[0], 2));
        assert_eq!(a.groups().collect::<Vec<_>>(), vec![var(0), var(2)]);
    }

    #[test]
    fn test_implies() {
        let mut ab = Product::one();
        ab.and_factor(factor(var(0), &[1], 2));
        ab.and_factor(factor(var(1), &[1], 2));
        let mut a = Product::one();
        a.and_factor(factor(var(0), &[1], 2));
        assert!(ab.implies(&a));
        assert!(!a.implies(&ab));
        assert!(ab.implies(&Product::one()));
    }

    #[test]
    fn test_single_difference() {
        let mut p = Product::one();
        p.and_factor(factor(var(0), &[1], 2));
        p.and_factor(factor(var(1), &[0], 3));
        let mut q = p.clone();
        q.set_factor(factor(var(1), &[2], 3));
        assert_eq!(p.single_difference(&q), Some(var(1)));
        assert_eq!(p.single_difference(&p), None);
        q.set_factor(factor(var(0), &[0], 2));
        assert_eq!(p.single_difference(&q), None);
    }
}
