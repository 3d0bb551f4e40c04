//! State types and state variables.
//!
//! A variable takes one state out of a finite, named set. Every variable owns a range of
//! *wires* in one flat address space: a simple type with `n` states owns `n` wires (one per
//! state), the boolean type owns a single wire whose inverted form stands for state `0`.

use std::fmt;

use crate::error::{CompileError, ErrorCode, Result};
use crate::types::VarId;

/// Describes the set of states a variable can take.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StateType {
    /// The two states `0` and `1`.
    Boolean,
    /// A named enumeration of states `0..n`.
    Simple { name: String, states: Vec<String> },
}

impl StateType {
    pub const BOOLEAN: &'static str = "BOOLEAN";

    pub fn simple(name: impl Into<String>, states: impl IntoIterator<Item = impl Into<String>>) -> Self {
        StateType::Simple {
            name: name.into(),
            states: states.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StateType::Boolean => Self::BOOLEAN,
            StateType::Simple { name, .. } => name,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, StateType::Boolean)
    }

    /// Number of states.
    pub fn cardinality(&self) -> usize {
        match self {
            StateType::Boolean => 2,
            StateType::Simple { states, .. } => states.len(),
        }
    }

    /// Number of wires occupied in the address space.
    pub fn width(&self) -> u32 {
        match self {
            StateType::Boolean => 1,
            StateType::Simple { states, .. } => states.len() as u32,
        }
    }

    /// Translates a state name into its index.
    pub fn state_index(&self, name: &str) -> Result<usize> {
        let index = match self {
            StateType::Boolean => match name {
                "0" => Some(0),
                "1" => Some(1),
                _ => None,
            },
            StateType::Simple { states, .. } => states.iter().position(|s| s == name),
        };
        index.ok_or_else(|| {
            CompileError::new(
                ErrorCode::InvalidStateName,
                format!("state '{}' not found in type '{}'.", name, self.name()),
            )
        })
    }

    /// Translates several state names, preserving order.
    pub fn state_indexes<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<Vec<usize>> {
        names.into_iter().map(|n| self.state_index(n)).collect()
    }

    /// Returns the name of a state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for this type.
    pub fn state_name(&self, index: usize) -> &str {
        match self {
            StateType::Boolean => match index {
                0 => "0",
                1 => "1",
                _ => panic!("boolean type accepts states 0 and 1 only, got {}", index),
            },
            StateType::Simple { states, .. } => &states[index],
        }
    }

    /// Returns the states not listed in `exclude`, in index order.
    pub fn excluding(&self, exclude: &[usize]) -> Vec<usize> {
        (0..self.cardinality()).filter(|i| !exclude.contains(i)).collect()
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateType::Boolean => write!(f, "{}", Self::BOOLEAN),
            StateType::Simple { name, states } => write!(f, "{}({})", name, states.join(", ")),
        }
    }
}

/// A state variable of the machine.
///
/// Immutable once declared. `index` is the declaration ordinal and `address` the first
/// wire of the variable; the wire of state `k` of a simple variable is `address + k`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: StateType,
    pub index: VarId,
    pub address: u32,
}

impl Variable {
    pub fn is_boolean(&self) -> bool {
        self.ty.is_boolean()
    }

    pub fn cardinality(&self) -> usize {
        self.ty.cardinality()
    }

    pub fn state_name(&self, index: usize) -> &str {
        self.ty.state_name(index)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
