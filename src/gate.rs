//! Gate nodes.
//!
//! A [`Gate`] is one node of a boolean expression over *wires*. Gates never own other gates,
//! they refer to their operands by [`GateRef`] into the [`GateCache`][crate::cache::GateCache],
//! so structurally equal gates are stored once.

use crate::reference::GateRef;
use crate::types::{LabelId, VarId};

/// Elementary signal a gate input is connected to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Wire {
    /// The variable is in `state`. Boolean variables always use state `0` here and
    /// express their two states through the polarity of the input.
    State { var: VarId, state: u32 },
    /// The value of an evaluated code label.
    Label(LabelId),
}

/// An elementary, possibly inverted, input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Input {
    pub wire: Wire,
    pub inverted: bool,
}

impl Input {
    pub const fn new(wire: Wire, inverted: bool) -> Self {
        Self { wire, inverted }
    }

    pub const fn label(label: LabelId) -> Self {
        Self::new(Wire::Label(label), false)
    }

    pub fn var(&self) -> Option<VarId> {
        match self.wire {
            Wire::State { var, .. } => Some(var),
            Wire::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<LabelId> {
        match self.wire {
            Wire::Label(label) if !self.inverted => Some(label),
            _ => None,
        }
    }

    pub fn negate(self) -> Self {
        Self {
            wire: self.wire,
            inverted: !self.inverted,
        }
    }
}

/// Operator kind of a gate, ordered as the composition rules expect.
///
/// `Fixed < Input < And < Or`: operands are exchanged so that the left one never has a
/// lower kind than the right one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum GateKind {
    Fixed,
    Input,
    And,
    Or,
}

impl GateKind {
    pub fn is_logical(self) -> bool {
        matches!(self, GateKind::And | GateKind::Or)
    }
}

/// A gate node.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Gate {
    Fixed(bool),
    Input(Input),
    And(Box<[GateRef]>),
    Or(Box<[GateRef]>),
}

impl Gate {
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Fixed(_) => GateKind::Fixed,
            Gate::Input(_) => GateKind::Input,
            Gate::And(_) => GateKind::And,
            Gate::Or(_) => GateKind::Or,
        }
    }

    /// Operands of a logical gate; empty for constants and inputs.
    pub fn children(&self) -> &[GateRef] {
        match self {
            Gate::And(children) | Gate::Or(children) => children,
            _ => &[],
        }
    }

    pub fn as_input(&self) -> Option<Input> {
        match self {
            Gate::Input(input) => Some(*input),
            _ => None,
        }
    }

    /// Creates a logical gate of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not logical.
    pub fn logical(kind: GateKind, children: Vec<GateRef>) -> Gate {
        match kind {
            GateKind::And => Gate::And(children.into_boxed_slice()),
            GateKind::Or => Gate::Or(children.into_boxed_slice()),
            _ => panic!("{:?} is not a logical gate kind", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order() {
        assert!(GateKind::Fixed < GateKind::Input);
        assert!(GateKind::Input < GateKind::And);
        assert!(GateKind::And < GateKind::Or);
        assert!(GateKind::Or.is_logical());
        assert!(!GateKind::Input.is_logical());
    }

    #[test]
    fn test_input_negate() {
        let i = Input::new(Wire::State { var: VarId::new(0), state: 2 }, false);
        assert!(i.negate().inverted);
        assert_eq!(i.negate().negate(), i);
        assert_eq!(i.var(), Some(VarId::new(0)));
        assert_eq!(Input::label(LabelId::new(4)).as_label(), Some(LabelId::new(4)));
        assert_eq!(Input::label(LabelId::new(4)).negate().as_label(), None);
    }

    #[test]
    fn test_logical_children() {
        let g = Gate::logical(GateKind::Or, vec![GateRef::new(2), GateRef::new(3)]);
        assert_eq!(g.kind(), GateKind::Or);
        assert_eq!(g.children(), &[GateRef::new(2), GateRef::new(3)]);
        assert!(Gate::Fixed(true).children().is_empty());
    }
}
