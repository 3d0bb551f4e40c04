use std::fmt::{Display, Formatter};

/// Handle of a gate interned in the [`GateCache`][crate::cache::GateCache].
///
/// Two handles are equal iff they denote structurally equal gates of the same cache
/// scope. Handles of a popped scope must not be used anymore.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateRef(u32);

impl GateRef {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the arena index of the gate.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for GateRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
