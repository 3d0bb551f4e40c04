//! Type-safe wrappers for the integer spaces of the compiler.
//!
//! These newtypes keep apart a variable's declaration ordinal, the ordinals of events and
//! guards in the model, the index of a code label inside one generation pass, and the
//! evaluation stage a label belongs to.
use std::fmt;

/// Index of a variable in declaration order (0-indexed).
///
/// # Invariants
///
/// - Ids are dense: the n-th declared variable has id `n`
/// - Ids never change after declaration
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarId(u32);

impl VarId {
    pub const fn new(index: u32) -> Self {
        VarId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<VarId> for u32 {
    fn from(var: VarId) -> Self {
        var.0
    }
}

/// Index of an event in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EventId(u32);

impl EventId {
    pub const fn new(index: u32) -> Self {
        EventId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of a guard in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GuardId(u32);

impl GuardId {
    pub const fn new(index: u32) -> Self {
        GuardId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Index of a code label within one generation pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LabelId(u32);

impl LabelId {
    pub const fn new(index: u32) -> Self {
        LabelId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Name of the label as written into generated code.
    pub fn name(self) -> String {
        format!("_c{}", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_c{}", self.0)
    }
}

/// Evaluation stage of a condition.
///
/// Stage 0 is evaluated before the state transition is applied, stage 1 after it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Stage(u32);

impl Stage {
    /// Conditions on the state before the transition.
    pub const PRE: Stage = Stage(0);
    /// Conditions on the state after the transition.
    pub const POST: Stage = Stage(1);

    pub const fn new(stage: u32) -> Self {
        Stage(stage)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Stage(self.0 + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_id() {
        let v = VarId::new(3);
        assert_eq!(v.index(), 3);
        assert_eq!(u32::from(v), 3);
        assert_eq!(format!("{}", v), "v3");
        assert!(VarId::new(1) < VarId::new(2));
    }

    #[test]
    fn test_model_ids() {
        assert_eq!(EventId::new(2).to_string(), "e2");
        assert_eq!(GuardId::new(0).index(), 0);
    }

    #[test]
    fn test_label_name() {
        let l = LabelId::new(12);
        assert_eq!(l.name(), "_c12");
        assert_eq!(l.to_string(), "_c12");
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::PRE < Stage::POST);
        assert_eq!(Stage::PRE.next(), Stage::POST);
        assert_eq!(Stage::default(), Stage::PRE);
        assert_eq!(Stage::POST.to_string(), "$1");
    }
}
