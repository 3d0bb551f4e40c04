//! Events, triggers and guards of the model.
//!
//! A trigger declared with [`StateMachine::add_trigger`][crate::machine::StateMachine::add_trigger]
//! is split into [`ProductTrigger`]s, one per branch of its precondition, and each branch
//! modifies every variable of its transition set into exactly one post-state. Guards
//! watch for states being entered or left; the dependency analysis links both sides with
//! [`TriggerGuard`]s.

use std::fmt;

use crate::effect::{Effect, EffectsCollection};
use crate::reference::GateRef;
use crate::transition::TransitionSet;
use crate::types::{EventId, GuardId, VarId};

/// When a guard fires relative to the state it watches.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum GuardKind {
    /// The watched condition becomes true.
    #[default]
    Enter,
    /// The watched condition stops being true.
    Leave,
    /// An explicit state transition takes place.
    Transition,
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardKind::Enter => write!(f, "ENTER"),
            GuardKind::Leave => write!(f, "LEAVE"),
            GuardKind::Transition => write!(f, "TRANSITION"),
        }
    }
}

/// Points at one product trigger of one event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TriggerRef {
    pub event: EventId,
    pub index: usize,
}

/// A named watch on a condition, carrying effects.
#[derive(Debug, Clone)]
pub struct Guard {
    pub id: GuardId,
    pub name: String,
    pub kind: GuardKind,
    /// Condition on the state before the change.
    pub pre: GateRef,
    /// Condition on the state after the change; equal to `pre` for static guards.
    pub post: GateRef,
    /// Transitions named by a `TRANSITION` guard; empty otherwise.
    pub transitions: TransitionSet,
    pub effects: Vec<Effect>,
    /// Triggers found relevant by the dependency analysis.
    pub triggers: Vec<TriggerRef>,
    /// Source-like rendering of the condition.
    pub source: String,
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.name, self.source)
    }
}

/// A trigger as declared, before it is split into branches.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub event: EventId,
    pub pre: GateRef,
    pub post: GateRef,
    pub transitions: TransitionSet,
    pub effects: Vec<Effect>,
    pub source: String,
    /// Number of product triggers this declaration produced.
    pub branches: usize,
}

/// One branch of a trigger: a product precondition with a qualified transition set.
///
/// # Invariants
///
/// - Every variable of `transitions` has exactly one transition with a single post-state
/// - `pre` is a product gate
#[derive(Debug, Clone)]
pub struct ProductTrigger {
    pub event: EventId,
    pub pre: GateRef,
    pub post: GateRef,
    pub transitions: TransitionSet,
    pub effects: Vec<Effect>,
    /// Guards associated by the dependency analysis, with their derived conditions.
    pub guards: Vec<TriggerGuard>,
    pub source: String,
}

impl ProductTrigger {
    /// Variables assigned when the trigger fires.
    pub fn modified_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.transitions.variables()
    }
}

/// A guard found relevant to a trigger, with the conditions specific to the pairing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TriggerGuard {
    pub guard: GuardId,
    pub pre: GateRef,
    pub post: GateRef,
}

/// An event and everything derived for it.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub triggers: Vec<ProductTrigger>,
    /// Union of the transitions of all triggers.
    pub transitions: TransitionSet,
    /// Effects evaluated on stage 0, before the state changes.
    pub effects_before: EffectsCollection,
    /// Effects evaluated on stage 1, after the state changes.
    pub effects_after: EffectsCollection,
}

impl Event {
    pub fn new(id: EventId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            triggers: Vec::new(),
            transitions: TransitionSet::new(),
            effects_before: EffectsCollection::default(),
            effects_after: EffectsCollection::default(),
        }
    }

    /// Variables assigned by any trigger of the event, in index order.
    pub fn modified_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.transitions.variables()
    }

    pub(crate) fn clear_derived(&mut self) {
        for t in &mut self.triggers {
            t.guards.clear();
        }
        self.effects_before = EffectsCollection::default();
        self.effects_after = EffectsCollection::default();
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_kind_display() {
        assert_eq!(GuardKind::default(), GuardKind::Enter);
        assert_eq!(GuardKind::Leave.to_string(), "LEAVE");
        assert_eq!(GuardKind::Transition.to_string(), "TRANSITION");
    }

    #[test]
    fn test_event_starts_empty() {
        let e = Event::new(EventId::new(0), "e");
        assert_eq!(e.to_string(), "e");
        assert!(e.triggers.is_empty());
        assert!(e.effects_before.is_empty());
        assert_eq!(e.modified_variables().count(), 0);
    }
}
