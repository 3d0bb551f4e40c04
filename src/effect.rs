//! Effects and the conditions they fire under.
//!
//! For every event, the effects of all associated guards and triggers are gathered into two
//! [`EffectsCollection`]s:
//!
//! | Collection | Holds | Evaluated |
//! |------------|-------|-----------|
//! | `effects_before` | effects of `LEAVE` guards | stage 0, before the state changes |
//! | `effects_after` | effects of `ENTER`/`TRANSITION` guards and of the triggers | stage 1 |
//!
//! An effect reached along several paths appears once, with the disjunction of all its
//! [`EffectTerm`]s.
//!
//! ## Join
//!
//! A guard term refers to the state after the transition. Before it is collected, the
//! post-condition is re-expressed on the pre-state wherever the trigger's own transitions
//! determine it, and what remains of the post-condition only names variables changed by
//! other triggers of the same event.

use std::fmt;

use log::debug;

use crate::algebra::Algebra;
use crate::gate::Wire;
use crate::machine::StateMachine;
use crate::reference::GateRef;
use crate::transition::TransitionSet;
use crate::trigger::{Guard, GuardKind, ProductTrigger, TriggerGuard};
use crate::types::GuardId;

/// An action taken when a condition is met.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Effect {
    /// Calls a method of the host.
    Call(String),
    /// Raises an event.
    Send(String),
}

impl Effect {
    /// Key identifying equal effects across guards and triggers.
    pub fn uid(&self) -> String {
        self.to_string()
    }

    pub fn name(&self) -> &str {
        match self {
            Effect::Call(name) | Effect::Send(name) => name,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Call(name) => write!(f, "CALL {}", name),
            Effect::Send(name) => write!(f, "SEND {}", name),
        }
    }
}

/// One pre/post condition pair under which an effect fires.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EffectTerm {
    pub pre: GateRef,
    pub post: GateRef,
}

/// An effect with all the terms it fires under.
#[derive(Debug, Clone)]
pub struct EffectEntry {
    pub effect: Effect,
    /// Disjunction of the preconditions of all terms.
    pub pre: GateRef,
    /// Disjunction of the postconditions of all terms.
    pub post: GateRef,
    pub terms: Vec<EffectTerm>,
    /// Guards and triggers that contributed terms.
    pub sources: Vec<String>,
}

/// Effects keyed by [`Effect::uid`], in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EffectsCollection {
    entries: Vec<EffectEntry>,
}

impl EffectsCollection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectEntry> {
        self.entries.iter()
    }

    pub fn get(&self, uid: &str) -> Option<&EffectEntry> {
        self.entries.iter().find(|e| e.effect.uid() == uid)
    }

    /// Adds terms under which `effect` fires.
    pub fn add(&mut self, alg: &Algebra, effect: &Effect, terms: &[EffectTerm], source: &str) {
        let uid = effect.uid();
        let index = match self.entries.iter().position(|e| e.effect.uid() == uid) {
            Some(index) => index,
            None => {
                self.entries.push(EffectEntry {
                    effect: effect.clone(),
                    pre: alg.zero,
                    post: alg.zero,
                    terms: Vec::new(),
                    sources: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        for &term in terms {
            entry.pre = alg.or(entry.pre, term.pre);
            entry.post = alg.or(entry.post, term.post);
            entry.terms.push(term);
        }
        if !entry.sources.iter().any(|s| s == source) {
            entry.sources.push(source.to_string());
        }
        debug!("add effect {} from {}: pre {}", uid, source, alg.display(entry.pre));
    }
}

/// Effective conditions per guard for one event.
#[derive(Debug, Clone, Default)]
pub struct GuardCollection {
    entries: Vec<(GuardId, Vec<EffectTerm>)>,
}

impl GuardCollection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GuardId, &[EffectTerm])> {
        self.entries.iter().map(|(id, terms)| (*id, terms.as_slice()))
    }

    /// Terms collected for a guard.
    pub fn terms(&self, id: GuardId) -> &[EffectTerm] {
        self.entries
            .iter()
            .find(|(g, _)| *g == id)
            .map(|(_, terms)| terms.as_slice())
            .unwrap_or(&[])
    }

    /// Adds the conditions under which `trigger` fires `guard`.
    pub fn add(
        &mut self,
        alg: &Algebra,
        guard: &Guard,
        trigger: &ProductTrigger,
        tg: &TriggerGuard,
        event_transitions: &TransitionSet,
        join: bool,
    ) {
        let mut term = EffectTerm {
            pre: trigger.pre,
            post: trigger.post,
        };
        match guard.kind {
            GuardKind::Leave | GuardKind::Transition => {
                term.pre = alg.and(term.pre, tg.pre);
                term.post = alg.and(term.post, tg.post);
            }
            GuardKind::Enter => {
                term.post = alg.and(term.post, tg.post);
            }
        }
        debug!(
            "guard {} before join: pre {} post {}",
            guard.name,
            alg.display(term.pre),
            alg.display(term.post)
        );

        if join {
            term = join_trigger(alg, term, &trigger.transitions, event_transitions);
        }

        match self.entries.iter_mut().find(|(g, _)| *g == guard.id) {
            Some((_, terms)) => terms.push(term),
            None => self.entries.push((guard.id, vec![term])),
        }
    }
}

/// Moves the post-condition of a term onto the pre-state where the trigger determines it.
///
/// Inputs on variables the trigger modifies are replaced by the pre-states leading into
/// them. Inputs on variables modified only by other triggers of the event stay in the
/// post-condition; all others move to the precondition unchanged.
pub fn join_trigger(
    alg: &Algebra,
    term: EffectTerm,
    transitions: &TransitionSet,
    event_transitions: &TransitionSet,
) -> EffectTerm {
    debug!("join trigger: {}", transitions.describe(alg));

    let post_from_pre = alg.replace_inputs(term.post, &mut |input| {
        let Wire::State { var, state } = input.wire else {
            return None;
        };
        if transitions.contains(var) {
            let state = if alg.variable(var).is_boolean() {
                1
            } else {
                state as usize
            };
            let inferred = transitions.infer_post_state(alg, var, state);
            Some(if input.inverted {
                alg.invert(inferred)
            } else {
                inferred
            })
        } else if event_transitions.contains(var) {
            Some(alg.one)
        } else {
            None
        }
    });

    let post_reduced = alg.project(
        term.post,
        &|v| transitions.contains(v) || !event_transitions.contains(v),
        true,
    );

    debug!(
        "join: post {} from pre {} reduced {}",
        alg.display(term.post),
        alg.display(post_from_pre),
        alg.display(post_reduced)
    );

    EffectTerm {
        pre: alg.and(term.pre, post_from_pre),
        post: post_reduced,
    }
}

impl StateMachine {
    /// Fills the effect collections of every event from the trigger-guard associations.
    pub(crate) fn calculate_effects(&mut self) {
        let mut results = Vec::with_capacity(self.events.len());
        for event in &self.events {
            let mut guards = GuardCollection::default();
            for t in &event.triggers {
                for tg in &t.guards {
                    let guard = &self.guards[tg.guard.index()];
                    guards.add(
                        &self.alg,
                        guard,
                        t,
                        tg,
                        &event.transitions,
                        self.options.trigger_join,
                    );
                }
            }

            let mut before = EffectsCollection::default();
            let mut after = EffectsCollection::default();
            for (id, terms) in guards.iter() {
                let guard = &self.guards[id.index()];
                let target = if guard.kind == GuardKind::Leave {
                    &mut before
                } else {
                    &mut after
                };
                let source = guard.to_string();
                for effect in &guard.effects {
                    target.add(&self.alg, effect, terms, &source);
                }
            }
            for t in &event.triggers {
                let term = EffectTerm { pre: t.pre, post: t.post };
                for effect in &t.effects {
                    after.add(&self.alg, effect, &[term], &t.source);
                }
            }
            debug!(
                "event {}: {} effects before, {} after",
                event.name,
                before.len(),
                after.len()
            );
            results.push((before, after));
        }

        for (event, (before, after)) in self.events.iter_mut().zip(results) {
            event.effects_before = before;
            event.effects_after = after;
        }
    }
}
