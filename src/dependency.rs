//! Trigger-guard dependency analysis.
//!
//! For every product trigger and every guard, the analysis decides whether the trigger can
//! activate the guard and derives the conditions specific to that pairing:
//!
//! | Guard kind | Entry condition | Exit condition |
//! |------------|-----------------|----------------|
//! | `TRANSITION` | `t.pre · g.pre` | `t.post · g.post` |
//! | `ENTER` | `t.pre · !g.pre` | `t.post · g.post` |
//! | `LEAVE` | `t.pre · g.pre` | `t.post · !g.post` |
//!
//! A `TRANSITION` guard only applies when it names a variable the trigger modifies, and
//! neither condition may be constant.
//!
//! For static guards the edge is then projected onto the variables relevant to both sides:
//! variables the trigger does not modify and variables the guard does not mention become
//! `1`. A constant edge means the guard is unaffected. The edge must finally be realizable
//! by the trigger's transitions ([`TransitionSet::match_edge`]).
//!
//! [`TransitionSet::match_edge`]: crate::transition::TransitionSet::match_edge

use log::debug;

use crate::algebra::Algebra;
use crate::machine::StateMachine;
use crate::reference::GateRef;
use crate::trigger::{Guard, GuardKind, ProductTrigger, TriggerGuard, TriggerRef};

/// Conditions under which `trigger` activates `guard`, or `None` if it never does.
///
/// The returned pair is the unprojected entry and exit condition.
pub fn relate(alg: &Algebra, trigger: &ProductTrigger, guard: &Guard) -> Option<(GateRef, GateRef)> {
    match guard.kind {
        GuardKind::Transition => {
            if !guard.transitions.intersects(&trigger.transitions) {
                return None;
            }
            let pre = alg.and(trigger.pre, guard.pre);
            let post = alg.and(trigger.post, guard.post);
            if alg.is_fixed(pre) || alg.is_fixed(post) {
                debug!("guard {}: transition condition is constant", guard.name);
                return None;
            }
            Some((pre, post))
        }
        GuardKind::Enter | GuardKind::Leave => {
            let (genter, gleave) = if guard.kind == GuardKind::Enter {
                (
                    alg.and(trigger.pre, alg.invert(guard.pre)),
                    alg.and(trigger.post, guard.post),
                )
            } else {
                (
                    alg.and(trigger.pre, guard.pre),
                    alg.and(trigger.post, alg.invert(guard.post)),
                )
            };

            let guard_vars = alg.variables(guard.pre);
            let project = |r: GateRef| {
                let r = alg.project(r, &|v| !trigger.transitions.contains(v), true);
                alg.project(r, &|v| !guard_vars.contains(&v), true)
            };
            let enter = project(genter);
            let leave = project(gleave);
            debug!(
                "guard {}: edge {} => {}",
                guard.name,
                alg.display(enter),
                alg.display(leave)
            );
            if alg.is_fixed(enter) || alg.is_fixed(leave) {
                return None;
            }
            if trigger.transitions.match_edge(alg, enter, leave).is_empty() {
                debug!("guard {}: edge not realizable", guard.name);
                return None;
            }
            Some((genter, gleave))
        }
    }
}

impl StateMachine {
    /// Associates every product trigger with the guards it activates.
    pub(crate) fn calculate_dependencies(&mut self) {
        let mut links = Vec::new();
        for event in &self.events {
            for (index, trigger) in event.triggers.iter().enumerate() {
                if trigger.transitions.is_empty() {
                    continue;
                }
                for guard in &self.guards {
                    if let Some((pre, post)) = relate(&self.alg, trigger, guard) {
                        debug!("trigger {}[{}] activates guard {}", event.name, index, guard.name);
                        let at = TriggerRef {
                            event: event.id,
                            index,
                        };
                        let tg = TriggerGuard {
                            guard: guard.id,
                            pre,
                            post,
                        };
                        links.push((at, tg));
                    }
                }
            }
        }

        for (at, tg) in links {
            self.events[at.event.index()].triggers[at.index].guards.push(tg);
            self.guards[tg.guard.index()].triggers.push(at);
        }
    }
}
