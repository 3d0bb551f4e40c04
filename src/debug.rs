//! Debug utilities for inspecting a calculated state machine.
//!
//! These helpers render the derived model: product triggers, the guards they activate and
//! the effect collections of each event. They are primarily useful in tests and logs.

use std::fmt::{self, Write};

use log::debug;

use crate::machine::StateMachine;
use crate::trigger::Event;

/// Rendered form of one product trigger.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub event: String,
    pub index: usize,
    pub pre: String,
    pub post: String,
    pub transitions: String,
    /// Names of the guards the trigger activates
    pub guards: Vec<String>,
}

impl fmt::Display for TriggerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} => {} ({})",
            self.event, self.index, self.pre, self.post, self.transitions
        )?;
        if !self.guards.is_empty() {
            write!(f, " activates {}", self.guards.join(", "))?;
        }
        Ok(())
    }
}

impl StateMachine {
    /// Rendered product triggers of all events.
    pub fn trigger_info(&self) -> Vec<TriggerInfo> {
        let alg = self.algebra();
        let mut result = Vec::new();
        for event in self.events() {
            for (index, t) in event.triggers.iter().enumerate() {
                result.push(TriggerInfo {
                    event: event.name.clone(),
                    index,
                    pre: alg.display(t.pre).to_string(),
                    post: alg.display(t.post).to_string(),
                    transitions: t.transitions.describe(alg),
                    guards: t
                        .guards
                        .iter()
                        .map(|tg| self.guards()[tg.guard.index()].name.clone())
                        .collect(),
                });
            }
        }
        result
    }

    /// Effect collections of one event, one effect per line.
    pub fn debug_effects(&self, event: &Event) -> String {
        let alg = self.algebra();
        let mut result = String::new();
        for (title, effects) in [("before", &event.effects_before), ("after", &event.effects_after)] {
            for entry in effects.iter() {
                let _ = write!(result, "  {} {}:", title, entry.effect);
                for term in &entry.terms {
                    let _ = write!(result, " [{} | {}]", alg.display(term.pre), alg.display(term.post));
                }
                let _ = writeln!(result, " from {}", entry.sources.join(", "));
            }
        }
        result
    }

    /// Compact representation of the whole derived model.
    pub fn debug_string(&self) -> String {
        let alg = self.algebra();
        let mut result = String::new();
        let _ = writeln!(result, "StateMachine ({:?}, {} gates):", self.state(), alg.size());
        for v in self.variables() {
            let _ = writeln!(result, "  VAR {} : {}", v.name, v.ty.name());
        }
        for guard in self.guards() {
            let _ = writeln!(
                result,
                "  {} [{} => {}] {} triggers",
                guard,
                alg.display(guard.pre),
                alg.display(guard.post),
                guard.triggers.len()
            );
        }
        for info in self.trigger_info() {
            let _ = writeln!(result, "  TRIGGER {}", info);
        }
        for event in self.events() {
            let effects = self.debug_effects(event);
            if !effects.is_empty() {
                let _ = writeln!(result, "  EVENT {}:", event.name);
                result.push_str(&effects);
            }
        }
        result
    }

    /// Writes [`debug_string`][Self::debug_string] to the log.
    pub fn log_model(&self) {
        if log::log_enabled!(log::Level::Debug) {
            for line in self.debug_string().lines() {
                debug!("{}", line);
            }
        }
    }
}
