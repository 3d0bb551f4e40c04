//! Event handler generation.
//!
//! Every event becomes one handler with the following layout:
//!
//! 1. stage `PRE` label assignments
//! 2. effects of `LEAVE` guards
//! 3. state assignments, one conditional block per product trigger
//! 4. stage `POST` label assignments
//! 5. all other effects
//!
//! Effects are conditional unless their condition is `1`.

use log::{debug, info};

use crate::emit::Target;
use crate::error::CompileErrors;
use crate::label::{LabelScheduler, ScheduledEffect};
use crate::machine::StateMachine;
use crate::reference::GateRef;
use crate::trigger::Event;
use crate::types::Stage;

/// Writes the handlers of a calculated [`StateMachine`] into a [`Target`].
pub struct CodeGenerator<'m> {
    sm: &'m StateMachine,
}

impl<'m> CodeGenerator<'m> {
    /// # Panics
    ///
    /// Panics if the model has not been calculated.
    pub fn new(sm: &'m StateMachine) -> Self {
        assert!(sm.is_ready(), "state machine must be calculated before code generation");
        Self { sm }
    }

    /// Emits the handlers of all events, in declaration order.
    pub fn emit<T: Target + ?Sized>(&self, target: &mut T) {
        for event in self.sm.events() {
            self.emit_event(event, target);
        }
    }

    pub fn emit_event<T: Target + ?Sized>(&self, event: &Event, target: &mut T) {
        info!("generate handler {}", event.name);
        let alg = self.sm.algebra();
        let options = self.sm.options();

        target.begin_handler(&event.name);
        target.enter_block();

        let mut labels =
            LabelScheduler::new(alg, event.modified_variables()).with_nesting(options.nested_label_scheduling);

        let pres: Vec<GateRef> = event
            .triggers
            .iter()
            .map(|t| labels.convert_to_gate(Stage::PRE, t.pre))
            .collect();
        for &c in &pres {
            labels.schedule(c);
        }
        let before = labels.schedule_effects(&event.effects_before);
        let after = labels.schedule_effects(&event.effects_after);

        self.comment(target, Some("stage 0 conditions"));
        labels.emit(target, Stage::PRE);

        if !before.is_empty() {
            self.comment(target, None);
            self.comment(target, Some("state exit handler effects"));
            self.emit_effects(&labels, &before, target);
        }

        self.comment(target, None);
        self.comment(target, Some("state transitions"));
        for (trigger, &c) in event.triggers.iter().zip(&pres) {
            if alg.is_zero(c) || trigger.transitions.is_empty() {
                continue;
            }
            let conditional = !alg.is_one(c);
            if conditional {
                target.emit_if_header(labels.expression(c));
                target.enter_block();
            }
            self.comment(target, Some(trigger.source.as_str()));
            for t in trigger.transitions.iter() {
                // qualified triggers have exactly one post state per variable
                target.emit_variable_assignment(&alg.variable(t.var), t.post[0]);
            }
            if conditional {
                target.leave_block();
            }
        }

        labels.next_stage();
        self.comment(target, None);
        self.comment(target, Some("stage 1 conditions"));
        labels.emit(target, Stage::POST);

        if !after.is_empty() {
            self.comment(target, None);
            self.comment(target, Some("state entry handler effects"));
            self.emit_effects(&labels, &after, target);
        }

        debug!("labels of {}:\n{}", event.name, labels.debug_string());
        drop(labels);

        target.leave_block();
        target.end_handler(&event.name);
        self.comment(target, None);
    }

    fn emit_effects<T: Target + ?Sized>(&self, labels: &LabelScheduler<'_>, effects: &[ScheduledEffect], target: &mut T) {
        let alg = self.sm.algebra();
        for scheduled in effects {
            for source in &scheduled.sources {
                self.comment(target, Some(source.as_str()));
            }
            let conditional = !alg.is_one(scheduled.condition);
            if conditional {
                target.emit_if_header(labels.expression(scheduled.condition));
                target.enter_block();
            }
            target.emit_effect(&scheduled.effect);
            if conditional {
                target.leave_block();
            }
        }
    }

    fn comment<T: Target + ?Sized>(&self, target: &mut T, text: Option<&str>) {
        if self.sm.options().emit_comments {
            target.comment(text);
        }
    }
}

/// Calculates `sm` and writes all its handlers into `target`.
pub fn generate<T: Target + ?Sized>(sm: &mut StateMachine, target: &mut T) -> Result<(), CompileErrors> {
    sm.calculate()?;
    CodeGenerator::new(sm).emit(target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::effect::Effect;
    use crate::options::CompilerOptions;
    use crate::pseudo::PseudoCode;
    use crate::trigger::GuardKind;

    fn quiet() -> StateMachine {
        StateMachine::with_options(CompilerOptions {
            emit_comments: false,
            ..CompilerOptions::default()
        })
    }

    #[test]
    fn test_enter_guard_handler() {
        let mut sm = quiet();
        sm.add_simple_type("S", &["a", "b"]).unwrap();
        let ty = sm.state_type("S").unwrap();
        sm.add_variable("s", ty).unwrap();
        let c = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        sm.add_trigger("e", c, vec![]).unwrap();
        let g = sm.state_condition("s", &["b"]).unwrap();
        sm.add_guard(g, Some(GuardKind::Enter), None, vec![Effect::Call("m".into())])
            .unwrap();

        let mut out = PseudoCode::new();
        generate(&mut sm, &mut out).unwrap();
        assert_eq!(
            out.as_str(),
            "PROCEDURE e\n\
             BEGIN\n\
             \x20  SET _c0 = s(a)\n\
             \x20  IF _c0 THEN\n\
             \x20  BEGIN\n\
             \x20     SET s(b)\n\
             \x20  END\n\
             \x20  IF _c0 THEN\n\
             \x20  BEGIN\n\
             \x20     CALL m\n\
             \x20  END\n\
             END\n"
        );
    }

    #[test]
    fn test_failed_model_is_not_generated() {
        let mut sm = quiet();
        assert!(sm.add_variable("s", crate::variable::StateType::Boolean).is_ok());
        assert!(sm.add_variable("s", crate::variable::StateType::Boolean).is_err());
        let mut out = PseudoCode::new();
        let errors = generate(&mut sm, &mut out).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(out.as_str().is_empty());
    }

    #[test]
    #[should_panic(expected = "must be calculated")]
    fn test_generator_requires_calculation() {
        let sm = quiet();
        CodeGenerator::new(&sm);
    }
}
