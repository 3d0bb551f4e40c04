use smg_rs::effect::Effect;
use smg_rs::emit::{Emitter, Expression, Operator};
use smg_rs::generate::generate;
use smg_rs::label::LabelScheduler;
use smg_rs::machine::StateMachine;
use smg_rs::options::CompilerOptions;
use smg_rs::pseudo::PseudoCode;
use smg_rs::trigger::GuardKind;
use smg_rs::types::Stage;
use smg_rs::variable::Variable;

use test_log::test;

/// Records label assignments only.
#[derive(Default)]
struct Evaluations(Vec<String>);

impl Emitter for Evaluations {
    fn append(&mut self, _text: &str) {}

    fn emit_variable(&mut self, _v: &Variable) {}

    fn emit_variable_state_condition(&mut self, _v: &Variable, _state: usize) {}

    fn emit_binary_operator(&mut self, _op: Operator) {}

    fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>) {
        self.0.push(format!("{} => {}", name, expression));
    }
}

fn quiet() -> CompilerOptions {
    CompilerOptions {
        emit_comments: false,
        ..CompilerOptions::default()
    }
}

fn machine(options: CompilerOptions, guards: &[&str]) -> StateMachine {
    let mut sm = StateMachine::with_options(options);
    sm.add_simple_type("State", &["a", "b", "c"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty.clone()).unwrap();
    sm.add_variable("t", ty).unwrap();

    let c = sm
        .transition_condition("s", &["a"], &["b"])
        .unwrap()
        .and(sm.state_condition("t", &["b"]).unwrap());
    sm.add_trigger("e", c, vec![]).unwrap();

    for &method in guards {
        let g = sm
            .transition_condition("s", &["*"], &["b"])
            .unwrap()
            .and(sm.state_condition("t", &["b"]).unwrap());
        sm.add_guard(g, None, None, vec![Effect::Call(method.into())]).unwrap();
    }
    sm
}

#[test]
fn test_code_labels() {
    let mut sm = machine(quiet(), &["m1"]);
    sm.calculate().unwrap();

    let event = sm.event("e").unwrap();
    let mut labels = LabelScheduler::new(sm.algebra(), event.modified_variables());
    let effects = labels.schedule_effects(&event.effects_after);
    let mut out = Evaluations::default();
    labels.emit(&mut out, Stage::PRE);

    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].effect.uid(), "CALL m1");
    assert_eq!(sm.algebra().display(effects[0].condition).to_string(), "<_c0><_c1>");
    assert_eq!(out.0, vec!["_c0 => s(a)", "_c1 => t(b)"]);
}

#[test]
fn test_shared_condition_is_evaluated_once() {
    let mut sm = machine(quiet(), &["m1", "m2"]);
    let mut out = PseudoCode::new();
    generate(&mut sm, &mut out).unwrap();

    let expected = [
        "PROCEDURE e",
        "BEGIN",
        "   SET _c0 = s(a)",
        "   SET _c1 = t(b)",
        "   SET _c2 = _c0 AND _c1",
        "   IF _c2 THEN",
        "   BEGIN",
        "      SET s(b)",
        "   END",
        "   IF _c2 THEN",
        "   BEGIN",
        "      CALL m1",
        "   END",
        "   IF _c2 THEN",
        "   BEGIN",
        "      CALL m2",
        "   END",
        "END",
    ];
    assert_eq!(out.as_str().lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_post_stage_labels() {
    let mut sm = StateMachine::with_options(quiet());
    sm.add_simple_type("State", &["a", "b", "c"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty.clone()).unwrap();
    sm.add_variable("t", ty).unwrap();

    // two disjoint triggers of one event, modifying different variables
    let c = sm
        .transition_condition("s", &["a"], &["b"])
        .unwrap()
        .and(sm.state_condition("t", &["c"]).unwrap());
    sm.add_trigger("e", c, vec![]).unwrap();
    let c = sm
        .transition_condition("t", &["a"], &["b"])
        .unwrap()
        .and(sm.state_condition("s", &["c"]).unwrap());
    sm.add_trigger("e", c, vec![]).unwrap();

    let g = sm
        .state_condition("s", &["b"])
        .unwrap()
        .and(sm.state_condition("t", &["c"]).unwrap());
    sm.add_guard(g, Some(GuardKind::Enter), None, vec![Effect::Call("q".into())])
        .unwrap();

    let mut out = PseudoCode::new();
    generate(&mut sm, &mut out).unwrap();

    let expected = [
        "PROCEDURE e",
        "BEGIN",
        "   SET _c0 = s(a)",
        "   SET _c1 = t(c)",
        "   SET _c3 = s(c)",
        "   SET _c4 = t(a)",
        "   IF _c0 AND _c1 THEN",
        "   BEGIN",
        "      SET s(b)",
        "   END",
        "   IF _c3 AND _c4 THEN",
        "   BEGIN",
        "      SET t(b)",
        "   END",
        "   SET _c6 = t(c)",
        "   IF _c0 AND _c1 AND _c6 THEN",
        "   BEGIN",
        "      CALL q",
        "   END",
        "END",
    ];
    assert_eq!(out.as_str().lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_comments() {
    let mut sm = machine(CompilerOptions::default(), &["m1"]);
    let mut out = PseudoCode::new();
    generate(&mut sm, &mut out).unwrap();

    let text = out.as_str();
    assert!(text.contains("/* stage 0 conditions */"));
    assert!(text.contains("/* TRANSITION G1 "));
    assert!(text.contains("CALL m1"));
}
