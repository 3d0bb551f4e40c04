use smg_rs::effect::Effect;
use smg_rs::machine::StateMachine;
use smg_rs::options::CompilerOptions;
use smg_rs::trigger::GuardKind;

use test_log::test;

fn after_condition(sm: &StateMachine, event: &str, method: &str) -> String {
    let e = sm.event(event).unwrap();
    let entry = e.effects_after.get(&Effect::Call(method.into()).uid()).unwrap();
    sm.algebra().display(entry.pre).to_string()
}

fn before_condition(sm: &StateMachine, event: &str, method: &str) -> String {
    let e = sm.event(event).unwrap();
    let entry = e.effects_before.get(&Effect::Call(method.into()).uid()).unwrap();
    sm.algebra().display(entry.pre).to_string()
}

fn basic(options: CompilerOptions) -> StateMachine {
    let mut sm = StateMachine::with_options(options);
    sm.add_simple_type("State", &["a", "b"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty.clone()).unwrap();
    sm.add_variable("t", ty).unwrap();
    let boolean = sm.state_type("BOOLEAN").unwrap();
    sm.add_variable("f", boolean).unwrap();

    let c = sm.transition_condition("s", &["a"], &["b"]).unwrap();
    sm.add_trigger("e1", c, vec![]).unwrap();
    let c = sm.transition_condition("t", &["a"], &["b"]).unwrap();
    sm.add_trigger("e2", c, vec![]).unwrap();

    let g = sm
        .state_condition("t", &["b"])
        .unwrap()
        .and(sm.state_condition("s", &["b"]).unwrap())
        .and(sm.state_condition("f", &["1"]).unwrap());
    sm.add_guard(g, Some(GuardKind::Enter), None, vec![Effect::Call("q1".into())])
        .unwrap();

    let c = sm.transition_condition("f", &["0"], &["1"]).unwrap();
    sm.add_trigger("e4", c, vec![]).unwrap();
    sm
}

#[test]
fn test_basic() {
    let mut sm = basic(CompilerOptions::default());
    sm.calculate().unwrap();

    assert_eq!(after_condition(&sm, "e1", "q1"), "s(a)t(b)f");
    assert_eq!(after_condition(&sm, "e2", "q1"), "s(b)t(a)f");
    assert_eq!(after_condition(&sm, "e4", "q1"), "s(b)t(b)!f");
}

#[test]
fn test_without_join() {
    let mut sm = basic(CompilerOptions {
        trigger_join: false,
        ..CompilerOptions::default()
    });
    sm.calculate().unwrap();

    // the precondition is the trigger's own, the guard stays on the post-state
    assert_eq!(after_condition(&sm, "e1", "q1"), "s(a)");
    let e = sm.event("e1").unwrap();
    let entry = e.effects_after.get("CALL q1").unwrap();
    assert_eq!(entry.terms.len(), 1);
    assert_eq!(sm.algebra().display(entry.terms[0].post).to_string(), "s(b)t(b)f");
}

#[test]
fn test_enter_leave_guards() {
    let mut sm = StateMachine::new();
    sm.add_simple_type("State", &["a", "b"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    for name in ["s", "t", "x"] {
        sm.add_variable(name, ty.clone()).unwrap();
    }

    let c = sm.transition_condition("s", &["a"], &["b"]).unwrap();
    sm.add_trigger("e1", c, vec![]).unwrap();
    let c = sm.transition_condition("t", &["a"], &["b"]).unwrap();
    sm.add_trigger("e2", c, vec![]).unwrap();
    let c = sm
        .transition_condition("s", &["a"], &["b"])
        .unwrap()
        .and(sm.transition_condition("t", &["a"], &["b"]).unwrap());
    sm.add_trigger("e3", c, vec![]).unwrap();

    let both = |state: &str| {
        sm.state_condition("t", &[state])
            .unwrap()
            .and(sm.state_condition("s", &[state]).unwrap())
    };
    let enter = both("b");
    let leave = both("a");
    sm.add_guard(enter, Some(GuardKind::Enter), None, vec![Effect::Call("q1".into())])
        .unwrap();
    sm.add_guard(leave, Some(GuardKind::Leave), None, vec![Effect::Call("q2".into())])
        .unwrap();

    sm.calculate().unwrap();

    assert_eq!(after_condition(&sm, "e1", "q1"), "s(a)t(b)");
    assert_eq!(after_condition(&sm, "e2", "q1"), "s(b)t(a)");
    assert_eq!(after_condition(&sm, "e3", "q1"), "s(a)t(a)");

    // leaving effects run before the transition
    assert_eq!(before_condition(&sm, "e1", "q2"), "s(a)t(a)");
    assert!(sm.event("e1").unwrap().effects_after.get("CALL q2").is_none());
}

#[test]
fn test_trigger_effects_and_sources() {
    let mut sm = StateMachine::new();
    sm.add_simple_type("State", &["a", "b"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty).unwrap();

    let c = sm.transition_condition("s", &["a"], &["b"]).unwrap();
    sm.add_trigger("go", c, vec![Effect::Call("m".into()), Effect::Send("done".into())])
        .unwrap();
    let g = sm.state_condition("s", &["b"]).unwrap();
    sm.add_guard(g, Some(GuardKind::Enter), Some("G"), vec![Effect::Call("m".into())])
        .unwrap();

    sm.calculate().unwrap();
    assert!(sm.event("done").is_some());

    let e = sm.event("go").unwrap();
    assert_eq!(e.effects_after.len(), 2);
    let m = e.effects_after.get("CALL m").unwrap();
    assert_eq!(m.sources.len(), 2);
    assert!(m.sources[0].starts_with("ENTER G"));
    assert_eq!(sm.algebra().display(m.pre).to_string(), "s(a)");
    assert!(e.effects_after.get("SEND done").is_some());
}
