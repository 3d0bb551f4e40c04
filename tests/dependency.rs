use smg_rs::machine::StateMachine;
use smg_rs::trigger::GuardKind;

use test_log::test;

fn guard_names(sm: &StateMachine, event: &str, index: usize) -> Vec<String> {
    let e = sm.event(event).unwrap();
    e.triggers[index]
        .guards
        .iter()
        .map(|tg| sm.guards()[tg.guard.index()].name.clone())
        .collect()
}

#[test]
fn test_state_condition_dependencies() {
    let mut sm = StateMachine::new();
    sm.add_simple_type("State", &["A", "B", "C"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty.clone()).unwrap();
    sm.add_variable("t", ty).unwrap();

    let c = sm.transition_condition("s", &["A", "B"], &["C"]).unwrap();
    sm.add_trigger("e1", c, vec![]).unwrap();

    let g1 = sm.state_condition("s", &["A"]).unwrap();
    sm.add_guard(g1, Some(GuardKind::Leave), Some("g1"), vec![]).unwrap();
    let g2 = sm.state_condition("s", &["C"]).unwrap();
    sm.add_guard(g2, Some(GuardKind::Enter), Some("g2"), vec![]).unwrap();

    sm.calculate().unwrap();

    let e = sm.event("e1").unwrap();
    assert_eq!(e.name, "e1");
    assert_eq!(e.triggers.len(), 2);

    let t1 = guard_names(&sm, "e1", 0);
    let t2 = guard_names(&sm, "e1", 1);
    assert_eq!(t1.len(), 2);
    assert!(t1.contains(&"g1".to_string()));
    assert!(t1.contains(&"g2".to_string()));
    assert_eq!(t2, vec!["g2"]);

    assert_eq!(sm.guard("g1").unwrap().triggers.len(), 1);
    assert_eq!(sm.guard("g2").unwrap().triggers.len(), 2);
}

#[test]
fn test_unrelated_variable_does_not_activate() {
    let mut sm = StateMachine::new();
    sm.add_simple_type("State", &["A", "B"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty.clone()).unwrap();
    sm.add_variable("t", ty).unwrap();

    let c = sm.transition_condition("s", &["A"], &["B"]).unwrap();
    sm.add_trigger("e", c, vec![]).unwrap();
    let g = sm.state_condition("t", &["B"]).unwrap();
    sm.add_guard(g, Some(GuardKind::Enter), None, vec![]).unwrap();
    let g = sm.transition_condition("t", &["A"], &["B"]).unwrap();
    sm.add_guard(g, None, None, vec![]).unwrap();

    sm.calculate().unwrap();
    assert!(guard_names(&sm, "e", 0).is_empty());
    assert_eq!(sm.guard("G2").unwrap().kind, GuardKind::Transition);
}

#[test]
fn test_transition_guard() {
    let mut sm = StateMachine::new();
    sm.add_simple_type("State", &["a", "b", "c"]).unwrap();
    let ty = sm.state_type("State").unwrap();
    sm.add_variable("s", ty).unwrap();

    let c = sm.transition_condition("s", &["a"], &["b"]).unwrap();
    sm.add_trigger("ab", c, vec![]).unwrap();
    let c = sm.transition_condition("s", &["c"], &["a"]).unwrap();
    sm.add_trigger("ca", c, vec![]).unwrap();

    // any transition into b
    let g = sm.transition_condition("s", &["*"], &["b"]).unwrap();
    sm.add_guard(g, None, Some("into_b"), vec![]).unwrap();

    sm.calculate().unwrap();
    assert_eq!(guard_names(&sm, "ab", 0), vec!["into_b"]);
    assert!(guard_names(&sm, "ca", 0).is_empty());
}
