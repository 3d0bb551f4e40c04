//! # The state machine model
//!
//! [`StateMachine`] is the entry point of the compiler core. A front end declares types,
//! variables, events, triggers and guards through it, then calls
//! [`calculate`][StateMachine::calculate] to run the dependency analysis and collect the
//! effects of every event. The result feeds the [`CodeGenerator`][crate::generate::CodeGenerator].
//!
//! ## Arm state
//!
//! | State | Entered by | `calculate()` |
//! |-------|------------|---------------|
//! | `Modify` | any edit | analyses the model, moves to `Ready` |
//! | `Ready` | a successful `calculate()` | does nothing |
//! | `Error` | the first recorded error | returns all collected errors |
//!
//! `Error` is permanent. An edit in `Ready` drops all derived data.
//!
//! ## Errors
//!
//! Every failing model operation returns its [`CompileError`] and also records it, with
//! the location set by [`set_location`][StateMachine::set_location], so a single pass can
//! report several problems through [`errors`][StateMachine::errors].
//!
//! ## Example
//!
//! ```
//! use smg_rs::effect::Effect;
//! use smg_rs::machine::StateMachine;
//! use smg_rs::trigger::GuardKind;
//!
//! let mut sm = StateMachine::new();
//! sm.add_simple_type("Door", &["open", "closed"]).unwrap();
//! let door = sm.state_type("Door").unwrap();
//! sm.add_variable("d", door).unwrap();
//!
//! let close = sm.transition_condition("d", &["open"], &["closed"]).unwrap();
//! sm.add_trigger("close", close, vec![]).unwrap();
//! let closed = sm.state_condition("d", &["closed"]).unwrap();
//! sm.add_guard(closed, Some(GuardKind::Enter), None, vec![Effect::Call("lock".into())]).unwrap();
//!
//! sm.calculate().unwrap();
//! assert!(sm.is_ready());
//! assert_eq!(sm.guard("G1").unwrap().triggers.len(), 1);
//! ```

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::algebra::Algebra;
use crate::bitset::StateSet;
use crate::condition::{Condition, Mode, StateCondition};
use crate::effect::Effect;
use crate::error::{CodeLocation, CompileError, CompileErrors, ErrorCode, Result};
use crate::options::CompilerOptions;
use crate::product::{Factor, Group, Product};
use crate::reference::GateRef;
use crate::transition::TransitionSet;
use crate::trigger::{Event, Guard, GuardKind, ProductTrigger, Trigger};
use crate::types::{EventId, GuardId, VarId};
use crate::variable::{StateType, Variable};

/// Lifecycle of the derived data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArmState {
    Modify,
    Ready,
    Error,
}

/// The model of one state machine.
pub struct StateMachine {
    pub(crate) alg: Algebra,
    pub(crate) options: CompilerOptions,
    types: HashMap<String, StateType>,
    variables: HashMap<String, VarId>,
    pub(crate) events: Vec<Event>,
    event_index: HashMap<String, EventId>,
    pub(crate) guards: Vec<Guard>,
    guard_index: HashMap<String, GuardId>,
    triggers: Vec<Trigger>,
    methods: Vec<String>,
    assertions: Vec<GateRef>,
    errors: CompileErrors,
    location: Option<CodeLocation>,
    state: ArmState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        let mut types = HashMap::new();
        types.insert(StateType::BOOLEAN.to_string(), StateType::Boolean);
        types.insert(StateType::BOOLEAN.to_lowercase(), StateType::Boolean);
        Self {
            alg: Algebra::new(),
            options,
            types,
            variables: HashMap::new(),
            events: Vec::new(),
            event_index: HashMap::new(),
            guards: Vec::new(),
            guard_index: HashMap::new(),
            triggers: Vec::new(),
            methods: Vec::new(),
            assertions: Vec::new(),
            errors: CompileErrors::default(),
            location: None,
            state: ArmState::Modify,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// The algebra holding all variables and gates of the model.
    pub fn algebra(&self) -> &Algebra {
        &self.alg
    }

    // ------------------------------------------------------------------------
    // Errors and state

    /// Sets the location attached to errors of subsequent operations.
    pub fn set_location(&mut self, location: Option<CodeLocation>) {
        self.location = location;
    }

    pub fn location(&self) -> Option<&CodeLocation> {
        self.location.as_ref()
    }

    /// Records an error raised on behalf of the model and fails it.
    pub fn report(&mut self, error: CompileError) -> CompileError {
        let error = error.at(self.location.as_ref());
        warn!("{}", error);
        self.errors.push(error.clone());
        self.state = ArmState::Error;
        error
    }

    fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|e| self.report(e))
    }

    pub fn errors(&self) -> &CompileErrors {
        &self.errors
    }

    pub fn state(&self) -> ArmState {
        self.state
    }

    pub fn is_failed(&self) -> bool {
        self.state == ArmState::Error
    }

    pub fn is_ready(&self) -> bool {
        self.state == ArmState::Ready
    }

    fn set_modify(&mut self) {
        if self.state == ArmState::Ready {
            debug!("model modified, dropping derived data");
            self.clear_derived();
            self.state = ArmState::Modify;
        }
    }

    fn clear_derived(&mut self) {
        for guard in &mut self.guards {
            guard.triggers.clear();
        }
        for event in &mut self.events {
            event.clear_derived();
        }
    }

    // ------------------------------------------------------------------------
    // Types and variables

    /// Declares an enumerated state type.
    pub fn add_simple_type(&mut self, name: &str, states: &[&str]) -> Result<()> {
        let result = if self.types.contains_key(name) {
            Err(CompileError::new(
                ErrorCode::TypeRedefinition,
                format!("type '{}' is already defined.", name),
            ))
        } else {
            self.types
                .insert(name.to_string(), StateType::simple(name, states.iter().copied()));
            Ok(())
        };
        self.check(result)
    }

    pub fn state_type(&self, name: &str) -> Result<StateType> {
        self.types.get(name).cloned().ok_or_else(|| {
            CompileError::new(ErrorCode::UndefinedType, format!("type '{}' undefined.", name))
        })
    }

    pub fn add_variable(&mut self, name: &str, ty: StateType) -> Result<VarId> {
        self.set_modify();
        let result = if self.variables.contains_key(name) {
            Err(CompileError::new(
                ErrorCode::VariableRedefinition,
                format!("variable '{}' already exists.", name),
            ))
        } else {
            let v = self.alg.add_variable(name, ty);
            self.variables.insert(name.to_string(), v);
            Ok(v)
        };
        self.check(result)
    }

    pub fn variable(&self, name: &str) -> Result<VarId> {
        self.variables.get(name).copied().ok_or_else(|| {
            CompileError::new(ErrorCode::UndefinedVariable, format!("variable '{}' undefined.", name))
        })
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> Vec<Variable> {
        (0..self.alg.num_vars())
            .map(|i| self.alg.variable(VarId::new(i as u32)))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Condition helpers

    /// `var(states)`, with `*` standing for all states not named on the other side.
    pub fn state_condition(&self, var: &str, states: &[&str]) -> Result<Condition> {
        let v = self.variable(var)?;
        let (states, wildcard) = self.parse_states(v, states)?;
        let mut c = StateCondition::new(v, states);
        c.pre_wildcard = wildcard;
        Ok(Condition::State(c))
    }

    /// `var(pre => post)`, with `*` on either side for the complement of the other.
    pub fn transition_condition(&self, var: &str, pre: &[&str], post: &[&str]) -> Result<Condition> {
        let v = self.variable(var)?;
        let (pre, pre_wildcard) = self.parse_states(v, pre)?;
        let (post, post_wildcard) = self.parse_states(v, post)?;
        let mut c = StateCondition::transition(v, pre, post);
        c.pre_wildcard = pre_wildcard;
        c.post_wildcard = post_wildcard;
        Ok(Condition::State(c))
    }

    fn parse_states(&self, v: VarId, names: &[&str]) -> Result<(Vec<usize>, bool)> {
        if names == ["*"] {
            return Ok((vec![], true));
        }
        let ty = self.alg.variable(v).ty;
        Ok((ty.state_indexes(names.iter().copied())?, false))
    }

    // ------------------------------------------------------------------------
    // Events, methods, assertions

    /// Returns the event with the given name, declaring it on first use.
    pub fn add_event(&mut self, name: &str) -> EventId {
        if let Some(&id) = self.event_index.get(name) {
            return id;
        }
        self.set_modify();
        let id = EventId::new(self.events.len() as u32);
        debug!("add_event({}) => {}", name, id);
        self.events.push(Event::new(id, name));
        self.event_index.insert(name.to_string(), id);
        id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.event_index.get(name).map(|id| &self.events[id.index()])
    }

    pub fn add_method(&mut self, name: &str) {
        if !self.methods.iter().any(|m| m == name) {
            self.methods.push(name.to_string());
        }
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Declares a static condition that always holds.
    pub fn add_assertion(&mut self, condition: Condition) -> Result<()> {
        let result = condition.decompose(&self.alg, Mode::Static);
        let gate = self.check(result)?;
        self.assertions.push(gate);
        Ok(())
    }

    pub fn assertions(&self) -> &[GateRef] {
        &self.assertions
    }

    fn register_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Call(method) => self.add_method(method),
                Effect::Send(event) => {
                    self.add_event(event);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Guards

    /// Declares a guard.
    ///
    /// Unnamed guards are called `G1`, `G2`, ... in declaration order. A condition with
    /// transitions always makes a `TRANSITION` guard; otherwise `kind` applies, `ENTER` by
    /// default.
    pub fn add_guard(
        &mut self,
        condition: Condition,
        kind: Option<GuardKind>,
        name: Option<&str>,
        effects: Vec<Effect>,
    ) -> Result<GuardId> {
        let result = self.try_add_guard(condition, kind, name, effects);
        self.check(result)
    }

    fn try_add_guard(
        &mut self,
        condition: Condition,
        kind: Option<GuardKind>,
        name: Option<&str>,
        effects: Vec<Effect>,
    ) -> Result<GuardId> {
        self.set_modify();
        let name = match name {
            Some(name) if self.guard_index.contains_key(name) => {
                return Err(CompileError::new(
                    ErrorCode::GuardNameReused,
                    format!("guard '{}' already exists.", name),
                ));
            }
            Some(name) => name.to_string(),
            None => format!("G{}", self.guards.len() + 1),
        };

        let alg = &self.alg;
        let kind = if condition.contains_transitions() {
            GuardKind::Transition
        } else {
            kind.unwrap_or_default()
        };
        let pre = condition.decompose(alg, Mode::Pre)?;
        let post = condition.decompose(alg, Mode::Post)?;
        let transitions = condition.transitions(alg)?;
        let source = condition.describe(alg);

        self.register_effects(&effects);
        let id = GuardId::new(self.guards.len() as u32);
        let guard = Guard {
            id,
            name: name.clone(),
            kind,
            pre,
            post,
            transitions,
            effects,
            triggers: Vec::new(),
            source,
        };
        debug!("add_guard({})", guard);
        self.guards.push(guard);
        self.guard_index.insert(name, id);
        Ok(id)
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn guard(&self, name: &str) -> Option<&Guard> {
        self.guard_index.get(name).map(|id| &self.guards[id.index()])
    }

    // ------------------------------------------------------------------------
    // Triggers

    /// Declares a trigger of `event`, declaring the event on first use.
    ///
    /// The precondition is split into product branches, one per disjunct and per pre-state
    /// of every transition variable the disjunct allows several pre-states for. Each branch
    /// must assign a unique post-state to every variable it modifies, and no branch may
    /// overlap a trigger already registered for the event.
    pub fn add_trigger(&mut self, event: &str, condition: Condition, effects: Vec<Effect>) -> Result<()> {
        let result = self.try_add_trigger(event, condition, effects);
        self.check(result)
    }

    fn try_add_trigger(&mut self, event: &str, condition: Condition, effects: Vec<Effect>) -> Result<()> {
        self.set_modify();
        let id = self.add_event(event);
        self.register_effects(&effects);

        let alg = &self.alg;
        let source = format!("{}: {}", event, condition.describe(alg));
        let pre = condition.decompose(alg, Mode::Pre)?;
        let post = condition.decompose(alg, Mode::Post)?;
        let transitions = condition.transitions(alg)?;
        debug!(
            "add_trigger({}) pre {} post {} [{}]",
            source,
            alg.display(pre),
            alg.display(post),
            transitions.describe(alg)
        );

        let mut declared = Trigger {
            event: id,
            pre,
            post,
            transitions: transitions.clone(),
            effects: effects.clone(),
            source: source.clone(),
            branches: 0,
        };

        if alg.is_zero(pre) {
            warn!("SMG033: trigger '{}' precondition is never met.", source);
            self.triggers.push(declared);
            return Ok(());
        }
        if alg.is_one(pre) {
            warn!("SMG034: trigger '{}' precondition is always met.", source);
        }

        let mut added: Vec<ProductTrigger> = Vec::new();
        for product in split_branches(alg, pre, &transitions) {
            let tset = transitions.restrict_to(alg, &product);
            if let Some(v) = tset.variables().find(|&v| tset.get(v).len() > 1) {
                return Err(CompileError::ambiguous_pre(format!(
                    "multiple transitions for variable '{}'.",
                    alg.variable(v).name
                )));
            }
            tset.qualify_for_trigger(alg)?;

            let branch_pre = alg.product_gate(&product);
            let mut branch_post = alg.project(branch_pre, &|v| tset.contains(v), true);
            for t in tset.iter() {
                branch_post = alg.and(branch_post, alg.state(t.var, t.single_post_state()?));
            }
            debug!(
                "branch {} => {} [{}]",
                alg.display(branch_pre),
                alg.display(branch_post),
                tset.describe(alg)
            );

            let branch = ProductTrigger {
                event: id,
                pre: branch_pre,
                post: branch_post,
                transitions: tset,
                effects: effects.clone(),
                guards: Vec::new(),
                source: source.clone(),
            };
            let existing = self.events[id.index()].triggers.iter().chain(added.iter());
            for other in existing {
                check_disjoint(alg, other, &branch)?;
            }
            added.push(branch);
        }

        declared.branches = added.len();
        let event = &mut self.events[id.index()];
        for t in &added {
            event.transitions.extend(t.transitions.iter().cloned());
        }
        event.triggers.extend(added);
        self.triggers.push(declared);
        Ok(())
    }

    /// Triggers as declared.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    // ------------------------------------------------------------------------
    // Calculation

    /// Runs the dependency analysis and fills the effect collections of all events.
    ///
    /// Does nothing on a ready model. Fails with all collected errors on a failed one.
    pub fn calculate(&mut self) -> Result<(), CompileErrors> {
        match self.state {
            ArmState::Ready => return Ok(()),
            ArmState::Error => return Err(self.errors.clone()),
            ArmState::Modify => {}
        }
        info!(
            "calculate: {} variables, {} events, {} guards",
            self.alg.num_vars(),
            self.events.len(),
            self.guards.len()
        );
        self.clear_derived();
        self.calculate_dependencies();
        self.calculate_effects();
        self.state = ArmState::Ready;
        info!("calculate: done, {} gates", self.alg.size());
        self.log_model();
        Ok(())
    }
}

/// Product branches of a trigger precondition.
///
/// Every product of the precondition is split further on each transition variable it
/// allows several states for, so that every branch knows the exact pre-state.
fn split_branches(alg: &Algebra, pre: GateRef, transitions: &TransitionSet) -> Vec<Product> {
    let mut result = Vec::new();
    for product in alg.sop(pre) {
        let mut branches = vec![product];
        for v in transitions.variables() {
            let mut next = Vec::with_capacity(branches.len());
            for branch in branches {
                let split = branch
                    .get(Group::Var(v))
                    .filter(|f| f.allowed.len() > 1)
                    .cloned();
                match split {
                    Some(factor) => {
                        for state in factor.allowed.iter() {
                            let mut p = branch.clone();
                            p.set_factor(Factor::new(
                                factor.group,
                                StateSet::single(state),
                                factor.width,
                                factor.polar,
                            ));
                            next.push(p);
                        }
                    }
                    None => next.push(branch),
                }
            }
            branches = next;
        }
        result.extend(branches);
    }
    result
}

/// Fails if both triggers can fire in a common state.
///
/// Variables the existing trigger does not modify are projected to `1`.
fn check_disjoint(alg: &Algebra, existing: &ProductTrigger, branch: &ProductTrigger) -> Result<()> {
    let both = alg.and(existing.pre, branch.pre);
    let both = alg.project(both, &|v| !existing.transitions.contains(v), true);
    if alg.is_zero(both) {
        Ok(())
    } else {
        Err(CompileError::ambiguous_pre(format!(
            "ambiguous transition conditions [{}, {}].",
            alg.display(existing.pre),
            alg.display(branch.pre)
        )))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn machine() -> StateMachine {
        let mut sm = StateMachine::new();
        sm.add_simple_type("S", &["a", "b", "c"]).unwrap();
        let ty = sm.state_type("S").unwrap();
        sm.add_variable("s", ty).unwrap();
        let boolean = sm.state_type("boolean").unwrap();
        sm.add_variable("f", boolean).unwrap();
        sm
    }

    #[test]
    fn test_declarations() {
        let mut sm = machine();
        assert_eq!(sm.variables().len(), 2);
        assert_eq!(sm.state_type("BOOLEAN").unwrap(), StateType::Boolean);

        let err = sm.add_simple_type("S", &["x"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeRedefinition);
        assert_eq!(err.message, "type 'S' is already defined.");
        assert!(sm.is_failed());
    }

    #[test]
    fn test_variable_errors() {
        let mut sm = machine();
        let err = sm.add_variable("s", StateType::Boolean).unwrap_err();
        assert_eq!(err.message, "variable 's' already exists.");
        assert_eq!(sm.variable("x").unwrap_err().code, ErrorCode::UndefinedVariable);
        assert_eq!(sm.state_type("T").unwrap_err().code, ErrorCode::UndefinedType);
        let bad = sm.state_condition("s", &["z"]).unwrap_err();
        assert_eq!(bad.message, "state 'z' not found in type 'S'.");
    }

    #[test]
    fn test_errors_carry_location() {
        let mut sm = machine();
        sm.set_location(Some(CodeLocation::new(3, 7)));
        let c = sm.state_condition("s", &["a"]).unwrap();
        sm.add_guard(c.clone(), None, Some("g"), vec![]).unwrap();
        sm.add_guard(c, None, Some("g"), vec![]).unwrap_err();
        let errors = sm.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorCode::GuardNameReused));
        assert_eq!(errors.to_string(), "<sourcecode>(3,7): SMG006: guard 'g' already exists.");
        assert!(sm.calculate().is_err());
    }

    #[test]
    fn test_guard_naming_and_kind() {
        let mut sm = machine();
        let c = sm.state_condition("s", &["a"]).unwrap();
        let t = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        sm.add_guard(c.clone(), None, None, vec![]).unwrap();
        sm.add_guard(c, Some(GuardKind::Leave), None, vec![]).unwrap();
        sm.add_guard(t, Some(GuardKind::Leave), None, vec![]).unwrap();
        assert_eq!(sm.guard("G1").unwrap().kind, GuardKind::Enter);
        assert_eq!(sm.guard("G2").unwrap().kind, GuardKind::Leave);
        assert_eq!(sm.guard("G3").unwrap().kind, GuardKind::Transition);
    }

    #[test]
    fn test_effects_register_methods_and_events() {
        let mut sm = machine();
        let t = sm.transition_condition("f", &["0"], &["1"]).unwrap();
        sm.add_trigger(
            "go",
            t,
            vec![Effect::Call("m".into()), Effect::Send("done".into())],
        )
        .unwrap();
        assert_eq!(sm.methods(), &["m".to_string()]);
        assert!(sm.event("done").is_some());
        assert_eq!(sm.event("go").unwrap().triggers.len(), 1);
    }

    #[test]
    fn test_trigger_split_on_pre_states() {
        let mut sm = machine();
        let t = sm.transition_condition("s", &["a", "b"], &["c"]).unwrap();
        sm.add_trigger("e", t, vec![]).unwrap();
        let event = sm.event("e").unwrap();
        let alg = sm.algebra();
        let branches: Vec<String> = event
            .triggers
            .iter()
            .map(|t| format!("{} => {}", alg.display(t.pre), alg.display(t.post)))
            .collect();
        assert_eq!(branches, vec!["s(a) => s(c)", "s(b) => s(c)"]);
        assert_eq!(sm.triggers()[0].branches, 2);
    }

    #[test]
    fn test_trigger_keeps_static_part() {
        let mut sm = machine();
        let s = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        let f = sm.state_condition("f", &["1"]).unwrap();
        sm.add_trigger("e", s.and(f), vec![]).unwrap();
        let t = &sm.event("e").unwrap().triggers[0];
        let alg = sm.algebra();
        assert_eq!(alg.display(t.pre).to_string(), "s(a)f");
        assert_eq!(alg.display(t.post).to_string(), "s(b)f");
    }

    #[test]
    fn test_ambiguous_post() {
        let mut sm = machine();
        let t = sm.transition_condition("s", &["a"], &["b", "c"]).unwrap();
        let err = sm.add_trigger("e", t, vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousPostCondition);
        assert!(sm.is_failed());
    }

    #[test]
    fn test_ambiguous_pre() {
        let mut sm = machine();
        let t1 = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        let t2 = sm.transition_condition("s", &["a"], &["c"]).unwrap();
        let t3 = sm.transition_condition("s", &["b"], &["c"]).unwrap();
        sm.add_trigger("e", t1, vec![]).unwrap();
        sm.add_trigger("e", t3, vec![]).unwrap();
        let err = sm.add_trigger("e", t2, vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousPreCondition);
        assert_eq!(err.message, "ambiguous transition conditions [s(a), s(a)].");
        assert_eq!(sm.event("e").unwrap().triggers.len(), 2);
    }

    #[test]
    fn test_never_met_trigger_is_dropped() {
        let mut sm = machine();
        let t = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        let c = sm.state_condition("s", &["b"]).unwrap();
        sm.add_trigger("e", t.and(c), vec![]).unwrap();
        assert!(sm.event("e").unwrap().triggers.is_empty());
        assert_eq!(sm.triggers().len(), 1);
        assert!(!sm.is_failed());
    }

    #[test]
    fn test_arm_state() {
        let mut sm = machine();
        assert_eq!(sm.state(), ArmState::Modify);
        let t = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        let c = sm.state_condition("s", &["b"]).unwrap();
        sm.add_trigger("e", t, vec![]).unwrap();
        sm.add_guard(c, None, None, vec![Effect::Call("m".into())]).unwrap();
        sm.calculate().unwrap();
        assert!(sm.is_ready());
        assert_eq!(sm.guards()[0].triggers.len(), 1);
        assert_eq!(sm.event("e").unwrap().effects_after.len(), 1);

        // idempotent
        sm.calculate().unwrap();
        assert_eq!(sm.guards()[0].triggers.len(), 1);

        sm.add_event("other");
        assert_eq!(sm.state(), ArmState::Modify);
        assert!(sm.guards()[0].triggers.is_empty());
        assert!(sm.event("e").unwrap().effects_after.is_empty());
        sm.calculate().unwrap();
        assert_eq!(sm.guards()[0].triggers.len(), 1);
    }

    #[test]
    fn test_assertion() {
        let mut sm = machine();
        let c = sm.state_condition("s", &["a", "b"]).unwrap();
        sm.add_assertion(c).unwrap();
        assert_eq!(sm.algebra().display(sm.assertions()[0]).to_string(), "!s(c)");

        let t = sm.transition_condition("s", &["a"], &["b"]).unwrap();
        let err = sm.add_assertion(t).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadCondition);
    }
}
