//! Two-stage code label scheduling.
//!
//! A [`LabelScheduler`] lives for the code generation of one event handler. It rewrites
//! conditions into *label space*, where every elementary input and every compound subterm
//! is represented by a [`CodeLabel`], so that equal subterms map to the same label. The
//! conditions are then scheduled, and labels that are used often enough are evaluated once
//! into a temporary of the generated code:
//!
//! | Label | Evaluated when scheduled |
//! |-------|--------------------------|
//! | elementary input | at least once |
//! | compound subterm | at least twice |
//!
//! Every other label is inlined wherever it is used.
//!
//! Labels have a [`Stage`]. Stage [`PRE`][Stage::PRE] labels read the state before the
//! handler applies its transitions, stage [`POST`][Stage::POST] labels read it afterwards.
//! An input of a variable the event never modifies has the same value in both stages and
//! always becomes a stage `PRE` label.
//!
//! All gates created while the scheduler is alive are discarded with it.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use log::debug;

use crate::algebra::{Algebra, CacheScope};
use crate::effect::{Effect, EffectsCollection};
use crate::emit::{Emitter, Expression};
use crate::gate::{Gate, Wire};
use crate::reference::GateRef;
use crate::types::{LabelId, Stage, VarId};

/// A named temporary of the generated code.
#[derive(Debug, Clone)]
pub struct CodeLabel {
    pub id: LabelId,
    pub stage: Stage,
    /// The expression the label stands for, itself in label space.
    pub original: GateRef,
    /// The input gate referring to the label.
    pub gate: GateRef,
    pub schedule_count: usize,
    pub evaluated: bool,
}

impl CodeLabel {
    pub fn name(&self) -> String {
        self.id.name()
    }
}

/// An effect together with the condition it fires under, in label space.
#[derive(Debug, Clone)]
pub struct ScheduledEffect {
    pub effect: Effect,
    pub sources: Vec<String>,
    pub condition: GateRef,
}

pub struct LabelScheduler<'a> {
    alg: &'a Algebra,
    labels: Vec<CodeLabel>,
    keys: HashMap<(Stage, GateRef), LabelId>,
    gatemap: HashMap<GateRef, LabelId>,
    queue: Vec<LabelId>,
    stage: Stage,
    modified: BTreeSet<VarId>,
    nested: bool,
    _scope: CacheScope<'a>,
}

impl<'a> LabelScheduler<'a> {
    /// Opens a scheduler for a handler that modifies `modified`.
    pub fn new(alg: &'a Algebra, modified: impl IntoIterator<Item = VarId>) -> Self {
        let scope = alg.scope();
        debug!("label scope opened at depth {}", scope.depth());
        Self {
            alg,
            labels: Vec::new(),
            keys: HashMap::new(),
            gatemap: HashMap::new(),
            queue: Vec::new(),
            stage: Stage::PRE,
            modified: modified.into_iter().collect(),
            nested: true,
            _scope: scope,
        }
    }

    /// Whether scheduling a compound label also schedules its constituents.
    pub fn with_nesting(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn labels(&self) -> &[CodeLabel] {
        &self.labels
    }

    pub fn label(&self, id: LabelId) -> &CodeLabel {
        &self.labels[id.index()]
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn next_stage(&mut self) -> Stage {
        self.stage = self.stage.next();
        self.stage
    }

    /// Rewrites `g` into label space, creating labels for all its subterms.
    pub fn convert_to_gate(&mut self, stage: Stage, g: GateRef) -> GateRef {
        let alg = self.alg;
        let g = alg.simplify(g);
        if alg.is_fixed(g) || alg.as_label(g).is_some() {
            return g;
        }
        let r = self.make_labels(stage, g);
        debug!("convert {} {} => {}", stage, alg.display(g), alg.display(r));
        r
    }

    fn make_labels(&mut self, stage: Stage, g: GateRef) -> GateRef {
        let alg = self.alg;
        match alg.node(g) {
            Gate::Fixed(_) => g,
            Gate::Input(input) => match input.wire {
                Wire::Label(_) => g,
                Wire::State { var, .. } => {
                    let id = self.leaf_label(stage, var, g);
                    self.labels[id.index()].gate
                }
            },
            gate @ (Gate::And(_) | Gate::Or(_)) => {
                let replaced: Vec<GateRef> = gate
                    .children()
                    .iter()
                    .map(|&c| self.make_labels(stage, c))
                    .collect();
                let r = alg.compose(gate.kind(), replaced);
                if alg.kind(r).is_logical() {
                    let at = self.max_stage(r);
                    self.add_label(at, r);
                }
                r
            }
        }
    }

    fn leaf_label(&mut self, stage: Stage, var: VarId, g: GateRef) -> LabelId {
        if stage > Stage::PRE && !self.modified.contains(&var) {
            // unchanged by the handler, the stage PRE value is still valid
            let id = self.add_label(Stage::PRE, g);
            let target = self.labels[id.index()].gate;
            self.set_alias(stage, g, target);
            return id;
        }
        self.add_label(stage, g)
    }

    fn max_stage(&self, r: GateRef) -> Stage {
        self.alg
            .inputs(r)
            .into_iter()
            .filter_map(|i| i.as_label())
            .map(|l| self.labels[l.index()].stage)
            .max()
            .unwrap_or(Stage::PRE)
    }

    fn add_label(&mut self, stage: Stage, original: GateRef) -> LabelId {
        if let Some(&id) = self.keys.get(&(stage, original)) {
            return id;
        }
        let id = LabelId::new(self.labels.len() as u32);
        let gate = self.alg.label(id);
        debug!("{} insert {} = {}", stage, id, self.alg.display(original));
        self.labels.push(CodeLabel {
            id,
            stage,
            original,
            gate,
            schedule_count: 0,
            evaluated: false,
        });
        self.keys.insert((stage, original), id);
        self.gatemap.entry(gate).or_insert(id);
        // elementary inputs read different values in different stages
        if self.alg.kind(original).is_logical() {
            self.gatemap.entry(original).or_insert(id);
        }
        id
    }

    /// Makes `e` at `stage` resolve to the label whose gate is `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r` is not known to the scheduler.
    pub fn set_alias(&mut self, stage: Stage, e: GateRef, r: GateRef) {
        let e = self.alg.simplify(e);
        let Some(&id) = self.gatemap.get(&r) else {
            panic!("label for gate {} not found", self.alg.display(r));
        };
        self.keys.entry((stage, e)).or_insert(id);
    }

    /// Counts one use of `g` and of everything it is built from.
    pub fn schedule(&mut self, g: GateRef) {
        let alg = self.alg;
        if alg.is_fixed(g) {
            return;
        }
        let g = alg.simplify(g);
        match self.gatemap.get(&g) {
            Some(&id) => self.schedule_label(id),
            None => {
                for &c in alg.node(g).children() {
                    self.schedule(c);
                }
            }
        }
    }

    fn schedule_label(&mut self, id: LabelId) {
        let label = &mut self.labels[id.index()];
        label.schedule_count += 1;
        if label.schedule_count > 1 {
            return;
        }
        let original = label.original;
        if self.nested {
            for &c in self.alg.node(original).children() {
                self.schedule(c);
            }
        }
        self.queue.push(id);
    }

    pub fn should_evaluate(&self, id: LabelId) -> bool {
        let label = &self.labels[id.index()];
        if self.alg.kind(label.original).is_logical() {
            label.schedule_count > 1
        } else {
            label.schedule_count > 0
        }
    }

    /// Emits the assignments of all queued labels up to `stage`.
    pub fn emit<E: Emitter + ?Sized>(&mut self, out: &mut E, stage: Stage) {
        let labels = &self.labels;
        let pending: Vec<LabelId> = self
            .queue
            .iter()
            .copied()
            .filter(|id| labels[id.index()].stage <= stage)
            .collect();
        self.queue.retain(|id| labels[id.index()].stage > stage);
        for id in pending {
            if self.should_evaluate(id) {
                self.evaluate(id, out);
            }
        }
    }

    fn evaluate<E: Emitter + ?Sized>(&mut self, id: LabelId, out: &mut E) {
        if self.labels[id.index()].evaluated {
            return;
        }
        let alg = self.alg;
        let original = self.labels[id.index()].original;

        // constituents evaluated on their own come first
        for d in alg.descendants(original) {
            if let Some(&k) = self.gatemap.get(&d) {
                if k != id && !self.labels[k.index()].evaluated && self.should_evaluate(k) {
                    self.evaluate(k, out);
                }
            }
        }

        let name = id.name();
        debug!("emit {} = {}", name, alg.display(original));
        out.emit_code_label_assignment(&name, Expression::with_labels(alg, original, self));
        self.labels[id.index()].evaluated = true;
    }

    /// Replaces `g` by its label if that label has been evaluated.
    pub fn replace_with_label_if(&self, g: GateRef) -> GateRef {
        let g = self.alg.simplify(g);
        match self.gatemap.get(&g) {
            Some(&id) if self.labels[id.index()].evaluated => self.labels[id.index()].gate,
            _ => g,
        }
    }

    /// The gate to emit for `g`: evaluated labels by name, all others by their expression.
    pub(crate) fn resolve(&self, g: GateRef) -> GateRef {
        let mut g = g;
        while let Some(id) = self.alg.as_label(g) {
            let label = &self.labels[id.index()];
            if label.evaluated {
                return g;
            }
            g = label.original;
        }
        self.replace_with_label_if(g)
    }

    pub fn expression(&self, g: GateRef) -> Expression<'_> {
        Expression::with_labels(self.alg, g, self)
    }

    /// Schedules the conditions of every effect in `effects`.
    ///
    /// The condition of an effect is the sum of its terms, each term being the product of a
    /// stage `PRE` and a stage `POST` condition. Effects that can never fire are skipped.
    pub fn schedule_effects(&mut self, effects: &EffectsCollection) -> Vec<ScheduledEffect> {
        let alg = self.alg;
        let mut result = Vec::new();
        for entry in effects.iter() {
            if alg.is_zero(entry.pre) {
                debug!("effect {} is never active", entry.effect);
                continue;
            }
            let mut sum = alg.zero;
            for term in &entry.terms {
                let pre = self.convert_to_gate(Stage::PRE, term.pre);
                let post = self.convert_to_gate(Stage::POST, term.post);
                sum = alg.or(sum, alg.and(pre, post));
            }
            self.schedule(sum);
            let condition = self.convert_to_gate(Stage::POST, sum);
            debug!("effect {} under {}", entry.effect, alg.display(condition));
            result.push(ScheduledEffect {
                effect: entry.effect.clone(),
                sources: entry.sources.clone(),
                condition,
            });
        }
        result
    }

    /// One line per label: name, stage, evaluation mark, schedule count and expression.
    pub fn debug_string(&self) -> String {
        let mut s = String::new();
        for label in &self.labels {
            let _ = writeln!(
                s,
                " {:<6} {} {} {:>2} {}",
                label.name(),
                label.stage,
                if label.evaluated { '*' } else { ' ' },
                label.schedule_count,
                self.alg.display(label.original)
            );
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::variable::StateType;

    #[derive(Default)]
    struct Assignments(Vec<String>);

    impl Emitter for Assignments {
        fn append(&mut self, text: &str) {
            if let Some(last) = self.0.last_mut() {
                last.push_str(text);
            }
        }

        fn emit_variable(&mut self, v: &crate::variable::Variable) {
            self.append(&v.name.clone());
        }

        fn emit_variable_state_condition(&mut self, v: &crate::variable::Variable, state: usize) {
            let text = format!("{}({})", v.name, v.state_name(state));
            self.append(&text);
        }

        fn emit_binary_operator(&mut self, op: crate::emit::Operator) {
            self.append(match op {
                crate::emit::Operator::And => " AND ",
                crate::emit::Operator::Or => " OR ",
            });
        }

        fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>) {
            self.0.push(format!("{} = ", name));
            expression.emit(self);
        }
    }

    fn machine() -> (Algebra, VarId, VarId) {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let t = alg.add_variable("t", StateType::simple("S", ["a", "b", "c"]));
        (alg, s, t)
    }

    #[test]
    fn test_convert_shares_subterms() {
        let (alg, s, t) = machine();
        let g = alg.and(alg.state(s, 0), alg.state(t, 1));
        let mut labels = LabelScheduler::new(&alg, [s]);
        let r = labels.convert_to_gate(Stage::PRE, g);
        assert_eq!(alg.display(r).to_string(), "<_c0><_c1>");
        assert_eq!(labels.labels().len(), 3);
        assert_eq!(labels.label(LabelId::new(2)).original, r);
        assert_eq!(labels.convert_to_gate(Stage::PRE, g), r);
        assert_eq!(labels.labels().len(), 3);
    }

    #[test]
    fn test_unmodified_inputs_stay_in_first_stage() {
        let (alg, s, t) = machine();
        let mut labels = LabelScheduler::new(&alg, [s]);
        let pre = labels.convert_to_gate(Stage::PRE, alg.state(t, 1));
        let post = labels.convert_to_gate(Stage::POST, alg.state(t, 1));
        assert_eq!(pre, post);
        let post_s = labels.convert_to_gate(Stage::POST, alg.state(s, 1));
        let pre_s = labels.convert_to_gate(Stage::PRE, alg.state(s, 1));
        assert_ne!(pre_s, post_s);
        assert_eq!(labels.label(alg.as_label(post_s).unwrap()).stage, Stage::POST);
    }

    #[test]
    fn test_compound_evaluated_only_when_shared() {
        let (alg, s, t) = machine();
        let g = alg.and(alg.state(s, 0), alg.state(t, 1));
        let mut labels = LabelScheduler::new(&alg, [s]);
        let r = labels.convert_to_gate(Stage::PRE, g);
        labels.schedule(r);
        let compound = LabelId::new(2);
        assert!(!labels.should_evaluate(compound));
        assert!(labels.should_evaluate(LabelId::new(0)));

        labels.schedule(r);
        assert!(labels.should_evaluate(compound));
        assert_eq!(labels.label(LabelId::new(0)).schedule_count, 1);

        let mut out = Assignments::default();
        labels.emit(&mut out, Stage::PRE);
        assert_eq!(out.0, vec!["_c0 = s(a)", "_c1 = t(b)", "_c2 = _c0 AND _c1"]);
        assert_eq!(labels.expression(r).to_string(), "_c2");
    }

    #[test]
    fn test_single_use_compound_is_inlined() {
        let (alg, s, t) = machine();
        let g = alg.or(alg.state(s, 0), alg.state(t, 1));
        let mut labels = LabelScheduler::new(&alg, [s]);
        let r = labels.convert_to_gate(Stage::PRE, g);
        labels.schedule(r);
        let mut out = Assignments::default();
        labels.emit(&mut out, Stage::PRE);
        assert_eq!(out.0, vec!["_c0 = s(a)", "_c1 = t(b)"]);
        assert_eq!(labels.expression(r).to_string(), "_c0 + _c1");
    }

    #[test]
    fn test_stages_are_emitted_separately() {
        let (alg, s, _) = machine();
        let mut labels = LabelScheduler::new(&alg, [s]);
        let pre = labels.convert_to_gate(Stage::PRE, alg.state(s, 0));
        let post = labels.convert_to_gate(Stage::POST, alg.state(s, 1));
        labels.schedule(pre);
        labels.schedule(post);

        let mut out = Assignments::default();
        labels.emit(&mut out, Stage::PRE);
        assert_eq!(out.0, vec!["_c0 = s(a)"]);
        labels.next_stage();
        labels.emit(&mut out, Stage::POST);
        assert_eq!(out.0, vec!["_c0 = s(a)", "_c1 = s(b)"]);
    }

    #[test]
    fn test_scope_discards_label_gates() {
        let (alg, s, t) = machine();
        let before = alg.size();
        {
            let mut labels = LabelScheduler::new(&alg, [s]);
            labels.convert_to_gate(Stage::PRE, alg.and(alg.state(s, 0), alg.state(t, 1)));
            assert!(alg.size() > before);
        }
        assert_eq!(alg.size(), before);
    }

    #[test]
    #[should_panic(expected = "label for gate")]
    fn test_alias_to_unknown_gate() {
        let (alg, s, _) = machine();
        let mut labels = LabelScheduler::new(&alg, [s]);
        labels.set_alias(Stage::POST, alg.state(s, 0), alg.state(s, 1));
    }
}
