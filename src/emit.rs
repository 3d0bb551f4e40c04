//! Emission callback protocol.
//!
//! The core never writes target code itself. It walks gates and calls an [`Emitter`] in a
//! fixed order: operands left to right, an operator between two operands, and parentheses
//! around an operand whose operator differs from its parent's. A [`Target`] adds the
//! statement-level hooks the [`CodeGenerator`][crate::generate::CodeGenerator] needs.

use std::fmt;

use crate::algebra::Algebra;
use crate::effect::Effect;
use crate::gate::{Gate, GateKind, Wire};
use crate::label::LabelScheduler;
use crate::reference::GateRef;
use crate::variable::Variable;

/// Binary operator of a logical gate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    fn of(kind: GateKind) -> Self {
        match kind {
            GateKind::And => Operator::And,
            GateKind::Or => Operator::Or,
            _ => panic!("{:?} is not a logical gate kind", kind),
        }
    }
}

/// Receives the pieces of boolean expressions.
pub trait Emitter {
    /// Writes raw text.
    fn append(&mut self, text: &str);

    /// A boolean variable, read as a condition.
    fn emit_variable(&mut self, v: &Variable);

    /// "`v` is in state `state`".
    fn emit_variable_state_condition(&mut self, v: &Variable, state: usize);

    fn emit_binary_operator(&mut self, op: Operator);

    /// Assigns the value of `expression` to the code label `name`.
    fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>);

    fn emit_constant(&mut self, value: bool) {
        self.append(if value { "1" } else { "0" });
    }
}

/// Statement-level hooks used by the code generator.
pub trait Target: Emitter {
    fn begin_handler(&mut self, event: &str);

    fn end_handler(&mut self, event: &str);

    /// Opens a conditional statement; a block follows.
    fn emit_if_header(&mut self, condition: Expression<'_>);

    fn enter_block(&mut self);

    fn leave_block(&mut self);

    fn emit_effect(&mut self, effect: &Effect);

    /// Sets `v` to `state`.
    fn emit_variable_assignment(&mut self, v: &Variable, state: usize);

    /// Writes a comment, or an empty line for `None`.
    fn comment(&mut self, text: Option<&str>);
}

/// A gate ready to be emitted.
///
/// Inside a code generation pass, labels that have been evaluated are emitted by name and
/// all others are replaced by the expression they stand for.
#[derive(Copy, Clone)]
pub struct Expression<'a> {
    alg: &'a Algebra,
    gate: GateRef,
    labels: Option<&'a LabelScheduler<'a>>,
}

impl<'a> Expression<'a> {
    pub fn new(alg: &'a Algebra, gate: GateRef) -> Self {
        Self {
            alg,
            gate,
            labels: None,
        }
    }

    pub(crate) fn with_labels(alg: &'a Algebra, gate: GateRef, labels: &'a LabelScheduler<'a>) -> Self {
        Self {
            alg,
            gate,
            labels: Some(labels),
        }
    }

    pub fn gate(&self) -> GateRef {
        self.gate
    }

    pub fn emit<E: Emitter + ?Sized>(&self, out: &mut E) {
        self.write(self.resolve(self.gate), out);
    }

    fn resolve(&self, g: GateRef) -> GateRef {
        match self.labels {
            Some(labels) => labels.resolve(g),
            None => g,
        }
    }

    fn write<E: Emitter + ?Sized>(&self, g: GateRef, out: &mut E) {
        match self.alg.node(g) {
            Gate::Fixed(value) => out.emit_constant(value),
            Gate::Input(input) => {
                if input.inverted {
                    out.append("!");
                }
                match input.wire {
                    Wire::Label(label) => out.append(&label.name()),
                    Wire::State { var, state } => {
                        let v = self.alg.variable(var);
                        if v.is_boolean() {
                            out.emit_variable(&v);
                        } else {
                            out.emit_variable_state_condition(&v, state as usize);
                        }
                    }
                }
            }
            gate @ (Gate::And(_) | Gate::Or(_)) => {
                let kind = gate.kind();
                for (i, &c) in gate.children().iter().enumerate() {
                    if i > 0 {
                        out.emit_binary_operator(Operator::of(kind));
                    }
                    let c = self.resolve(c);
                    let child = self.alg.kind(c);
                    if child.is_logical() && child != kind {
                        out.append("(");
                        self.write(c, out);
                        out.append(")");
                    } else {
                        self.write(c, out);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = TextEmitter::default();
        self.emit(&mut text);
        write!(f, "{}", text.0)
    }
}

/// Plain text rendering, used for log output.
#[derive(Debug, Default)]
struct TextEmitter(String);

impl Emitter for TextEmitter {
    fn append(&mut self, text: &str) {
        self.0.push_str(text);
    }

    fn emit_variable(&mut self, v: &Variable) {
        self.0.push_str(&v.name);
    }

    fn emit_variable_state_condition(&mut self, v: &Variable, state: usize) {
        self.0.push_str(&format!("{}({})", v.name, v.state_name(state)));
    }

    fn emit_binary_operator(&mut self, op: Operator) {
        if op == Operator::Or {
            self.0.push_str(" + ");
        }
    }

    fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>) {
        self.0.push_str(name);
        self.0.push_str(" = ");
        expression.emit(self);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::variable::StateType;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl Emitter for Calls {
        fn append(&mut self, text: &str) {
            self.0.push(format!("append {}", text));
        }

        fn emit_variable(&mut self, v: &Variable) {
            self.0.push(format!("variable {}", v.name));
        }

        fn emit_variable_state_condition(&mut self, v: &Variable, state: usize) {
            self.0.push(format!("state {} {}", v.name, state));
        }

        fn emit_binary_operator(&mut self, op: Operator) {
            self.0.push(format!("{:?}", op));
        }

        fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>) {
            self.0.push(format!("label {}", name));
            expression.emit(self);
        }
    }

    #[test]
    fn test_callback_order() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let g = alg.and(alg.state(f, 0), alg.or(alg.state(s, 0), alg.state(s, 1)));
        // s(a) + s(b) is !s(c), a single product
        let mut calls = Calls::default();
        Expression::new(&alg, g).emit(&mut calls);
        assert_eq!(calls.0, vec!["append !", "state s 2", "And", "append !", "variable f"]);
    }

    #[test]
    fn test_parenthesized_operand() {
        let alg = Algebra::new();
        let names: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| alg.add_variable(*n, StateType::Boolean))
            .collect();
        let inputs: Vec<_> = names.iter().map(|&v| alg.state(v, 1)).collect();
        let g = alg.or(alg.and(inputs[0], inputs[1]), inputs[2]);
        assert_eq!(Expression::new(&alg, g).to_string(), "(ab) + c");

        let mut calls = Calls::default();
        calls.emit_code_label_assignment("_c0", Expression::new(&alg, g));
        assert_eq!(
            calls.0,
            vec![
                "label _c0",
                "append (",
                "variable a",
                "And",
                "variable b",
                "append )",
                "Or",
                "variable c"
            ]
        );
    }

    #[test]
    fn test_nested_sum_in_product() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b", "c"]));
        let g = alg.or(alg.state(s, 0), alg.state(s, 1));
        assert_eq!(Expression::new(&alg, g).to_string(), "!s(c)");
        assert_eq!(Expression::new(&alg, alg.one).to_string(), "1");
    }
}
