//! Pseudo code output.
//!
//! ```text
//! PROCEDURE e
//! BEGIN
//!    SET _c0 = s(a)
//!    IF _c0 THEN
//!    BEGIN
//!       SET s(b)
//!    END
//! END
//! ```

use crate::effect::Effect;
use crate::emit::{Emitter, Expression, Operator, Target};
use crate::variable::Variable;

/// Line-oriented text buffer with block indentation.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    text: String,
    indent: usize,
    step: usize,
    line_open: bool,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl CodeWriter {
    pub fn new(step: usize) -> Self {
        Self {
            text: String::new(),
            indent: 0,
            step,
            line_open: false,
        }
    }

    pub fn append(&mut self, text: &str) {
        if !self.line_open {
            self.text.extend(std::iter::repeat(' ').take(self.indent * self.step));
            self.line_open = true;
        }
        self.text.push_str(text);
    }

    pub fn append_line(&mut self, text: &str) {
        if !text.is_empty() {
            self.append(text);
        }
        self.end_line();
    }

    pub fn end_line(&mut self) {
        self.text.push('\n');
        self.line_open = false;
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// # Panics
    ///
    /// Panics if there is no open indentation level.
    pub fn unindent(&mut self) {
        assert!(self.indent > 0, "unbalanced block");
        self.indent -= 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// A [`Target`] writing structured pseudo code.
#[derive(Debug, Clone, Default)]
pub struct PseudoCode {
    writer: CodeWriter,
}

impl PseudoCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        self.writer.as_str()
    }

    pub fn into_string(self) -> String {
        self.writer.into_string()
    }
}

impl Emitter for PseudoCode {
    fn append(&mut self, text: &str) {
        self.writer.append(text);
    }

    fn emit_variable(&mut self, v: &Variable) {
        self.writer.append(&v.name);
    }

    fn emit_variable_state_condition(&mut self, v: &Variable, state: usize) {
        self.writer.append(&format!("{}({})", v.name, v.state_name(state)));
    }

    fn emit_binary_operator(&mut self, op: Operator) {
        self.writer.append(match op {
            Operator::And => " AND ",
            Operator::Or => " OR ",
        });
    }

    fn emit_code_label_assignment(&mut self, name: &str, expression: Expression<'_>) {
        self.writer.append(&format!("SET {} = ", name));
        expression.emit(self);
        self.writer.end_line();
    }
}

impl Target for PseudoCode {
    fn begin_handler(&mut self, event: &str) {
        self.writer.append_line(&format!("PROCEDURE {}", event));
    }

    fn end_handler(&mut self, _event: &str) {}

    fn emit_if_header(&mut self, condition: Expression<'_>) {
        self.writer.append("IF ");
        condition.emit(self);
        self.writer.append(" THEN");
        self.writer.end_line();
    }

    fn enter_block(&mut self) {
        self.writer.append_line("BEGIN");
        self.writer.indent();
    }

    fn leave_block(&mut self) {
        self.writer.unindent();
        self.writer.append_line("END");
    }

    fn emit_effect(&mut self, effect: &Effect) {
        self.writer.append_line(&effect.to_string());
    }

    fn emit_variable_assignment(&mut self, v: &Variable, state: usize) {
        let value = if v.is_boolean() {
            format!("SET {} = {}", v.name, state)
        } else {
            format!("SET {}({})", v.name, v.state_name(state))
        };
        self.writer.append_line(&value);
    }

    fn comment(&mut self, text: Option<&str>) {
        match text {
            Some(text) => self.writer.append_line(&format!("/* {} */", text)),
            None => self.writer.end_line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::algebra::Algebra;
    use crate::variable::StateType;

    #[test]
    fn test_indentation() {
        let mut w = CodeWriter::new(2);
        w.append_line("BEGIN");
        w.indent();
        w.append("A");
        w.append("B");
        w.end_line();
        w.unindent();
        w.append_line("END");
        assert_eq!(w.as_str(), "BEGIN\n  AB\nEND\n");
    }

    #[test]
    #[should_panic(expected = "unbalanced block")]
    fn test_unbalanced_block() {
        CodeWriter::default().unindent();
    }

    #[test]
    fn test_statements() {
        let alg = Algebra::new();
        let s = alg.add_variable("s", StateType::simple("S", ["a", "b"]));
        let f = alg.add_variable("f", StateType::Boolean);
        let mut out = PseudoCode::new();
        let g = alg.or(alg.state(s, 0), alg.state(f, 1));
        out.emit_if_header(Expression::new(&alg, g));
        out.enter_block();
        out.emit_variable_assignment(&alg.variable(s), 1);
        out.emit_variable_assignment(&alg.variable(f), 0);
        out.emit_effect(&Effect::Send("done".into()));
        out.leave_block();
        assert_eq!(
            out.as_str(),
            "IF s(a) OR f THEN\nBEGIN\n   SET s(b)\n   SET f = 0\n   SEND done\nEND\n"
        );
    }
}
