//! Compile errors reported to the user.
//!
//! Every user-facing error carries an [`ErrorCode`], a message and (when known) the
//! [`CodeLocation`] of the construct that caused it. Errors render as `SMG003: message`.
//!
//! Model operations stop at the first error they hit and return it; the
//! [`StateMachine`][crate::machine::StateMachine] collects them into [`CompileErrors`]
//! so one pass can report several problems.

use std::fmt;

use thiserror::Error;

/// Numeric error codes, rendered as `SMGnnn`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    SyntaxError = 1,
    ConditionNeverSatisfied = 2,
    AmbiguousPreCondition = 3,
    AmbiguousPostCondition = 4,
    TypeRedefinition = 5,
    GuardNameReused = 6,
    UndefinedVariable = 7,
    VariableRedefinition = 8,
    InvalidStateName = 9,
    UndefinedType = 10,
    BadCondition = 11,
}

impl ErrorCode {
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMG{:03}", self.code())
    }
}

/// Position in the state machine source.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CodeLocation {
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl CodeLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.as_deref().unwrap_or("<sourcecode>");
        write!(f, "{}({},{})", file, self.line, self.column)
    }
}

/// A single compile error.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("{code}: {message}")]
pub struct CompileError {
    pub code: ErrorCode,
    pub message: String,
    pub location: Option<CodeLocation>,
}

impl CompileError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location unless the error already has one.
    pub fn at(mut self, location: Option<&CodeLocation>) -> Self {
        if self.location.is_none() {
            self.location = location.cloned();
        }
        self
    }

    pub fn bad_condition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadCondition, message)
    }

    pub fn ambiguous_pre(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AmbiguousPreCondition, message)
    }

    pub fn ambiguous_post(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AmbiguousPostCondition, message)
    }
}

/// Aggregate of all errors collected during one compilation.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CompileErrors {
    pub errors: Vec<CompileError>,
}

impl CompileErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }

    pub fn push(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Returns `true` if any collected error has the given code.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &e.location {
                Some(location) => write!(f, "{}: {}", location, e)?,
                None => write!(f, "{}", e)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

impl From<CompileError> for CompileErrors {
    fn from(error: CompileError) -> Self {
        Self { errors: vec![error] }
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
