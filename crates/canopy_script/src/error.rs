//! Error types for canopy_script.

use canopy_core::TreeError;
use std::fmt;
use thiserror::Error;

/// One positioned compiler message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic positioned at byte `offset` of `source`.
    #[must_use]
    pub fn at<M: Into<String>>(source: &str, offset: usize, message: M) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in source.char_indices() {
            if index >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Source text could not be turned into a loadable component.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_diagnostics(.diagnostics))]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl CompileError {
    #[must_use]
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Creates an error holding a single diagnostic.
    #[must_use]
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

/// Main error type for script hosting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Compilation failed; any prior instance is untouched
    #[error("Compile error:\n{0}")]
    Compile(#[from] CompileError),

    /// A tree operation failed
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A persisted payload does not fit the compiled type
    #[error("Invalid payload for {type_name}: {reason}")]
    Payload { type_name: String, reason: String },

    /// The node is not a script host
    #[error("{path} is not a script host")]
    NotAHost { path: String },
}

/// Result type alias for canopy_script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

impl ScriptError {
    /// Creates a new payload error.
    #[must_use]
    pub fn payload<T: Into<String>, R: Into<String>>(type_name: T, reason: R) -> Self {
        Self::Payload {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
