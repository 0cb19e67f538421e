//! Source position information carried on AST nodes.

use serde::{Deserialize, Serialize};

/// A single point in the source text the external parser produced the AST from.
///
/// The core never reads source text itself (parsing is out of scope); it only
/// carries positions through so that [`crate::error::CompileError`] can report
/// where a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Span for synthetic nodes with no source position (e.g. the compiler's own
    /// synthetic if/else child functions).
    pub fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
