//! Source location tracking.
//!
//! KC compiles a single file at a time, so unlike a multi-file compiler's
//! `Span` (byte range + file id, resolved against a `SourceMap`) this is
//! just the 1-based line/column where a token starts — enough to produce a
//! `3:12: unexpected character '#'`-style message without the cost of a
//! full snippet renderer, which is explicitly out of scope (§1).

use std::fmt;

/// A 1-based source location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// A placeholder span for synthesized nodes that never reach a
    /// diagnostic (e.g. nodes built in unit tests).
    pub const DUMMY: Span = Span { line: 0, column: 0 };
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
