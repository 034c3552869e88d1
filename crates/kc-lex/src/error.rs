//! Lexer-stage error type.

use thiserror::Error;

/// Everything that can keep the lexer from producing a token stream. The
/// classification rule itself never fails — every byte lands in some
/// token or is skipped as whitespace — so the only failure mode is not
/// being able to read the source file at all (§4.1).
#[derive(Debug, Error)]
pub enum LexError {
    #[error("cannot open source file {0}: {1}")]
    CannotOpen(String, String),
}
