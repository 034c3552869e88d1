//! Parser-stage error type.

use kc_util::Span;
use kc_lex::TokenKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{span}: expected {expected}, found {found:?} {found_lexeme:?}")]
    UnexpectedToken {
        span: Span,
        expected: String,
        found: TokenKind,
        found_lexeme: String,
    },

    #[error("{span}: unknown operator token {lexeme:?}")]
    UnknownOperator { span: Span, lexeme: String },

    #[error("{span}: mixing operator classes without parentheses")]
    MixedOperatorClasses { span: Span },

    #[error("{span}: duplicate parameter name {name:?}")]
    DuplicateParam { span: Span, name: String },

    #[error("{span}: unexpected end of input while expecting {expected}")]
    UnexpectedEof { span: Span, expected: String },

    #[error("output stack had {0} elements at the end of a binary expression, expected 1")]
    MalformedBinaryExpr(usize),
}
