//! Type-checker-stage error type.

use kc_par::Type;
use kc_util::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("{span}: unbound name {name:?}")]
    UnboundName { span: Span, name: String },

    #[error("{span}: expected an integer operand, found {found:?}")]
    ExpectedInt { span: Span, found: Type },

    #[error("{span}: return type mismatch: declared {declared:?}, body has type {actual:?}")]
    ReturnTypeMismatch { span: Span, declared: Type, actual: Type },

    #[error("{span}: statement discarded a non-unit value of type {found:?}")]
    DiscardedNonUnit { span: Span, found: Type },

    #[error("{span}: callee has non-function type {found:?}")]
    NotCallable { span: Span, found: Type },

    #[error("{span}: wrong number of arguments: expected {expected}, found {found}")]
    ArityMismatch { span: Span, expected: usize, found: usize },

    #[error("{span}: argument {index} has type {found:?}, expected {expected:?}")]
    ArgumentTypeMismatch {
        span: Span,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("{span}: `If` condition has type {found:?}, expected Bool")]
    NonBoolCondition { span: Span, found: Type },

    #[error("{span}: `If` branches disagree: then is {then_ty:?}, else is {else_ty:?}")]
    BranchMismatch { span: Span, then_ty: Type, else_ty: Type },
}
