//! Lexical analysis for the language's flat, comment-free token grammar.
//!
//! This crate owns the only stage of the pipeline that reads bytes
//! directly off disk. Everything downstream (`kc-par`, `kc-sem`,
//! `kc-gen`) works over the `Token` sequence this crate produces.

mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
