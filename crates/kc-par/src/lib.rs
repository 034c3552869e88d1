//! Recursive-descent parsing with a shunting-yard sub-parser for binary
//! expressions, producing an arena-owned AST (§4.3).

mod ast;
mod error;
mod expr;
mod items;
mod precedence;
mod token_stream;
mod types;

pub use ast::{Ast, BinOp, Decl, DefFn, Expr, ExprId, ExprNode, DeclId, Param, Type};
pub use error::ParseError;
pub use precedence::{comparable, higher_than, same_class, PrecClass};

use kc_lex::Token;
use token_stream::TokenStream;

/// Parses a complete token stream (already `Eof`-terminated) into an
/// [`Ast`]. `ast.items` holds the translation unit's top-level
/// declarations in source order.
pub fn parse(tokens: Vec<Token>) -> Result<Ast, ParseError> {
    let mut ast = Ast::new();
    let mut ts = TokenStream::new(tokens);
    ast.items = items::parse_translation_unit(&mut ast, &mut ts)?;
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_lex::Lexer;

    #[test]
    fn parses_a_full_translation_unit() {
        let tokens = Lexer::new("DefFn main() -> i32 { 42 }").tokenize();
        let ast = parse(tokens).unwrap();
        assert_eq!(ast.items.len(), 1);
    }

    #[test]
    fn empty_source_is_an_empty_translation_unit() {
        let tokens = Lexer::new("").tokenize();
        let ast = parse(tokens).unwrap();
        assert!(ast.items.is_empty());
    }
}
