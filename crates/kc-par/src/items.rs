//! `TranslationUnit`, `DefFn`, and top-level `DeclStmt` (extern
//! declarations). Ported from
//! `original_source/kcccxx/src/parser.cpp`'s `parse_top_level_decl` and
//! `parse_deffn_decl`.

use kc_util::Symbol;
use kc_lex::TokenKind;

use crate::ast::{self, Ast, Decl, DeclId};
use crate::error::ParseError;
use crate::expr::parse_block;
use crate::token_stream::TokenStream;
use crate::types::parse_type;

/// `TranslationUnit := DefFn* Eof`. `DeclStmt`s may also appear at the top
/// level, per the data model's `Decl` category.
pub fn parse_translation_unit(ast: &mut Ast, ts: &mut TokenStream) -> Result<Vec<DeclId>, ParseError> {
    let mut items = Vec::new();
    while !ts.check(TokenKind::Eof) {
        let id = if ts.check_lexeme(TokenKind::CapitalName, "Decl") {
            parse_top_level_decl_stmt(ast, ts)?
        } else {
            parse_deffn(ast, ts)?
        };
        items.push(id);
    }
    Ok(items)
}

fn parse_top_level_decl_stmt(ast: &mut Ast, ts: &mut TokenStream) -> Result<DeclId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "Decl")?;
    let name_tok = ts.expect(TokenKind::SmallName, "a declared name")?;
    ts.expect_lexeme(TokenKind::Symbol, ":")?;
    let ty = parse_type(ts)?;
    Ok(ast.push_decl(Decl::Extern {
        name: Symbol::intern(&name_tok.lexeme),
        ty,
        span,
    }))
}

/// `DefFn := "DefFn" SmallName "(" Params? ")" "->" Type Block`
fn parse_deffn(ast: &mut Ast, ts: &mut TokenStream) -> Result<DeclId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "DefFn")?;
    let name_tok = ts.expect(TokenKind::SmallName, "a function name")?;
    let name = Symbol::intern(&name_tok.lexeme);

    ts.expect(TokenKind::LParen, "(")?;
    let params = parse_params(ts)?;
    ts.expect(TokenKind::RParen, ")")?;

    ts.expect_lexeme(TokenKind::Symbol, "->")?;
    let ret = parse_type(ts)?;

    let body = parse_block(ast, ts)?;

    Ok(ast.push_decl(Decl::DefFn(ast::DefFn {
        name,
        params,
        ret,
        body,
        span,
    })))
}

/// `Params := Param ("," Param)*  Param := SmallName ":" Type`
///
/// Parameter names must be unique within one `DefFn` (§3 invariant).
fn parse_params(ts: &mut TokenStream) -> Result<Vec<ast::Param>, ParseError> {
    let mut params: Vec<ast::Param> = Vec::new();
    while ts.check(TokenKind::SmallName) {
        let name_tok = ts.expect(TokenKind::SmallName, "a parameter name")?;
        let name = Symbol::intern(&name_tok.lexeme);
        if params.iter().any(|(n, _)| *n == name) {
            return Err(ParseError::DuplicateParam {
                span: name_tok.span,
                name: name_tok.lexeme,
            });
        }
        ts.expect_lexeme(TokenKind::Symbol, ":")?;
        let ty = parse_type(ts)?;
        params.push((name, ty));
        if ts.check(TokenKind::Comma) {
            ts.advance();
        } else {
            break;
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, Expr};
    use kc_lex::Lexer;

    fn parse(src: &str) -> (Ast, Vec<DeclId>) {
        let tokens = Lexer::new(src).tokenize();
        let mut ts = TokenStream::new(tokens);
        let mut ast = Ast::new();
        let items = parse_translation_unit(&mut ast, &mut ts).unwrap();
        (ast, items)
    }

    #[test]
    fn parses_nullary_function() {
        let (ast, items) = parse("DefFn main() -> i32 { 42 }");
        assert_eq!(items.len(), 1);
        match ast.decl(items[0]) {
            Decl::DefFn(f) => {
                assert_eq!(f.params.len(), 0);
                assert!(matches!(ast.expr(f.body).kind, Expr::Block { .. }));
            }
            other => panic!("expected DefFn, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_with_params() {
        let (ast, items) = parse("DefFn add(a: i32, b: i32) -> i32 { a + b }");
        match ast.decl(items[0]) {
            Decl::DefFn(f) => assert_eq!(f.params.len(), 2),
            other => panic!("expected DefFn, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_param_name_is_an_error() {
        let tokens = Lexer::new("DefFn f(a: i32, a: i32) -> i32 { a }").tokenize();
        let mut ts = TokenStream::new(tokens);
        let mut ast = Ast::new();
        assert!(matches!(
            parse_translation_unit(&mut ast, &mut ts),
            Err(ParseError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn parses_top_level_extern_decl() {
        let (ast, items) = parse("Decl puts: Fr(i32) -> i32 DefFn main() -> i32 { 0 }");
        assert_eq!(items.len(), 2);
        assert!(matches!(ast.decl(items[0]), Decl::Extern { .. }));
    }

    #[test]
    fn parses_multiple_functions() {
        let (_, items) = parse("DefFn a() -> i32 { 1 } DefFn b() -> i32 { 2 }");
        assert_eq!(items.len(), 2);
    }
}
