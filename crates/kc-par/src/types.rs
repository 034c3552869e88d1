//! `Type := "i32" | "Bool" | FunctionType` and
//! `FunctionType := "Fr" "(" TypeList? ")" "->" Type`, ported from
//! `original_source/kcccxx/src/parser.cpp`'s `parse_type`/`parse_fn_type`.

use kc_lex::TokenKind;

use crate::ast::Type;
use crate::error::ParseError;
use crate::token_stream::TokenStream;

pub fn parse_type(ts: &mut TokenStream) -> Result<Type, ParseError> {
    let tok = ts.peek().clone();
    match tok.kind {
        TokenKind::SmallName => {
            ts.expect_lexeme(TokenKind::SmallName, "i32")?;
            Ok(Type::IntN(32))
        }
        TokenKind::CapitalName => match tok.lexeme.as_str() {
            "Bool" => {
                ts.advance();
                Ok(Type::Bool)
            }
            "Fr" => parse_fn_type(ts),
            _ => Err(ParseError::UnexpectedToken {
                span: tok.span,
                expected: "a type (`i32`, `Bool`, or `Fr(...)->...`)".to_string(),
                found: tok.kind,
                found_lexeme: tok.lexeme,
            }),
        },
        _ => Err(ParseError::UnexpectedToken {
            span: tok.span,
            expected: "a type (`i32`, `Bool`, or `Fr(...)->...`)".to_string(),
            found: tok.kind,
            found_lexeme: tok.lexeme,
        }),
    }
}

fn parse_fn_type(ts: &mut TokenStream) -> Result<Type, ParseError> {
    ts.expect_lexeme(TokenKind::CapitalName, "Fr")?;
    ts.expect(TokenKind::LParen, "(")?;

    let mut params = Vec::new();
    while !ts.check(TokenKind::RParen) {
        params.push(parse_type(ts)?);
        if ts.check(TokenKind::Comma) {
            ts.advance();
        }
    }
    ts.expect(TokenKind::RParen, ")")?;
    ts.expect_lexeme(TokenKind::Symbol, "->")?;
    let ret = parse_type(ts)?;
    Ok(Type::function(ret, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_lex::Lexer;

    fn parse(src: &str) -> Type {
        let tokens = Lexer::new(src).tokenize();
        let mut ts = TokenStream::new(tokens);
        parse_type(&mut ts).unwrap()
    }

    #[test]
    fn parses_i32() {
        assert_eq!(parse("i32"), Type::IntN(32));
    }

    #[test]
    fn parses_bool() {
        assert_eq!(parse("Bool"), Type::Bool);
    }

    #[test]
    fn parses_nullary_fn_type() {
        assert_eq!(parse("Fr() -> i32"), Type::function(Type::i32(), vec![]));
    }

    #[test]
    fn parses_fn_type_with_params() {
        assert_eq!(
            parse("Fr(i32, Bool) -> i32"),
            Type::function(Type::i32(), vec![Type::i32(), Type::Bool])
        );
    }
}
