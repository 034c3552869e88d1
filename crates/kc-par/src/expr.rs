//! Expression grammar: `Block`, `Stmt`, the shunting-yard `BinarySeq`, and
//! primary dispatch. Ported from
//! `original_source/kcccxx/src/parser.cpp`'s `parse_block_expr`,
//! `parse_stmt(_seq)`, `parse_binary_expr_seq`, and `parse_primary_expr`.

use kc_util::{Span, Symbol};
use kc_lex::TokenKind;

use crate::ast::{Ast, BinOp, Expr, ExprId};
use crate::error::ParseError;
use crate::precedence::{comparable, higher_than, is_left_associative, same_class};
use crate::token_stream::TokenStream;
use crate::types::parse_type;

pub fn parse_block(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let span = ts.peek().span;
    ts.expect(TokenKind::LBrace, "{")?;
    let stmts = parse_stmt_seq(ast, ts)?;
    ts.expect(TokenKind::RBrace, "}")?;
    Ok(ast.push_expr(Expr::Block { stmts }, span))
}

fn parse_stmt_seq(ast: &mut Ast, ts: &mut TokenStream) -> Result<Vec<ExprId>, ParseError> {
    let mut seq = vec![parse_stmt(ast, ts)?];
    while ts.check(TokenKind::Semicolon) {
        ts.advance();
        seq.push(parse_stmt(ast, ts)?);
    }
    Ok(seq)
}

fn parse_stmt(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let tok = ts.peek();
    if tok.kind == TokenKind::CapitalName && tok.lexeme == "Let" {
        return parse_let_stmt(ast, ts);
    }
    if tok.kind == TokenKind::CapitalName && tok.lexeme == "Decl" {
        return parse_local_decl_stmt(ast, ts);
    }
    parse_expr(ast, ts)
}

fn parse_let_stmt(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "Let")?;
    let name_tok = ts.expect(TokenKind::SmallName, "a binding name")?;
    ts.expect_lexeme(TokenKind::Symbol, "=")?;
    let init = parse_expr(ast, ts)?;
    Ok(ast.push_expr(
        Expr::Let {
            name: Symbol::intern(&name_tok.lexeme),
            init,
        },
        span,
    ))
}

fn parse_local_decl_stmt(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "Decl")?;
    let name_tok = ts.expect(TokenKind::SmallName, "a declared name")?;
    ts.expect_lexeme(TokenKind::Symbol, ":")?;
    let ty = parse_type(ts)?;
    Ok(ast.push_expr(
        Expr::LocalDecl {
            name: Symbol::intern(&name_tok.lexeme),
            ty,
        },
        span,
    ))
}

pub fn parse_expr(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    parse_binary_expr_seq(ast, ts)
}

fn token_to_binop(lexeme: &str) -> Option<BinOp> {
    match lexeme {
        "+" => Some(BinOp::Plus),
        "-" => Some(BinOp::Minus),
        "*" => Some(BinOp::Mult),
        "/" => Some(BinOp::Div),
        "=" => Some(BinOp::Eq),
        "<" => Some(BinOp::Lt),
        ">" => Some(BinOp::Gt),
        _ => None,
    }
}

/// Shunting-yard binary expression parsing (§4.3). Maintains an output
/// stack of operand expressions and an operator stack; combines eagerly
/// whenever the stack top binds at least as tight as the incoming
/// operator, and aborts with `MixedOperatorClasses` the moment two
/// adjacent operators are not `comparable`.
fn parse_binary_expr_seq(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let mut out_stack: Vec<ExprId> = vec![parse_primary_expr(ast, ts)?];
    let mut op_stack: Vec<(BinOp, Span)> = Vec::new();

    while ts.peek().kind == TokenKind::Symbol {
        let Some(op) = token_to_binop(&ts.peek().lexeme) else {
            break;
        };
        let op_span = ts.peek().span;
        ts.advance();

        while let Some(&(top, top_span)) = op_stack.last() {
            if !comparable(top, op) {
                let _ = top_span;
                return Err(ParseError::MixedOperatorClasses { span: op_span });
            }
            if higher_than(op, top) || (same_class(op, top) && !is_left_associative(op)) {
                break;
            }
            op_stack.pop();
            combine_top(ast, &mut out_stack, top, top_span)?;
        }

        op_stack.push((op, op_span));
        out_stack.push(parse_primary_expr(ast, ts)?);
    }

    while let Some((op, span)) = op_stack.pop() {
        combine_top(ast, &mut out_stack, op, span)?;
    }

    if out_stack.len() != 1 {
        return Err(ParseError::MalformedBinaryExpr(out_stack.len()));
    }
    Ok(out_stack.pop().unwrap())
}

fn combine_top(
    ast: &mut Ast,
    out_stack: &mut Vec<ExprId>,
    op: BinOp,
    span: Span,
) -> Result<(), ParseError> {
    let rhs = out_stack.pop().ok_or(ParseError::MalformedBinaryExpr(0))?;
    let lhs = out_stack.pop().ok_or(ParseError::MalformedBinaryExpr(1))?;
    out_stack.push(ast.push_expr(Expr::Binary { op, lhs, rhs }, span));
    Ok(())
}

fn parse_primary_expr(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let tok = ts.peek().clone();
    match tok.kind {
        TokenKind::Digit => parse_integer_literal(ast, ts),
        TokenKind::LParen => {
            ts.advance();
            let inner = parse_expr(ast, ts)?;
            ts.expect(TokenKind::RParen, ")")?;
            Ok(inner)
        }
        TokenKind::LBrace => parse_block(ast, ts),
        TokenKind::CapitalName => match tok.lexeme.as_str() {
            "True" => {
                ts.advance();
                Ok(ast.push_expr(Expr::BoolLiteral(true), tok.span))
            }
            "False" => {
                ts.advance();
                Ok(ast.push_expr(Expr::BoolLiteral(false), tok.span))
            }
            "If" => parse_if_expr(ast, ts),
            "Oc" => parse_octet_seq_literal(ast, ts),
            _ => Err(ParseError::UnexpectedToken {
                span: tok.span,
                expected: "a primary expression".to_string(),
                found: tok.kind,
                found_lexeme: tok.lexeme,
            }),
        },
        TokenKind::SmallName => parse_ident_expr(ast, ts),
        _ => Err(ParseError::UnexpectedToken {
            span: tok.span,
            expected: "a primary expression".to_string(),
            found: tok.kind,
            found_lexeme: tok.lexeme,
        }),
    }
}

fn parse_integer_literal(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let tok = ts.expect(TokenKind::Digit, "an integer literal")?;
    let value: i32 = tok.lexeme.parse().map_err(|_| ParseError::UnexpectedToken {
        span: tok.span,
        expected: "an integer literal fitting in signed 32 bits".to_string(),
        found: TokenKind::Digit,
        found_lexeme: tok.lexeme.clone(),
    })?;
    Ok(ast.push_expr(Expr::IntegerLiteral(value), tok.span))
}

fn parse_ident_expr(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let tok = ts.expect(TokenKind::SmallName, "an identifier")?;
    let var = ast.push_expr(Expr::VarRef(Symbol::intern(&tok.lexeme)), tok.span);
    if !ts.check(TokenKind::LParen) {
        return Ok(var);
    }

    ts.advance();
    let mut args = Vec::new();
    while !ts.check(TokenKind::RParen) {
        if !args.is_empty() {
            ts.expect(TokenKind::Comma, ",")?;
        }
        args.push(parse_expr(ast, ts)?);
    }
    ts.expect(TokenKind::RParen, ")")?;
    Ok(ast.push_expr(
        Expr::Call {
            callee: var,
            args,
        },
        tok.span,
    ))
}

fn parse_if_expr(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "If")?;
    let cond = parse_expr(ast, ts)?;
    ts.expect_lexeme(TokenKind::CapitalName, "Then")?;
    let then_branch = parse_expr(ast, ts)?;
    ts.expect_lexeme(TokenKind::CapitalName, "Else")?;
    let else_branch = parse_expr(ast, ts)?;
    Ok(ast.push_expr(
        Expr::If {
            cond,
            then_branch,
            else_branch,
        },
        span,
    ))
}

/// `"Oc" DoubleQuoted`; the lexeme carries the surrounding quotes
/// (§4.1), stripped here.
fn parse_octet_seq_literal(ast: &mut Ast, ts: &mut TokenStream) -> Result<ExprId, ParseError> {
    let span = ts.peek().span;
    ts.expect_lexeme(TokenKind::CapitalName, "Oc")?;
    let lit = ts.expect(TokenKind::DoubleQuoted, "a double-quoted byte string")?;
    let content = lit.lexeme[1..lit.lexeme.len() - 1].as_bytes().to_vec();
    Ok(ast.push_expr(Expr::OctetSeqLiteral(content), span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_lex::Lexer;

    fn parse_expr_str(src: &str) -> (Ast, ExprId) {
        let tokens = Lexer::new(src).tokenize();
        let mut ts = TokenStream::new(tokens);
        let mut ast = Ast::new();
        let id = parse_expr(&mut ast, &mut ts).unwrap();
        (ast, id)
    }

    fn binop_shape(ast: &Ast, id: ExprId) -> String {
        match &ast.expr(id).kind {
            Expr::Binary { op, lhs, rhs } => {
                format!("({:?} {} {})", op, binop_shape(ast, *lhs), binop_shape(ast, *rhs))
            }
            Expr::IntegerLiteral(v) => v.to_string(),
            Expr::VarRef(s) => s.as_str().to_string(),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn mult_binds_tighter_than_add() {
        let (ast, id) = parse_expr_str("a + b * c");
        assert_eq!(binop_shape(&ast, id), "(Plus a (Mult b c))");
    }

    #[test]
    fn mult_binds_tighter_than_add_reversed() {
        let (ast, id) = parse_expr_str("a * b + c");
        assert_eq!(binop_shape(&ast, id), "(Plus (Mult a b) c)");
    }

    #[test]
    fn same_class_is_left_associative() {
        let (ast, id) = parse_expr_str("a - b - c");
        assert_eq!(binop_shape(&ast, id), "(Minus (Minus a b) c)");
    }

    #[test]
    fn mixing_cmp_with_add_is_a_parse_error() {
        let tokens = Lexer::new("a < b + c").tokenize();
        let mut ts = TokenStream::new(tokens);
        let mut ast = Ast::new();
        assert!(matches!(
            parse_expr(&mut ast, &mut ts),
            Err(ParseError::MixedOperatorClasses { .. })
        ));
    }

    #[test]
    fn chained_comparisons_are_a_parse_error() {
        let tokens = Lexer::new("a < b < c").tokenize();
        let mut ts = TokenStream::new(tokens);
        let mut ast = Ast::new();
        assert!(matches!(
            parse_expr(&mut ast, &mut ts),
            Err(ParseError::MixedOperatorClasses { .. })
        ));
    }

    #[test]
    fn parenthesized_comparison_then_add_is_fine() {
        let (ast, id) = parse_expr_str("(a < b) + c");
        assert_eq!(binop_shape(&ast, id), "(Plus (Lt a b) c)");
    }

    #[test]
    fn call_requires_immediately_following_lparen() {
        let (ast, id) = parse_expr_str("f(a, b)");
        match &ast.expr(id).kind {
            Expr::Call { args, .. } => assert_eq!(args.len(), 2),
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn bare_name_is_not_a_call() {
        let (ast, id) = parse_expr_str("f");
        assert!(matches!(ast.expr(id).kind, Expr::VarRef(_)));
    }

    #[test]
    fn octet_seq_literal_strips_quotes() {
        let (ast, id) = parse_expr_str("Oc\"ab\"");
        match &ast.expr(id).kind {
            Expr::OctetSeqLiteral(bytes) => assert_eq!(bytes, b"ab"),
            other => panic!("expected OctetSeqLiteral, got {other:?}"),
        }
    }

    #[test]
    fn if_then_else_parses() {
        let (ast, id) = parse_expr_str("If a Then b Else c");
        assert!(matches!(ast.expr(id).kind, Expr::If { .. }));
    }

    #[test]
    fn block_with_let_and_trailing_expr() {
        let (ast, id) = parse_expr_str("{ Let y = 1; y }");
        match &ast.expr(id).kind {
            Expr::Block { stmts } => {
                assert_eq!(stmts.len(), 2);
                assert!(matches!(ast.expr(stmts[0]).kind, Expr::Let { .. }));
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }
}
