//! The structural type checker (§4.4). Traverses the arena-owned AST,
//! decorating every expression's type slot in a side-table (kept separate
//! from the AST per the design note preferring a side-table over a mutable
//! slot, so the tree stays immutable once parsed) and maintaining the
//! lexically scoped environment from `scope.rs`.
//!
//! Ported from `original_source/src/typechecker.cpp`'s `TypeChecker::traverse_*` family:
//! `traverse_tunit` registers each function's type in the *outer* scope
//! only after `traverse_deffn` returns, so a later sibling can call an
//! earlier one but not vice versa — the left-to-right visibility resolution
//! recorded in `DESIGN.md` for the mutual-recursion open question.

use kc_par::{Ast, BinOp, Decl, DeclId, DefFn, Expr, ExprId, Type};
use kc_util::{Idx, Symbol};

use crate::error::TypeError;
use crate::scope::Env;

/// `ExprId -> Type` side-table. After a successful [`check`], every
/// expression node in the `Ast` it was built from has an entry here
/// (§8 invariant 4).
pub struct TypeTable {
    types: Vec<Option<Type>>,
}

impl TypeTable {
    fn new(capacity: usize) -> Self {
        Self {
            types: vec![None; capacity],
        }
    }

    fn set(&mut self, id: ExprId, ty: Type) {
        self.types[id.index()] = Some(ty);
    }

    /// The type of `id`, or `None` if `id` was never visited (which never
    /// happens for a successfully checked program).
    pub fn get(&self, id: ExprId) -> Option<&Type> {
        self.types[id.index()].as_ref()
    }
}

/// Type-checks a full translation unit, returning the decorated type
/// side-table on success.
pub fn check(ast: &Ast) -> Result<TypeTable, TypeError> {
    let mut checker = Checker {
        ast,
        env: Env::new(),
        table: TypeTable::new(ast.exprs.len()),
    };
    checker.check_translation_unit()?;
    Ok(checker.table)
}

struct Checker<'a> {
    ast: &'a Ast,
    env: Env,
    table: TypeTable,
}

impl<'a> Checker<'a> {
    fn check_translation_unit(&mut self) -> Result<(), TypeError> {
        self.env.enter();
        for &decl_id in &self.ast.items {
            self.check_top_level_decl(decl_id)?;
        }
        self.env.exit();
        Ok(())
    }

    fn check_top_level_decl(&mut self, decl_id: DeclId) -> Result<(), TypeError> {
        match self.ast.decl(decl_id) {
            Decl::Extern { name, ty, .. } => {
                self.env.bind(*name, ty.clone());
                Ok(())
            }
            Decl::DefFn(def) => {
                let fnty = self.check_deffn(def)?;
                self.env.bind(def.name, fnty);
                Ok(())
            }
        }
    }

    /// `DefFn(f, params, ret, body)`: push scope, bind each parameter, bind
    /// `f` to its own `FunctionType` (direct recursion), check `body`,
    /// require `body.type == ret`, pop scope.
    fn check_deffn(&mut self, def: &DefFn) -> Result<Type, TypeError> {
        self.env.enter();
        for (name, ty) in &def.params {
            self.env.bind(*name, ty.clone());
        }
        let param_types: Vec<Type> = def.params.iter().map(|(_, ty)| ty.clone()).collect();
        let fnty = Type::function(def.ret.clone(), param_types);
        self.env.bind(def.name, fnty.clone());

        let body_ty = self.check_expr(def.body)?;
        if body_ty != def.ret {
            self.env.exit();
            return Err(TypeError::ReturnTypeMismatch {
                span: self.ast.expr(def.body).span,
                declared: def.ret.clone(),
                actual: body_ty,
            });
        }
        self.env.exit();
        Ok(fnty)
    }

    fn check_expr(&mut self, id: ExprId) -> Result<Type, TypeError> {
        let node = self.ast.expr(id);
        let span = node.span;
        let ty = match &node.kind {
            Expr::IntegerLiteral(_) => Type::i32(),
            Expr::BoolLiteral(_) => Type::Bool,
            Expr::OctetSeqLiteral(_) => Type::Slice(Box::new(Type::IntN(8))),
            Expr::VarRef(name) => self
                .env
                .lookup(*name)
                .cloned()
                .ok_or_else(|| TypeError::UnboundName {
                    span,
                    name: name.as_str().to_string(),
                })?,
            Expr::Binary { op, lhs, rhs } => self.check_binary(span, *op, *lhs, *rhs)?,
            Expr::Block { stmts } => self.check_block(stmts.clone())?,
            Expr::Call { callee, args } => self.check_call(span, *callee, args.clone())?,
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => self.check_if(span, *cond, *then_branch, *else_branch)?,
            Expr::Let { name, init } => {
                let init_ty = self.check_expr(*init)?;
                self.env.bind(*name, init_ty);
                Type::Unit
            }
            Expr::LocalDecl { name, ty } => {
                self.env.bind(*name, ty.clone());
                Type::Unit
            }
        };
        self.table.set(id, ty.clone());
        Ok(ty)
    }

    fn check_binary(
        &mut self,
        span: kc_util::Span,
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<Type, TypeError> {
        let lty = self.check_expr(lhs)?;
        let rty = self.check_expr(rhs)?;
        for (ty, side) in [(&lty, lhs), (&rty, rhs)] {
            if !matches!(ty, Type::IntN(_)) {
                return Err(TypeError::ExpectedInt {
                    span: self.ast.expr(side).span,
                    found: ty.clone(),
                });
            }
        }
        let _ = span;
        Ok(match op {
            BinOp::Plus | BinOp::Minus | BinOp::Mult | BinOp::Div => Type::i32(),
            BinOp::Eq | BinOp::Lt | BinOp::Gt => Type::Bool,
        })
    }

    /// Empty block has type `Unit`; every non-final statement must be
    /// `Unit`-typed; the final statement's type is the block's type.
    fn check_block(&mut self, stmts: Vec<ExprId>) -> Result<Type, TypeError> {
        if stmts.is_empty() {
            return Ok(Type::Unit);
        }
        self.env.enter();
        let result = (|| {
            let last = stmts.len() - 1;
            for &stmt in &stmts[..last] {
                let ty = self.check_expr(stmt)?;
                if ty != Type::Unit {
                    return Err(TypeError::DiscardedNonUnit {
                        span: self.ast.expr(stmt).span,
                        found: ty,
                    });
                }
            }
            self.check_expr(stmts[last])
        })();
        self.env.exit();
        result
    }

    fn check_call(
        &mut self,
        span: kc_util::Span,
        callee: ExprId,
        args: Vec<ExprId>,
    ) -> Result<Type, TypeError> {
        let callee_ty = self.check_expr(callee)?;
        let Type::Function(ret, params) = callee_ty else {
            return Err(TypeError::NotCallable {
                span: self.ast.expr(callee).span,
                found: callee_ty,
            });
        };
        if params.len() != args.len() {
            return Err(TypeError::ArityMismatch {
                span,
                expected: params.len(),
                found: args.len(),
            });
        }
        for (index, (&arg, expected)) in args.iter().zip(params.iter()).enumerate() {
            let actual = self.check_expr(arg)?;
            if actual != *expected {
                return Err(TypeError::ArgumentTypeMismatch {
                    span: self.ast.expr(arg).span,
                    index,
                    expected: expected.clone(),
                    found: actual,
                });
            }
        }
        Ok(*ret)
    }

    fn check_if(
        &mut self,
        _span: kc_util::Span,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> Result<Type, TypeError> {
        let cond_ty = self.check_expr(cond)?;
        if cond_ty != Type::Bool {
            return Err(TypeError::NonBoolCondition {
                span: self.ast.expr(cond).span,
                found: cond_ty,
            });
        }
        let then_ty = self.check_expr(then_branch)?;
        let else_ty = self.check_expr(else_branch)?;
        if then_ty != else_ty {
            return Err(TypeError::BranchMismatch {
                span: self.ast.expr(then_branch).span,
                then_ty,
                else_ty,
            });
        }
        Ok(then_ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_lex::Lexer;
    use kc_par::parse as parse_ast;

    fn check_src(src: &str) -> Result<TypeTable, TypeError> {
        let tokens = Lexer::new(src).tokenize();
        let ast = parse_ast(tokens).unwrap();
        check(&ast)
    }

    fn check_src_ast(src: &str) -> (Ast, TypeTable) {
        let tokens = Lexer::new(src).tokenize();
        let ast = parse_ast(tokens).unwrap();
        let table = check(&ast).unwrap();
        (ast, table)
    }

    #[test]
    fn nullary_main_returns_i32() {
        let (ast, table) = check_src_ast("DefFn main() -> i32 { 42 }");
        let Decl::DefFn(def) = ast.decl(ast.items[0]) else {
            unreachable!()
        };
        assert_eq!(table.get(def.body), Some(&Type::i32()));
    }

    #[test]
    fn add_of_params_is_i32() {
        let (ast, table) = check_src_ast("DefFn add(a: i32, b: i32) -> i32 { a + b }");
        let Decl::DefFn(def) = ast.decl(ast.items[0]) else {
            unreachable!()
        };
        assert_eq!(table.get(def.body), Some(&Type::i32()));
    }

    #[test]
    fn if_unifies_branch_types() {
        let (ast, table) = check_src_ast("DefFn max(a: i32, b: i32) -> i32 { If a > b Then a Else b }");
        let Decl::DefFn(def) = ast.decl(ast.items[0]) else {
            unreachable!()
        };
        assert_eq!(table.get(def.body), Some(&Type::i32()));
    }

    #[test]
    fn let_binds_and_later_use_loads_same_type() {
        let (ast, table) = check_src_ast("DefFn f(x: i32) -> i32 { Let y = x * 2; y + 1 }");
        let Decl::DefFn(def) = ast.decl(ast.items[0]) else {
            unreachable!()
        };
        assert_eq!(table.get(def.body), Some(&Type::i32()));
    }

    #[test]
    fn comparison_typechecks_to_bool() {
        let (ast, table) = check_src_ast("DefFn g() -> Bool { 1 < 2 }");
        let Decl::DefFn(def) = ast.decl(ast.items[0]) else {
            unreachable!()
        };
        assert_eq!(table.get(def.body), Some(&Type::Bool));
    }

    #[test]
    fn mismatched_return_type_is_a_type_error() {
        assert!(matches!(
            check_src("DefFn h() -> Bool { 1 }"),
            Err(TypeError::ReturnTypeMismatch { .. })
        ));
    }

    #[test]
    fn unbound_name_is_a_type_error() {
        assert!(matches!(
            check_src("DefFn f() -> i32 { x }"),
            Err(TypeError::UnboundName { .. })
        ));
    }

    #[test]
    fn calling_a_non_function_is_a_type_error() {
        assert!(matches!(
            check_src("DefFn f() -> i32 { Let x = 1; x(1) }"),
            Err(TypeError::NotCallable { .. })
        ));
    }

    #[test]
    fn wrong_arity_is_a_type_error() {
        assert!(matches!(
            check_src("DefFn add(a: i32, b: i32) -> i32 { a + b } DefFn main() -> i32 { add(1) }"),
            Err(TypeError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn forward_reference_to_a_later_sibling_is_rejected() {
        // left-to-right visibility (§9 mutual-recursion resolution): `late`
        // is only bound in the outer scope after its own body is checked,
        // so `early` cannot see it yet.
        assert!(matches!(
            check_src("DefFn early() -> i32 { late() } DefFn late() -> i32 { 1 }"),
            Err(TypeError::UnboundName { .. })
        ));
    }

    #[test]
    fn direct_recursion_is_allowed() {
        assert!(check_src("DefFn loopy(n: i32) -> i32 { loopy(n) }").is_ok());
    }

    #[test]
    fn discarding_a_non_unit_statement_is_a_type_error() {
        assert!(matches!(
            check_src("DefFn f() -> i32 { 1; 2 }"),
            Err(TypeError::DiscardedNonUnit { .. })
        ));
    }

    #[test]
    fn extern_decl_is_visible_to_a_later_function() {
        assert!(check_src("Decl puts: Fr(i32) -> i32 DefFn main() -> i32 { puts(0) }").is_ok());
    }
}
