//! Types and AST node definitions.
//!
//! Every node lives in one of the two arenas on [`Ast`] and is referenced
//! by its typed index (`ExprId`/`DeclId`) rather than `Box`/`Rc`; there are
//! no node-to-node owning pointers and so no cycles, matching the
//! single-arena ownership model the data model calls for. The type slot
//! the checker fills in is kept out of the node itself (a side-table in
//! `kc-sem`) so the tree stays immutable once the parser hands it off, per
//! the "prefer the side-table" note.

use kc_util::{Idx, IndexVec, Span, Symbol};

/// Index into [`Ast::exprs`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExprId(u32);

impl Idx for ExprId {
    fn from_usize(idx: usize) -> Self {
        ExprId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into [`Ast::decls`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DeclId(u32);

impl Idx for DeclId {
    fn from_usize(idx: usize) -> Self {
        DeclId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The type lattice. Structural equality: same variant, equal payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    IntN(u32),
    Unit,
    Function(Box<Type>, Vec<Type>),
    Slice(Box<Type>),
    /// Reserved for future inference; never constructed by this parser or
    /// the checker. Equal only to a `TyVar` of the same id.
    TyVar(u32),
}

impl Type {
    pub fn i32() -> Type {
        Type::IntN(32)
    }

    pub fn function(ret: Type, params: Vec<Type>) -> Type {
        Type::Function(Box::new(ret), params)
    }
}

/// The seven binary operators, in their source-order precedence classes
/// (`Add = {Plus, Minus}`, `Mul = {Mult, Div}`, `Cmp = {Eq, Lt, Gt}`); see
/// `precedence.rs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Mult,
    Div,
    Eq,
    Lt,
    Gt,
}

/// A parsed expression node. Carries no type; the checker decorates a
/// separate `ExprId -> Type` side-table.
#[derive(Clone, Debug)]
pub enum Expr {
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Block {
        stmts: Vec<ExprId>,
    },
    BoolLiteral(bool),
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    IntegerLiteral(i32),
    OctetSeqLiteral(Vec<u8>),
    Let {
        name: Symbol,
        init: ExprId,
    },
    VarRef(Symbol),
    /// A `Decl` node in statement position (§4.3's `Stmt := ... | DeclStmt`
    /// production feeding a `BlockExpr`'s statement list). The top-level
    /// form of the same shape lives in [`Decl::Extern`]; this variant only
    /// exists so a block's `stmts: Vec<ExprId>` can hold one.
    LocalDecl {
        name: Symbol,
        ty: Type,
    },
}

/// A node in the expression arena: the node itself plus its source span.
#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: Expr,
    pub span: Span,
}

/// A function parameter: name and declared type.
pub type Param = (Symbol, Type);

#[derive(Clone, Debug)]
pub struct DefFn {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: ExprId,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Clone, Debug)]
pub enum Decl {
    DefFn(DefFn),
    /// A top-level `Decl name: T` extern declaration.
    Extern { name: Symbol, ty: Type, span: Span },
}

/// The full arena-owned program: every expression and declaration node
/// created during parsing, plus the ordered list of top-level items.
#[derive(Debug, Default)]
pub struct Ast {
    pub exprs: IndexVec<ExprId, ExprNode>,
    pub decls: IndexVec<DeclId, Decl>,
    pub items: Vec<DeclId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_expr(&mut self, kind: Expr, span: Span) -> ExprId {
        self.exprs.push(ExprNode { kind, span })
    }

    pub fn push_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.push(decl)
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.exprs[id]
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_type_equality_is_structural() {
        let a = Type::function(Type::i32(), vec![Type::i32(), Type::Bool]);
        let b = Type::function(Type::i32(), vec![Type::i32(), Type::Bool]);
        let c = Type::function(Type::i32(), vec![Type::Bool, Type::i32()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tyvar_equal_only_to_same_id() {
        assert_eq!(Type::TyVar(1), Type::TyVar(1));
        assert_ne!(Type::TyVar(1), Type::TyVar(2));
    }

    #[test]
    fn arena_ids_are_stable_after_more_pushes() {
        let mut ast = Ast::new();
        let a = ast.push_expr(Expr::IntegerLiteral(1), Span::DUMMY);
        let b = ast.push_expr(Expr::IntegerLiteral(2), Span::DUMMY);
        assert!(matches!(ast.expr(a).kind, Expr::IntegerLiteral(1)));
        assert!(matches!(ast.expr(b).kind, Expr::IntegerLiteral(2)));
    }
}
