//! Lowers a checked `kc_par::Ast` into IR via any `IrBuilder` implementation
//! (§4.5). A literal port of `original_source/kcccxx/src/codegen.cpp`'s
//! `generate_*` family: two passes over the top-level items (declare every
//! function signature first so forward calls resolve regardless of source
//! order, then define each body), an entry-block `alloca` for every `Let`
//! binding, and a then/else/merge/phi sequence for `If` where `else` and
//! `merge` are created detached and attached only once the block they
//! follow is fully lowered (a nested `If` can otherwise leave the insertion
//! point somewhere other than where it started).

use std::collections::HashMap;

use kc_par::{Ast, BinOp, Decl, DefFn, Expr, ExprId, Type};
use kc_sem::TypeTable;
use kc_util::{Idx, Symbol};

use crate::builder::{IrBuilder, IrType};
use crate::error::IrEmitError;

/// How a name is bound in the value environment: a `Let` binding lives in
/// an `alloca` and must be `load`ed on every reference, while a parameter
/// or a function name already denotes its value directly. Replaces the
/// reference implementation's `dyn_cast<AllocaInst>` runtime check (done
/// there because `llvm::Value*` erases which case it is) with a static tag
/// recorded at bind time.
enum EnvVal<V> {
    Direct(V),
    Alloca(V, IrType),
}

impl<V: Copy> Clone for EnvVal<V> {
    fn clone(&self) -> Self {
        match self {
            EnvVal::Direct(v) => EnvVal::Direct(*v),
            EnvVal::Alloca(v, ty) => EnvVal::Alloca(*v, ty.clone()),
        }
    }
}

fn lower_type(ty: &Type) -> IrType {
    match ty {
        Type::Bool => IrType::Int(1),
        Type::IntN(width) => IrType::Int(*width),
        // No runtime representation is observable for `Unit` (§4.5's only
        // producers are `Let` and a local `Decl`, both discarded by the
        // checker's `DiscardedNonUnit` rule everywhere but tail position);
        // `Int(1)` with a `false` sentinel gives it a concrete IR type
        // without introducing a zero-sized one the builder trait would
        // need to special-case.
        Type::Unit => IrType::Int(1),
        Type::Function(ret, params) => IrType::Function {
            ret: Box::new(lower_type(ret)),
            params: params.iter().map(lower_type).collect(),
        },
        Type::Slice(_) => IrType::Struct(vec![IrType::Ptr, IrType::Int(32)]),
        Type::TyVar(_) => unreachable!("TyVar is never constructed by the parser or checker"),
    }
}

pub fn emit_translation_unit<B: IrBuilder>(
    ast: &Ast,
    types: &TypeTable,
    builder: &mut B,
) -> Result<(), IrEmitError> {
    let mut emitter = Emitter {
        ast,
        types,
        builder,
        functions: HashMap::new(),
        scopes: vec![HashMap::new()],
        current_function: None,
        octet_seq_count: 0,
    };
    let items = ast.items.clone();
    for &decl_id in &items {
        emitter.declare_decl(decl_id)?;
    }
    for &decl_id in &items {
        if let Decl::DefFn(def) = ast.decl(decl_id) {
            emitter.define_deffn(def)?;
        }
    }
    Ok(())
}

struct Emitter<'a, B: IrBuilder> {
    ast: &'a Ast,
    types: &'a TypeTable,
    builder: &'a mut B,
    functions: HashMap<Symbol, B::Function>,
    scopes: Vec<HashMap<Symbol, EnvVal<B::Value>>>,
    current_function: Option<B::Function>,
    octet_seq_count: u32,
}

impl<'a, B: IrBuilder> Emitter<'a, B> {
    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn bind(&mut self, name: Symbol, value: EnvVal<B::Value>) {
        self.scopes
            .last_mut()
            .expect("at least one scope is always entered")
            .insert(name, value);
    }

    fn lookup(&self, name: Symbol) -> EnvVal<B::Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).cloned())
            .unwrap_or_else(|| panic!("unbound name {} reached codegen; checker should have caught it", name))
    }

    fn current_function(&self) -> B::Function {
        self.current_function.expect("alloca/param access outside a function body")
    }

    /// The sentinel value standing in for a `Unit`-typed expression's
    /// result (see [`lower_type`]'s note on `Type::Unit`).
    fn unit_value(&self) -> B::Value {
        self.builder.const_bool(false)
    }

    fn declare_decl(&mut self, decl_id: kc_par::DeclId) -> Result<(), IrEmitError> {
        match self.ast.decl(decl_id) {
            Decl::Extern { name, ty, .. } => self.declare_extern(*name, ty),
            Decl::DefFn(def) => {
                let param_types: Vec<Type> = def.params.iter().map(|(_, t)| t.clone()).collect();
                let fnty = Type::function(def.ret.clone(), param_types);
                let irty = lower_type(&fnty);
                let f = self.builder.declare_function(&def.name.as_str(), &irty);
                self.functions.insert(def.name, f);
                let v = self.builder.function_value(f);
                self.bind(def.name, EnvVal::Direct(v));
                Ok(())
            }
        }
    }

    fn declare_extern(&mut self, name: Symbol, ty: &Type) -> Result<(), IrEmitError> {
        let irty = lower_type(ty);
        if !matches!(irty, IrType::Function { .. }) {
            return Err(IrEmitError::Internal(format!(
                "extern declaration {} is not a function type",
                name
            )));
        }
        let f = self.builder.declare_function(&name.as_str(), &irty);
        self.functions.insert(name, f);
        let v = self.builder.function_value(f);
        self.bind(name, EnvVal::Direct(v));
        Ok(())
    }

    fn define_deffn(&mut self, def: &DefFn) -> Result<(), IrEmitError> {
        let function = *self
            .functions
            .get(&def.name)
            .expect("every DefFn was declared in the first pass");
        self.current_function = Some(function);

        let entry = self.builder.create_block(Some(function), "entry");
        self.builder.attach_to(function, entry);
        self.builder.position_at(entry);

        self.push_scope();
        for (index, (name, _ty)) in def.params.iter().enumerate() {
            let v = self.builder.function_param(function, index);
            self.bind(*name, EnvVal::Direct(v));
        }
        let result = self.emit_expr(def.body);
        self.pop_scope();
        self.current_function = None;

        let value = result?;
        self.builder.ret(value);
        self.builder
            .verify_function(function)
            .map_err(|msg| IrEmitError::VerificationFailed(def.name.as_str().to_string(), msg))
    }

    fn emit_expr(&mut self, id: ExprId) -> Result<B::Value, IrEmitError> {
        let node = self.ast.expr(id);
        match &node.kind {
            Expr::IntegerLiteral(v) => Ok(self.builder.const_int(32, *v as i64)),
            Expr::BoolLiteral(v) => Ok(self.builder.const_bool(*v)),
            Expr::OctetSeqLiteral(bytes) => Ok(self.emit_octet_seq(bytes)),
            Expr::VarRef(name) => Ok(self.emit_var_ref(*name)),
            Expr::Binary { op, lhs, rhs } => self.emit_binary(*op, *lhs, *rhs),
            Expr::Block { stmts } => self.emit_block(stmts),
            Expr::Call { callee, args } => self.emit_call(*callee, args),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => self.emit_if(id, *cond, *then_branch, *else_branch),
            Expr::Let { name, init } => self.emit_let(*name, *init),
            Expr::LocalDecl { name, ty } => {
                self.declare_extern(*name, ty)?;
                Ok(self.unit_value())
            }
        }
    }

    fn emit_var_ref(&mut self, name: Symbol) -> B::Value {
        match self.lookup(name) {
            EnvVal::Direct(v) => v,
            EnvVal::Alloca(ptr, ty) => self.builder.load(ptr, &ty, &name.as_str()),
        }
    }

    fn emit_binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<B::Value, IrEmitError> {
        let lv = self.emit_expr(lhs)?;
        let rv = self.emit_expr(rhs)?;
        Ok(match op {
            BinOp::Plus => self.builder.add(lv, rv),
            BinOp::Minus => self.builder.sub(lv, rv),
            BinOp::Mult => self.builder.mul(lv, rv),
            BinOp::Div => self.builder.sdiv(lv, rv),
            BinOp::Eq => self.builder.icmp_eq(lv, rv),
            BinOp::Lt => self.builder.icmp_slt(lv, rv),
            BinOp::Gt => self.builder.icmp_sgt(lv, rv),
        })
    }

    /// An empty block is `Unit`; every statement but the last is discarded
    /// (the checker already rejected a non-`Unit` discard), and the last
    /// statement's value is the block's value. Per §4.5 and
    /// `generate_block_expr`, a fresh basic block is created and branched
    /// into unconditionally before any statement is lowered, so a nested
    /// block's own control flow never escapes into whatever block its
    /// enclosing expression happened to leave the builder positioned at.
    fn emit_block(&mut self, stmts: &[ExprId]) -> Result<B::Value, IrEmitError> {
        if stmts.is_empty() {
            return Ok(self.unit_value());
        }
        let function = self.current_function();
        let block = self.builder.create_block(Some(function), "block");
        self.builder.br(block);
        self.builder.position_at(block);

        self.push_scope();
        let last = stmts.len() - 1;
        let result = (|| {
            for &stmt in &stmts[..last] {
                self.emit_expr(stmt)?;
            }
            self.emit_expr(stmts[last])
        })();
        self.pop_scope();
        result
    }

    fn emit_call(&mut self, callee: ExprId, args: &[ExprId]) -> Result<B::Value, IrEmitError> {
        let callee_v = self.emit_expr(callee)?;
        let mut arg_values = Vec::with_capacity(args.len());
        for &arg in args {
            arg_values.push(self.emit_expr(arg)?);
        }
        Ok(self.builder.call(callee_v, &arg_values, "calltmp"))
    }

    /// then/else/merge with `else`/`merge` attached only once their
    /// predecessor finishes lowering, since a nested `If` inside `then`
    /// moves the insertion point before `else` is ever positioned.
    fn emit_if(
        &mut self,
        whole: ExprId,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> Result<B::Value, IrEmitError> {
        let function = self.current_function();
        let cond_v = self.emit_expr(cond)?;

        let then_bb = self.builder.create_block(Some(function), "then");
        let else_bb = self.builder.create_block(None, "else");
        let merge_bb = self.builder.create_block(None, "merge");

        self.builder.condbr(cond_v, then_bb, else_bb);

        self.builder.position_at(then_bb);
        let then_v = self.emit_expr(then_branch)?;
        let then_end_bb = self.builder.current_block();
        self.builder.br(merge_bb);

        self.builder.attach_to(function, else_bb);
        self.builder.position_at(else_bb);
        let else_v = self.emit_expr(else_branch)?;
        let else_end_bb = self.builder.current_block();
        self.builder.br(merge_bb);

        self.builder.attach_to(function, merge_bb);
        self.builder.position_at(merge_bb);

        let result_ty = self
            .types
            .get(whole)
            .cloned()
            .expect("every expression was type-checked");
        Ok(self.builder.phi(
            &lower_type(&result_ty),
            &[(then_v, then_end_bb), (else_v, else_end_bb)],
            "iftmp",
        ))
    }

    /// `Let name = init`: evaluate `init`, spill it to an entry-block
    /// `alloca` regardless of the current insertion point (so the slot is
    /// allocated exactly once per call), bind `name` to that slot, and
    /// yield `Unit`.
    fn emit_let(&mut self, name: Symbol, init: ExprId) -> Result<B::Value, IrEmitError> {
        let init_v = self.emit_expr(init)?;
        let init_ty = self
            .types
            .get(init)
            .cloned()
            .expect("every expression was type-checked");
        let irty = lower_type(&init_ty);
        let function = self.current_function();
        let alloc = self.builder.alloca_in_entry(function, &irty, &name.as_str());
        self.builder.store(init_v, alloc);
        self.bind(name, EnvVal::Alloca(alloc, irty));
        Ok(self.unit_value())
    }

    fn emit_octet_seq(&mut self, bytes: &[u8]) -> B::Value {
        let name = format!("oseq.{}", self.octet_seq_count);
        self.octet_seq_count += 1;
        let global = self.builder.global_private_bytes(bytes, &name);
        let ptr = self.builder.global_as_ptr(global);
        let len = self.builder.const_int(32, bytes.len() as i64);
        self.builder.const_struct(&[ptr, len])
    }
}
