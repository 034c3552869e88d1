//! The abstract `IrBuilder` interface (§6): the core emitter (`emitter.rs`)
//! depends only on these operations, named by responsibility, so any back
//! end satisfying this trait is an acceptable substitute for the
//! `inkwell`-backed one in `llvm.rs`. Modeled on the inherent-method shape
//! of `faxc-gen`'s `LlvmBackend`, turned into a trait per §1's "opaque
//! `IRBuilder` interface" framing.
//!
//! `IrType` is the emitter's lowered-type vocabulary (§4.5's `IntN(w) ->
//! iw`, `Bool -> i1`, `Function(ret, ps) -> function-type(...)`); the
//! builder never sees a `kc_par::Type` directly, only this.

use crate::error::IrEmitError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrType {
    /// An `N`-bit integer; `Bool` lowers to `Int(1)`.
    Int(u32),
    /// An opaque pointer (`i8*`-equivalent), used for octet-seq globals.
    Ptr,
    /// An anonymous struct, used for the `{i8*, i32}` octet-seq value.
    Struct(Vec<IrType>),
    Function {
        ret: Box<IrType>,
        params: Vec<IrType>,
    },
}

/// The operations §6 lists, grouped by the responsibility they serve in
/// `emitter.rs`'s lowering. Every method is named after what it does, not
/// after an `inkwell` API shape, so a non-LLVM back end could implement it
/// without any LLVM types in scope.
pub trait IrBuilder {
    type Value: Copy;
    type Block: Copy;
    type Function: Copy;
    type Global: Copy;

    /// Declares a function with the given lowered type and external
    /// linkage (§6: `declare_function`).
    fn declare_function(&mut self, name: &str, ty: &IrType) -> Self::Function;

    /// Creates a basic block. If `parent` is `Some`, the block is attached
    /// to that function immediately; otherwise it is detached and must
    /// later be attached with [`Self::attach_to`] (§4.5's `If` lowering
    /// creates `else`/`merge` detached so they can be positioned after the
    /// block they follow in source order is fully lowered).
    fn create_block(&mut self, parent: Option<Self::Function>, name: &str) -> Self::Block;

    fn attach_to(&mut self, f: Self::Function, b: Self::Block);
    fn position_at(&mut self, b: Self::Block);
    fn current_block(&self) -> Self::Block;

    fn const_int(&self, width: u32, value: i64) -> Self::Value;
    fn const_bool(&self, value: bool) -> Self::Value;

    fn add(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn sub(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn mul(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn sdiv(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn icmp_eq(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn icmp_slt(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn icmp_sgt(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    fn br(&mut self, target: Self::Block);
    fn condbr(&mut self, cond: Self::Value, then_block: Self::Block, else_block: Self::Block);
    fn ret(&mut self, value: Self::Value);

    /// A φ-node of the given type with `incoming` pairs of `(value,
    /// predecessor block)` (§6: `phi` + `phi.add_incoming`, combined here
    /// since every call site has both incoming edges in hand already).
    fn phi(&mut self, ty: &IrType, incoming: &[(Self::Value, Self::Block)], name: &str) -> Self::Value;

    fn function_param(&self, f: Self::Function, index: usize) -> Self::Value;
    /// The function itself as a callable value (used for both direct
    /// calls and binding a function's name in the value environment).
    fn function_value(&self, f: Self::Function) -> Self::Value;
    fn call(&mut self, callee: Self::Value, args: &[Self::Value], name: &str) -> Self::Value;

    /// Allocates a slot in `f`'s entry block, at its start, regardless of
    /// the current insertion point (§4.5's "Function prologue for
    /// `alloca`": guarantees single execution per call).
    fn alloca_in_entry(&mut self, f: Self::Function, ty: &IrType, name: &str) -> Self::Value;
    fn load(&mut self, alloc: Self::Value, ty: &IrType, name: &str) -> Self::Value;
    fn store(&mut self, value: Self::Value, alloc: Self::Value);

    /// A private, unnamed-addr, aligned-1 global constant byte array
    /// (§4.5's `OctetSeqLit` lowering).
    fn global_private_bytes(&mut self, bytes: &[u8], name: &str) -> Self::Global;
    /// A GEP to element 0 of `global`, as an opaque pointer value.
    fn global_as_ptr(&mut self, global: Self::Global) -> Self::Value;
    fn const_struct(&mut self, members: &[Self::Value]) -> Self::Value;

    fn verify_function(&self, f: Self::Function) -> Result<(), String>;

    fn emit_object(&self, path: &std::path::Path) -> Result<(), IrEmitError>;
}
