//! The IR-emission back end (§4.5, §6): an abstract [`IrBuilder`] interface
//! that [`emitter::emit_translation_unit`] lowers a checked AST against, and
//! an `inkwell`-backed implementation of that interface in `llvm`.

mod builder;
mod emitter;
mod error;
mod llvm;

pub use builder::{IrBuilder, IrType};
pub use emitter::emit_translation_unit;
pub use error::IrEmitError;
pub use llvm::LlvmIrBuilder;
