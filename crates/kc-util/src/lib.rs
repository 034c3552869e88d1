//! kc-util - Foundation Types
//!
//! Small, single-threaded foundation shared by every compiler stage:
//! interned identifiers (`Symbol`), source locations (`Span`), and a typed
//! arena vector (`IndexVec`/`Idx`) used to own AST and type nodes.
//!
//! KC is a single-pass, single-threaded pipeline (one source file in, one
//! object file out), so unlike a production compiler's foundation crate
//! these types skip the concurrency-safety machinery (no `Arc<RwLock<_>>`
//! interner, no cross-file `SourceMap`) that a multi-file, multi-threaded
//! compiler needs.

mod arena;
mod span;
mod symbol;

pub use arena::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;
