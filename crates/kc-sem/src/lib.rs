//! The structural type checker (§4.4): a lexically scoped environment over
//! `kc_par::Type`, decorating every expression in a `kc_par::Ast` with its
//! type in a side-table rather than mutating the tree.

mod checker;
mod error;
mod scope;

pub use checker::{check, TypeTable};
pub use error::TypeError;
pub use scope::Env;
