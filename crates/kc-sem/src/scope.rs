//! Lexically scoped type environment: a stack of `name -> Type` maps,
//! lookup proceeds innermost-first (§4.4). Grounded in `faxc-sem`'s
//! `ScopeTree`/`Rib` shape, collapsed from an index-vec-of-ribs to a plain
//! `Vec<HashMap<_, _>>` — KC has no labeled loops or `DefId`s to justify the
//! extra rib-parent indirection the teacher's version carries.

use std::collections::HashMap;

use kc_par::Type;
use kc_util::Symbol;

/// A stack of scopes. Pushed on entering a function body or `BlockExpr`,
/// popped on exit — on every exit path, including error paths, since the
/// caller always pairs `enter`/`exit` with a `?`-propagating body (§5).
#[derive(Default)]
pub struct Env {
    scopes: Vec<HashMap<Symbol, Type>>,
}

impl Env {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    /// Binds `name` in the innermost scope, shadowing any outer binding.
    pub fn bind(&mut self, name: Symbol, ty: Type) {
        self.scopes
            .last_mut()
            .expect("bind() called with no scope entered")
            .insert(name, ty);
    }

    /// Looks up `name`, innermost scope first.
    pub fn lookup(&self, name: Symbol) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_binding_shadows_outer() {
        let mut env = Env::new();
        env.enter();
        env.bind(Symbol::intern("x"), Type::Bool);
        env.enter();
        env.bind(Symbol::intern("x"), Type::i32());
        assert_eq!(env.lookup(Symbol::intern("x")), Some(&Type::i32()));
        env.exit();
        assert_eq!(env.lookup(Symbol::intern("x")), Some(&Type::Bool));
    }

    #[test]
    fn lookup_after_exit_is_unbound() {
        let mut env = Env::new();
        env.enter();
        env.bind(Symbol::intern("y"), Type::Bool);
        env.exit();
        assert_eq!(env.lookup(Symbol::intern("y")), None);
    }
}
