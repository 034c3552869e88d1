//! The operator-precedence-class table the shunting-yard parser runs
//! against. Three classes — `Add`, `Mul`, `Cmp` — with `Mul` higher than
//! `Add`, and `Cmp` incomparable with both (see §4.3 of the expanded spec
//! and the ledger entry on how this departs from the reference
//! implementation's literal table for the `Add`/`Mul` vs. `Cmp` case).

use crate::ast::BinOp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecClass {
    Add,
    Mul,
    Cmp,
}

impl BinOp {
    pub fn class(self) -> PrecClass {
        match self {
            BinOp::Plus | BinOp::Minus => PrecClass::Add,
            BinOp::Mult | BinOp::Div => PrecClass::Mul,
            BinOp::Eq | BinOp::Lt | BinOp::Gt => PrecClass::Cmp,
        }
    }
}

/// `l` binds tighter than `r`. Only `Mul > Add`; `Cmp` is never higher
/// than anything, and nothing is ever higher than `Cmp`.
pub fn higher_than(l: BinOp, r: BinOp) -> bool {
    matches!((l.class(), r.class()), (PrecClass::Mul, PrecClass::Add))
}

/// `l` and `r` combine without precedence disambiguation between them.
/// `Cmp` operators are never `same_class`, not even with themselves — a
/// chained comparison like `a < b < c` has nothing to fall back on and is
/// therefore always rejected by `comparable` below.
pub fn same_class(l: BinOp, r: BinOp) -> bool {
    match (l.class(), r.class()) {
        (PrecClass::Add, PrecClass::Add) => true,
        (PrecClass::Mul, PrecClass::Mul) => true,
        _ => false,
    }
}

/// Whether `l` and `r` may appear adjacent on the operator stack without
/// explicit parentheses resolving the ambiguity.
pub fn comparable(l: BinOp, r: BinOp) -> bool {
    higher_than(l, r) || higher_than(r, l) || same_class(l, r)
}

/// All seven operators are left-associative; no right-associative operator
/// exists at this language level.
pub fn is_left_associative(_op: BinOp) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mult_is_higher_than_add() {
        assert!(higher_than(BinOp::Mult, BinOp::Plus));
        assert!(!higher_than(BinOp::Plus, BinOp::Mult));
    }

    #[test]
    fn add_and_mul_are_incomparable_with_cmp() {
        assert!(!comparable(BinOp::Plus, BinOp::Lt));
        assert!(!comparable(BinOp::Lt, BinOp::Plus));
        assert!(!comparable(BinOp::Mult, BinOp::Eq));
    }

    #[test]
    fn cmp_is_never_same_class_even_with_itself() {
        assert!(!same_class(BinOp::Lt, BinOp::Lt));
        assert!(!comparable(BinOp::Lt, BinOp::Lt));
        assert!(!comparable(BinOp::Eq, BinOp::Gt));
    }

    #[test]
    fn same_class_operators_are_comparable() {
        assert!(comparable(BinOp::Plus, BinOp::Minus));
        assert!(comparable(BinOp::Mult, BinOp::Div));
    }
}
