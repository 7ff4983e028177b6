//! Structural equality.
//!
//! Variables compare by identity: two distinct variables with the same display name are
//! different. Literals compare by value and bit width.

use itertools::Itertools;

use crate::{Expr, ExprNode};

pub fn is_equal(a: &Expr, b: &Expr) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    match (a.node(), b.node()) {
        (ExprNode::Var(x), ExprNode::Var(y)) => x.is_same(y),
        (ExprNode::Int { value: va, bits: ba }, ExprNode::Int { value: vb, bits: bb }) => va == vb && ba == bb,
        (ExprNode::UInt { value: va, bits: ba }, ExprNode::UInt { value: vb, bits: bb }) => va == vb && ba == bb,
        (ExprNode::Float { value: va, bits: ba }, ExprNode::Float { value: vb, bits: bb }) => va == vb && ba == bb,
        (ExprNode::MemFence(x), ExprNode::MemFence(y)) => x == y,
        (ExprNode::MemoryScope(x), ExprNode::MemoryScope(y)) => x == y,
        (ExprNode::MemoryOrder(x), ExprNode::MemoryOrder(y)) => x == y,
        (ExprNode::Str(x), ExprNode::Str(y)) => x == y,
        (ExprNode::Unary { op: oa, term: ta }, ExprNode::Unary { op: ob, term: tb }) => oa == ob && is_equal(ta, tb),
        (ExprNode::Binary { op: oa, lhs: la, rhs: ra }, ExprNode::Binary { op: ob, lhs: lb, rhs: rb }) => {
            oa == ob && is_equal(la, lb) && is_equal(ra, rb)
        }
        (
            ExprNode::Ternary { condition: ca, then: ta, otherwise: oa },
            ExprNode::Ternary { condition: cb, then: tb, otherwise: ob },
        ) => is_equal(ca, cb) && is_equal(ta, tb) && is_equal(oa, ob),
        (ExprNode::Access { field: fa, address: aa }, ExprNode::Access { field: fb, address: ab }) => {
            is_equal(fa, fb) && is_equal(aa, ab)
        }
        (ExprNode::CallBuiltin { function: fa, args: aa }, ExprNode::CallBuiltin { function: fb, args: ab }) => {
            fa == fb && args_equal(aa, ab)
        }
        (ExprNode::Call { name: na, args: aa }, ExprNode::Call { name: nb, args: ab }) => {
            na == nb && args_equal(aa, ab)
        }
        (ExprNode::Cast { ty: ya, term: ta }, ExprNode::Cast { ty: yb, term: tb }) => ya == yb && is_equal(ta, tb),
        (ExprNode::Swizzle { selector: sa, term: ta }, ExprNode::Swizzle { selector: sb, term: tb }) => {
            sa == sb && is_equal(ta, tb)
        }
        _ => false,
    }
}

fn args_equal(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().zip_eq(b).all(|(x, y)| is_equal(x, y))
}

impl Expr {
    /// Structural equality, see [`is_equal`].
    pub fn same_as(&self, other: &Expr) -> bool {
        is_equal(self, other)
    }
}
