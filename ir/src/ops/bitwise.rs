//! Bitwise and shift operators.
//!
//! `!x` on an expression is the bitwise complement `~x`; use [`Expr::logical_not`] for `!x`.

use std::ops::Not;

use super::impl_binary_trait;
use crate::Expr;
use crate::types::UnaryOp;

impl_binary_trait! {
    BitAnd::bitand => BitwiseAnd,
    BitOr::bitor => BitwiseOr,
    BitXor::bitxor => BitwiseXor,
    Shl::shl => LeftShift,
    Shr::shr => RightShift,
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary(UnaryOp::BitwiseNot, self)
    }
}

impl Not for &Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary(UnaryOp::BitwiseNot, self.clone())
    }
}
