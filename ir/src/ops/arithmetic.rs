//! Arithmetic operators.

use std::ops::Neg;

use super::impl_binary_trait;
use crate::Expr;
use crate::types::UnaryOp;

impl_binary_trait! {
    Add::add => Add,
    Sub::sub => Subtract,
    Mul::mul => Multiply,
    Div::div => Divide,
    Rem::rem => Modulo,
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Minus, self)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Minus, self.clone())
    }
}
