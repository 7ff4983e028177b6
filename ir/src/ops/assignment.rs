//! Assignments, compound assignments and increments.

use crate::Expr;
use crate::types::{BinaryOp, UnaryOp};

macro_rules! assignment_methods {
    ($($method:ident => $op:ident, $sym:literal);+ $(;)?) => {
        impl Expr {
            $(
                #[doc = concat!("`self ", $sym, " rhs`")]
                pub fn $method(&self, rhs: impl Into<Expr>) -> Expr {
                    Expr::binary(BinaryOp::$op, self.clone(), rhs)
                }
            )+
        }
    };
}

assignment_methods! {
    assign => Assignment, "=";
    assign_add => AddAssign, "+=";
    assign_sub => SubtractAssign, "-=";
    assign_mul => MultiplyAssign, "*=";
    assign_div => DivideAssign, "/=";
    assign_rem => ModuloAssign, "%=";
    assign_shl => LeftShiftAssign, "<<=";
    assign_shr => RightShiftAssign, ">>=";
    assign_and => BitwiseAndAssign, "&=";
    assign_or => BitwiseOrAssign, "|=";
    assign_xor => BitwiseXorAssign, "^=";
}

impl Expr {
    /// `++self`
    pub fn pre_inc(&self) -> Expr {
        Expr::unary(UnaryOp::PreIncrement, self.clone())
    }

    /// `self++`
    pub fn post_inc(&self) -> Expr {
        Expr::unary(UnaryOp::PostIncrement, self.clone())
    }

    /// `--self`
    pub fn pre_dec(&self) -> Expr {
        Expr::unary(UnaryOp::PreDecrement, self.clone())
    }

    /// `self--`
    pub fn post_dec(&self) -> Expr {
        Expr::unary(UnaryOp::PostDecrement, self.clone())
    }

    /// `*self`
    pub fn deref(&self) -> Expr {
        Expr::unary(UnaryOp::Dereference, self.clone())
    }

    /// `&self`
    pub fn address(&self) -> Expr {
        Expr::unary(UnaryOp::AddressOf, self.clone())
    }
}
