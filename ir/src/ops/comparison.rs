//! Relational and logical operators.
//!
//! These cannot go through `PartialOrd`/`PartialEq` because they build expressions instead of
//! returning `bool`.

use crate::Expr;
use crate::types::{BinaryOp, UnaryOp};

macro_rules! comparison_methods {
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

comparison_methods! {
    lt => Less, "<";
    gt => Greater, ">";
    le => LessEqual, "<=";
    ge => GreaterEqual, ">=";
    eq_ => Equal, "==";
    ne_ => NotEqual, "!=";
    logical_and => LogicalAnd, "&&";
    logical_or => LogicalOr, "||";
}

impl Expr {
    /// `!self`
    pub fn logical_not(&self) -> Expr {
        Expr::unary(UnaryOp::LogicalNot, self.clone())
    }
}
