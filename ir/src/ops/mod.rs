//! Operator constructors for expressions.
//!
//! - `arithmetic`: `+ - * / % -x` through `std::ops`
//! - `bitwise`: `& | ^ << >> ~` through `std::ops`
//! - `comparison`: relational and logical operators as methods
//! - `assignment`: plain and compound assignment, increments
//! - `builtin`: typed wrappers over frequently used builtin functions

pub mod arithmetic;
pub mod assignment;
pub mod bitwise;
pub mod builtin;
pub mod comparison;

/// Implements a `std::ops` binary trait for `Expr`, `&Expr` and primitive left operands.
macro_rules! impl_binary_trait {
    ($($trait:ident::$method:ident => $op:ident),+ $(,)?) => {
        $(
            impl<T: Into<crate::Expr>> std::ops::$trait<T> for crate::Expr {
                type Output = crate::Expr;

                fn $method(self, rhs: T) -> crate::Expr {
                    crate::Expr::binary(crate::types::BinaryOp::$op, self, rhs.into())
                }
            }

            impl<T: Into<crate::Expr>> std::ops::$trait<T> for &crate::Expr {
                type Output = crate::Expr;

                fn $method(self, rhs: T) -> crate::Expr {
                    crate::Expr::binary(crate::types::BinaryOp::$op, self.clone(), rhs.into())
                }
            }

            impl_binary_trait!(@primitive $trait::$method => $op; i32, i64, u32, u64, usize, f32, f64);
        )+
    };
    (@primitive $trait:ident::$method:ident => $op:ident; $($prim:ty),+) => {
        $(
            impl std::ops::$trait<crate::Expr> for $prim {
                type Output = crate::Expr;

                fn $method(self, rhs: crate::Expr) -> crate::Expr {
                    crate::Expr::binary(crate::types::BinaryOp::$op, self, rhs)
                }
            }

            impl std::ops::$trait<&crate::Expr> for $prim {
                type Output = crate::Expr;

                fn $method(self, rhs: &crate::Expr) -> crate::Expr {
                    crate::Expr::binary(crate::types::BinaryOp::$op, self, rhs.clone())
                }
            }
        )+
    };
}

pub(crate) use impl_binary_trait;
