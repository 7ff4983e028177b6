//! Expression constructors and literal conversions.

use fftgen_dtype::{DataType, MemFenceFlag, MemoryOrder, MemoryScope};
use smallvec::SmallVec;
use snafu::OptionExt;

use super::{Expr, ExprNode, Var};
use crate::error::{EmptyVectorInitSnafu, Result};
use crate::types::{BinaryOp, Swizzle, UnaryOp};

/// 32 bits when the value fits a 32-bit integer, 64 otherwise.
pub fn choose_bits_signed(value: i64) -> u8 {
    if i32::try_from(value).is_ok() { 32 } else { 64 }
}

/// 32 bits when the value fits a 32-bit unsigned integer, 64 otherwise.
pub fn choose_bits_unsigned(value: u64) -> u8 {
    if u32::try_from(value).is_ok() { 32 } else { 64 }
}

impl Expr {
    // =========================================================================
    // Leaves
    // =========================================================================

    /// Fresh variable with the given display name.
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(ExprNode::Var(Var::new(name)))
    }

    pub fn int(value: i64, bits: u8) -> Self {
        Self::new(ExprNode::Int { value, bits })
    }

    pub fn uint(value: u64, bits: u8) -> Self {
        Self::new(ExprNode::UInt { value, bits })
    }

    pub fn float(value: f64, bits: u8) -> Self {
        Self::new(ExprNode::Float { value, bits })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprNode::Str(value.into()))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn unary(op: UnaryOp, term: impl Into<Expr>) -> Self {
        Self::new(ExprNode::Unary { op, term: term.into() })
    }

    pub fn binary(op: BinaryOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(ExprNode::Binary { op, lhs: lhs.into(), rhs: rhs.into() })
    }

    /// `self[address]`
    pub fn at(&self, address: impl Into<Expr>) -> Self {
        Self::new(ExprNode::Access { field: self.clone(), address: address.into() })
    }

    // =========================================================================
    // Swizzles
    // =========================================================================

    /// Select lanes by index, e.g. `x.s(&[0])` prints as `x.x`.
    pub fn s(&self, lanes: &[u8]) -> Self {
        self.swizzle(Swizzle::Lanes(SmallVec::from_slice(lanes)))
    }

    pub fn lo(&self) -> Self {
        self.swizzle(Swizzle::Lo)
    }

    pub fn hi(&self) -> Self {
        self.swizzle(Swizzle::Hi)
    }

    pub fn even(&self) -> Self {
        self.swizzle(Swizzle::Even)
    }

    pub fn odd(&self) -> Self {
        self.swizzle(Swizzle::Odd)
    }

    pub fn swizzle(&self, selector: Swizzle) -> Self {
        Self::new(ExprNode::Swizzle { selector, term: self.clone() })
    }

    /// Real part of a two-lane complex value.
    pub fn re(&self) -> Self {
        self.s(&[0])
    }

    /// Imaginary part of a two-lane complex value.
    pub fn im(&self) -> Self {
        self.s(&[1])
    }
}

/// `(ty) term`
pub fn cast(ty: DataType, term: impl Into<Expr>) -> Expr {
    Expr::new(ExprNode::Cast { ty, term: term.into() })
}

/// Call to a function outside the builtin set.
pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::new(ExprNode::Call { name: name.into(), args: args.into_iter().collect() })
}

/// `condition ? then : otherwise`
pub fn ternary(condition: impl Into<Expr>, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    Expr::new(ExprNode::Ternary { condition: condition.into(), then: then.into(), otherwise: otherwise.into() })
}

pub fn dereference(term: impl Into<Expr>) -> Expr {
    Expr::unary(UnaryOp::Dereference, term)
}

pub fn address_of(term: impl Into<Expr>) -> Expr {
    Expr::unary(UnaryOp::AddressOf, term)
}

pub fn comma(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
    Expr::binary(BinaryOp::Comma, lhs, rhs)
}

/// Vector literal `(ty) (a0, a1, ...)`; an empty element list does not compile.
pub fn init_vector<const N: usize>(ty: DataType, args: [Expr; N]) -> Expr {
    const { assert!(N > 0, "vector initializer needs at least one element") };
    match args.into_iter().reduce(comma) {
        Some(list) => cast(ty, list),
        None => unreachable!("N > 0 is checked at compile time"),
    }
}

/// Vector literal from a runtime-sized element list.
pub fn try_init_vector(ty: DataType, args: impl IntoIterator<Item = Expr>) -> Result<Expr> {
    let list = args.into_iter().reduce(comma).context(EmptyVectorInitSnafu)?;
    Ok(cast(ty, list))
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from_int {
    (narrow $ctor:ident, $wide:ty; $($ty:ty),*) => {
        $(impl From<$ty> for Expr {
            fn from(value: $ty) -> Self {
                Expr::$ctor(value as $wide, 32)
            }
        })*
    };
    (wide $ctor:ident, $wide:ty, $bits:path; $($ty:ty),*) => {
        $(impl From<$ty> for Expr {
            fn from(value: $ty) -> Self {
                let value = value as $wide;
                Expr::$ctor(value, $bits(value))
            }
        })*
    };
}

impl_from_int!(narrow int, i64; i8, i16, i32);
impl_from_int!(wide int, i64, choose_bits_signed; i64, isize);
impl_from_int!(narrow uint, u64; u8, u16, u32);
impl_from_int!(wide uint, u64, choose_bits_unsigned; u64, usize);

impl From<f32> for Expr {
    fn from(value: f32) -> Self {
        Expr::float(value as f64, 32)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::float(value, 64)
    }
}

impl From<MemFenceFlag> for Expr {
    fn from(value: MemFenceFlag) -> Self {
        Expr::new(ExprNode::MemFence(value))
    }
}

impl From<MemoryScope> for Expr {
    fn from(value: MemoryScope) -> Self {
        Expr::new(ExprNode::MemoryScope(value))
    }
}

impl From<MemoryOrder> for Expr {
    fn from(value: MemoryOrder) -> Self {
        Expr::new(ExprNode::MemoryOrder(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::string(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::string(value)
    }
}

impl From<Var> for Expr {
    fn from(value: Var) -> Self {
        Expr::new(ExprNode::Var(value))
    }
}

impl From<&Var> for Expr {
    fn from(value: &Var) -> Self {
        Expr::new(ExprNode::Var(value.clone()))
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}
