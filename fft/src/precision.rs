//! Floating-point precision and the kernel types derived from it.

use fftgen_ir::prelude::*;

/// Floating-point precision of the transformed data; the discriminant is the byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    #[default]
    #[strum(serialize = "f32")]
    F32 = 4,
    #[strum(serialize = "f64")]
    F64 = 8,
}

impl Precision {
    /// Bytes of one real number.
    pub const fn bytes(self) -> usize {
        self as usize
    }

    pub const fn bits(self) -> u8 {
        (self as u8) * 8
    }

    pub const fn builtin(self) -> BuiltinType {
        match self {
            Precision::F32 => BuiltinType::Float,
            Precision::F64 => BuiltinType::Double,
        }
    }

    /// Real scalar in `space`.
    pub fn real(self, space: AddrSpace) -> DataType {
        DataType::with_width(self.builtin(), 1, space)
    }

    /// Complex number as a two-lane vector in `space`.
    pub fn complex(self, space: AddrSpace) -> DataType {
        DataType::with_width(self.builtin(), 2, space)
    }

    /// One real (`components == 1`) or complex (`components == 2`) element.
    pub fn with_components(self, components: usize, space: AddrSpace) -> DataType {
        DataType::with_width(self.builtin(), components as u8, space)
    }

    /// Unsigned integer of the same width, used as the mask operand of `select`.
    pub fn select_type(self) -> DataType {
        match self {
            Precision::F32 => DataType::generic(BuiltinType::Uint),
            Precision::F64 => DataType::generic(BuiltinType::Ulong),
        }
    }

    /// Floating literal of this precision.
    pub fn constant(self, value: f64) -> Expr {
        Expr::float(value, self.bits())
    }

    pub fn zero(self) -> Expr {
        self.constant(0.0)
    }
}
