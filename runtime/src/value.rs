//! Values manipulated by the interpreter.
//!
//! Integers are kept as 64-bit signed or unsigned numbers and truncated to the width of their
//! declared type on conversion. Floating-point arithmetic runs in double precision; conversion
//! to `float` rounds to single precision.

use fftgen_dtype::{BuiltinType, DataType};
use fftgen_ir::BinaryOp;
use smallvec::SmallVec;
use snafu::OptionExt;

use crate::error::{DivisionByZeroSnafu, Result, TypeMismatchSnafu};
use crate::memory::Pointer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    /// Zero of the given element kind.
    pub fn zero(ty: BuiltinType) -> Self {
        if ty.is_float() {
            Scalar::Float(0.0)
        } else if ty.is_signed() {
            Scalar::Int(0)
        } else {
            Scalar::UInt(0)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::UInt(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Scalar::Int(v) => v,
            Scalar::UInt(v) => v as i64,
            Scalar::Float(v) => v as i64,
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Scalar::Int(v) => v as u64,
            Scalar::UInt(v) => v,
            Scalar::Float(v) => v as u64,
        }
    }

    pub fn is_true(self) -> bool {
        match self {
            Scalar::Int(v) => v != 0,
            Scalar::UInt(v) => v != 0,
            Scalar::Float(v) => v != 0.0,
        }
    }

    /// Conversion to an arithmetic builtin kind, `None` for kinds without a value representation.
    pub fn convert(self, ty: BuiltinType) -> Option<Scalar> {
        match ty {
            BuiltinType::Float => Some(Scalar::Float(self.as_f64() as f32 as f64)),
            BuiltinType::Double | BuiltinType::Half => Some(Scalar::Float(self.as_f64())),
            BuiltinType::Bool => Some(Scalar::UInt(self.is_true() as u64)),
            _ if ty.is_signed() => {
                let bits = ty.bytes()? * 8;
                let shift = 64 - bits as u32;
                Some(Scalar::Int((self.as_i64() << shift) >> shift))
            }
            _ if ty.is_unsigned() => {
                let bits = ty.bytes()? * 8;
                let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
                Some(Scalar::UInt(self.as_u64() & mask))
            }
            _ => None,
        }
    }

    pub fn negate(self) -> Scalar {
        match self {
            Scalar::Int(v) => Scalar::Int(v.wrapping_neg()),
            Scalar::UInt(v) => Scalar::UInt(v.wrapping_neg()),
            Scalar::Float(v) => Scalar::Float(-v),
        }
    }

    pub fn bit_not(self) -> Result<Scalar> {
        match self {
            Scalar::Int(v) => Ok(Scalar::Int(!v)),
            Scalar::UInt(v) => Ok(Scalar::UInt(!v)),
            Scalar::Float(_) => TypeMismatchSnafu { reason: "bitwise not of a floating-point value" }.fail(),
        }
    }

    /// Usual arithmetic conversions: floating wins over unsigned, unsigned over signed.
    fn promote(a: Scalar, b: Scalar) -> Promoted {
        match (a, b) {
            (Scalar::Float(_), _) | (_, Scalar::Float(_)) => Promoted::Float(a.as_f64(), b.as_f64()),
            (Scalar::UInt(_), _) | (_, Scalar::UInt(_)) => Promoted::UInt(a.as_u64(), b.as_u64()),
            _ => Promoted::Int(a.as_i64(), b.as_i64()),
        }
    }

    /// Arithmetic, bitwise and shift operators. Integer arithmetic wraps.
    pub fn arith(op: BinaryOp, a: Scalar, b: Scalar) -> Result<Scalar> {
        use BinaryOp::*;
        let not_arithmetic = || TypeMismatchSnafu { reason: format!("'{}' is not arithmetic", op.as_str()) };
        let value = match Self::promote(a, b) {
            Promoted::Float(x, y) => Scalar::Float(match op {
                Add => x + y,
                Subtract => x - y,
                Multiply => x * y,
                Divide => x / y,
                _ => return not_arithmetic().fail(),
            }),
            Promoted::UInt(x, y) => Scalar::UInt(match op {
                Add => x.wrapping_add(y),
                Subtract => x.wrapping_sub(y),
                Multiply => x.wrapping_mul(y),
                Divide => x.checked_div(y).context(DivisionByZeroSnafu)?,
                Modulo => x.checked_rem(y).context(DivisionByZeroSnafu)?,
                BitwiseAnd => x & y,
                BitwiseOr => x | y,
                BitwiseXor => x ^ y,
                LeftShift => x.wrapping_shl(y as u32),
                RightShift => x.wrapping_shr(y as u32),
                _ => return not_arithmetic().fail(),
            }),
            Promoted::Int(x, y) => Scalar::Int(match op {
                Add => x.wrapping_add(y),
                Subtract => x.wrapping_sub(y),
                Multiply => x.wrapping_mul(y),
                Divide => x.checked_div(y).context(DivisionByZeroSnafu)?,
                Modulo => x.checked_rem(y).context(DivisionByZeroSnafu)?,
                BitwiseAnd => x & y,
                BitwiseOr => x | y,
                BitwiseXor => x ^ y,
                LeftShift => x.wrapping_shl(y as u32),
                RightShift => x.wrapping_shr(y as u32),
                _ => return not_arithmetic().fail(),
            }),
        };
        Ok(value)
    }

    pub fn compare(op: BinaryOp, a: Scalar, b: Scalar) -> Result<bool> {
        use BinaryOp::*;
        let ordering = match Self::promote(a, b) {
            Promoted::Float(x, y) => x.partial_cmp(&y),
            Promoted::UInt(x, y) => Some(x.cmp(&y)),
            Promoted::Int(x, y) => Some(x.cmp(&y)),
        };
        let Some(ordering) = ordering else {
            return Ok(op == NotEqual);
        };
        Ok(match op {
            Less => ordering.is_lt(),
            LessEqual => ordering.is_le(),
            Greater => ordering.is_gt(),
            GreaterEqual => ordering.is_ge(),
            Equal => ordering.is_eq(),
            NotEqual => ordering.is_ne(),
            _ => return TypeMismatchSnafu { reason: format!("'{}' is not a comparison", op.as_str()) }.fail(),
        })
    }
}

/// Operand pair after the usual arithmetic conversions.
enum Promoted {
    Float(f64, f64),
    UInt(u64, u64),
    Int(i64, i64),
}

pub type Lanes = SmallVec<[Scalar; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of calls without a value and of fence flags.
    Void,
    Scalar(Scalar),
    Vector(Lanes),
    Pointer(Pointer),
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Pointer> for Value {
    fn from(value: Pointer) -> Self {
        Value::Pointer(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Scalar(Scalar::UInt(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Scalar(Scalar::UInt(value as u64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(Scalar::Float(value))
    }
}

impl Value {
    /// Two-lane floating-point vector.
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Vector(SmallVec::from_slice(&[Scalar::Float(re), Scalar::Float(im)]))
    }

    /// Scalar for one lane, vector otherwise.
    pub fn from_lanes(lanes: Lanes) -> Self {
        match lanes.as_slice() {
            [single] => Value::Scalar(*single),
            _ => Value::Vector(lanes),
        }
    }

    /// Lanes of a scalar or vector.
    pub fn lanes(&self) -> Result<&[Scalar]> {
        match self {
            Value::Scalar(s) => Ok(std::slice::from_ref(s)),
            Value::Vector(lanes) => Ok(lanes),
            other => TypeMismatchSnafu { reason: format!("{other:?} has no lanes") }.fail(),
        }
    }

    pub fn scalar(&self) -> Result<Scalar> {
        match self {
            Value::Scalar(s) => Ok(*s),
            other => TypeMismatchSnafu { reason: format!("expected a scalar, got {other:?}") }.fail(),
        }
    }

    pub fn pointer(&self) -> Result<Pointer> {
        match self {
            Value::Pointer(p) => Ok(*p),
            other => TypeMismatchSnafu { reason: format!("expected a pointer, got {other:?}") }.fail(),
        }
    }

    /// Truth value of a scalar condition.
    pub fn is_true(&self) -> Result<bool> {
        match self {
            Value::Pointer(_) => Ok(true),
            other => Ok(other.scalar()?.is_true()),
        }
    }

    /// Integer scalar as an index.
    pub fn index(&self) -> Result<i64> {
        match self.scalar()? {
            Scalar::Float(_) => TypeMismatchSnafu { reason: "floating-point index" }.fail(),
            s => Ok(s.as_i64()),
        }
    }

    /// Lane-wise `f`, broadcasting scalars against vectors.
    pub fn zip_with(&self, other: &Value, mut f: impl FnMut(Scalar, Scalar) -> Result<Scalar>) -> Result<Value> {
        let (a, b) = (self.lanes()?, other.lanes()?);
        let lanes: Lanes = match (a.len(), b.len()) {
            (x, y) if x == y => a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect::<Result<_>>()?,
            (1, _) => b.iter().map(|&y| f(a[0], y)).collect::<Result<_>>()?,
            (_, 1) => a.iter().map(|&x| f(x, b[0])).collect::<Result<_>>()?,
            (x, y) => return TypeMismatchSnafu { reason: format!("vector widths {x} and {y}") }.fail(),
        };
        Ok(match (self, other) {
            (Value::Scalar(_), Value::Scalar(_)) => Value::Scalar(lanes[0]),
            _ => Value::Vector(lanes),
        })
    }

    pub fn map(&self, mut f: impl FnMut(Scalar) -> Result<Scalar>) -> Result<Value> {
        Ok(match self {
            Value::Scalar(s) => Value::Scalar(f(*s)?),
            Value::Vector(lanes) => Value::Vector(lanes.iter().map(|&s| f(s)).collect::<Result<_>>()?),
            other => return TypeMismatchSnafu { reason: format!("{other:?} is not arithmetic") }.fail(),
        })
    }

    /// Arithmetic including pointer offsets and pointer differences.
    pub fn arith(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
        match (a, b) {
            (Value::Pointer(p), Value::Scalar(_)) => match op {
                BinaryOp::Add => Ok(Value::Pointer(p.offset_by(b.index()?))),
                BinaryOp::Subtract => Ok(Value::Pointer(p.offset_by(-b.index()?))),
                _ => TypeMismatchSnafu { reason: format!("'{}' on a pointer", op.as_str()) }.fail(),
            },
            (Value::Scalar(_), Value::Pointer(p)) if op == BinaryOp::Add => Ok(Value::Pointer(p.offset_by(a.index()?))),
            (Value::Pointer(p), Value::Pointer(q)) if op == BinaryOp::Subtract && p.buffer == q.buffer => {
                Ok(Value::Scalar(Scalar::Int(((p.offset - q.offset) / p.width as isize) as i64)))
            }
            _ => a.zip_with(b, |x, y| Scalar::arith(op, x, y)),
        }
    }

    /// Comparison; scalars yield `1` or `0`, vectors `-1` or `0` per lane.
    pub fn compare(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
        if let (Value::Pointer(p), Value::Pointer(q)) = (a, b) {
            let (x, y) = (Scalar::Int(p.offset as i64), Scalar::Int(q.offset as i64));
            let same = p.buffer == q.buffer;
            let result = match op {
                BinaryOp::Equal => same && Scalar::compare(op, x, y)?,
                BinaryOp::NotEqual => !same || Scalar::compare(op, x, y)?,
                _ => Scalar::compare(op, x, y)?,
            };
            return Ok(Value::Scalar(Scalar::Int(result as i64)));
        }
        let vector = matches!(a, Value::Vector(_)) || matches!(b, Value::Vector(_));
        let truth = if vector { -1 } else { 1 };
        a.zip_with(b, |x, y| Ok(Scalar::Int(if Scalar::compare(op, x, y)? { truth } else { 0 })))
    }

    /// Conversion to a declared type.
    ///
    /// Scalars broadcast to vectors, pointers take the element width and kind of the new
    /// pointee. Arrays keep their value; they only appear through declarations.
    pub fn convert(self, ty: &DataType) -> Result<Value> {
        let mismatch = |value: &Value| TypeMismatchSnafu { reason: format!("cannot convert {value:?} to {ty:?}") };
        match ty {
            DataType::Scalar { ty: builtin, .. } => match &self {
                Value::Scalar(s) => s.convert(*builtin).map(Value::Scalar).ok_or_else(|| mismatch(&self).build()),
                Value::Void if *builtin == BuiltinType::Void => Ok(Value::Void),
                _ => mismatch(&self).fail(),
            },
            DataType::Vector { ty: builtin, width, .. } => {
                let lanes = self.lanes()?;
                let lanes: Lanes = match lanes.len() {
                    1 => std::iter::repeat_n(lanes[0], *width as usize).collect(),
                    n if n == *width as usize => lanes.iter().copied().collect(),
                    _ => return mismatch(&self).fail(),
                };
                let converted = lanes.iter().map(|s| s.convert(*builtin)).collect::<Option<Lanes>>();
                converted.map(Value::Vector).ok_or_else(|| mismatch(&self).build())
            }
            DataType::Pointer { to, .. } => match self {
                Value::Pointer(p) => Ok(Value::Pointer(p.retyped(to))),
                _ => mismatch(&self).fail(),
            },
            DataType::Array { .. } => Ok(self),
        }
    }
}
