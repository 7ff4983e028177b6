//! Kernel generators.
//!
//! # Module Organization
//!
//! - [`mixed_radix`] - Register-level Cooley-Tukey network
//! - [`snippet`] - Copy loops shared by both families
//! - [`sbfft`] - Small-batch kernels, one full transform per work-item
//! - [`f2fft`] - Shared-local-memory kernels with one factor per stage

pub mod f2fft;
pub mod mixed_radix;
pub mod sbfft;
pub mod snippet;

use fftgen_ir::prelude::*;

use crate::configuration::{Direction, TransformKind};
use crate::precision::Precision;
use crate::tensor::Accessor;

/// How a transform kind maps onto a complex FFT.
///
/// Even real lengths pack neighbouring samples into one complex number and run a half-length
/// FFT. Odd real lengths pack two batch entries into the real and imaginary lanes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Variant {
    C2c,
    R2cHalf,
    R2cDouble,
    C2rHalf,
    C2rDouble,
}

impl Variant {
    pub fn new(kind: TransformKind, n: usize) -> Self {
        let even = n % 2 == 0;
        match kind {
            TransformKind::C2c => Variant::C2c,
            TransformKind::R2c if even => Variant::R2cHalf,
            TransformKind::R2c => Variant::R2cDouble,
            TransformKind::C2r if even => Variant::C2rHalf,
            TransformKind::C2r => Variant::C2rDouble,
        }
    }

    pub fn is_half(self) -> bool {
        matches!(self, Variant::R2cHalf | Variant::C2rHalf)
    }

    pub fn is_double(self) -> bool {
        matches!(self, Variant::R2cDouble | Variant::C2rDouble)
    }
}

/// Extents of the data a kernel moves around, all counted in elements of the respective side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub variant: Variant,
    /// Elements per transform on the input side.
    pub n_in: usize,
    /// Elements per transform on the output side.
    pub n_out: usize,
    /// Complex numbers per transform in shared local memory.
    pub n_slm: usize,
    /// Length of the complex FFT that is actually computed.
    pub n_fft: usize,
    /// 1 for real input, 2 for complex input.
    pub in_components: usize,
    pub out_components: usize,
    /// Batch entries consumed per FFT, 2 for the double variants.
    pub k_stride: usize,
}

impl Layout {
    /// Layout of small-batch kernels.
    pub fn small_batch(kind: TransformKind, n: usize) -> Self {
        let variant = Variant::new(kind, n);
        let (n_stride, k_stride) = Self::strides(variant);
        let half = n / 2 + 1;
        match kind {
            TransformKind::C2c => Self::c2c(variant, n),
            TransformKind::R2c => Self {
                variant,
                n_in: n,
                n_out: half,
                n_slm: half,
                n_fft: n / n_stride,
                in_components: 1,
                out_components: 2,
                k_stride,
            },
            TransformKind::C2r => Self {
                variant,
                n_in: half,
                n_out: n,
                n_slm: half,
                n_fft: n / n_stride,
                in_components: 2,
                out_components: 1,
                k_stride,
            },
        }
    }

    /// Layout of two-factor kernels; shared memory keeps one extra slot for the Nyquist term.
    pub fn factor2(kind: TransformKind, n: usize) -> Self {
        let variant = Variant::new(kind, n);
        match kind {
            TransformKind::C2c => Self::c2c(variant, n),
            TransformKind::R2c | TransformKind::C2r => {
                let mut layout = Self::small_batch(kind, n);
                layout.n_slm = layout.n_fft + 1;
                layout
            }
        }
    }

    fn c2c(variant: Variant, n: usize) -> Self {
        Self { variant, n_in: n, n_out: n, n_slm: n, n_fft: n, in_components: 2, out_components: 2, k_stride: 1 }
    }

    /// `(n_stride, k_stride)`: samples and batch entries folded into one complex number.
    fn strides(variant: Variant) -> (usize, usize) {
        match variant {
            Variant::C2c => (1, 1),
            Variant::R2cHalf | Variant::C2rHalf => (2, 1),
            Variant::R2cDouble | Variant::C2rDouble => (1, 2),
        }
    }
}

/// Options that change the emitted code but not the launch contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub butterfly: mixed_radix::Butterfly,
    pub simplify: bool,
    /// Kernel name; the configuration identifier when `None`.
    pub name: Option<String>,
}

// =============================================================================
// Helpers shared by both families
// =============================================================================

pub(crate) fn uint() -> DataType {
    DataType::generic(BuiltinType::Uint)
}

pub(crate) fn size_t() -> DataType {
    DataType::generic(BuiltinType::SizeT)
}

pub(crate) fn short() -> DataType {
    DataType::generic(BuiltinType::Short)
}

/// `select(bound, x, x < bound)`, i.e. `min(x, bound)` for unsigned `x`.
pub(crate) fn clamp_below(x: &Expr, bound: usize) -> Expr {
    select(bound, x, x.lt(bound))
}

/// `(re, im)` as a complex vector of `precision`.
pub(crate) fn complex(precision: Precision, re: impl Into<Expr>, im: impl Into<Expr>) -> Expr {
    init_vector(precision.complex(AddrSpace::Generic), [re.into(), im.into()])
}

/// `conj(x)`.
pub(crate) fn conj(precision: Precision, x: &Expr) -> Expr {
    complex(precision, x.s(&[0]), -x.s(&[1]))
}

/// `i * x`.
pub(crate) fn times_i(precision: Precision, x: &Expr) -> Expr {
    complex(precision, -x.s(&[1]), x.s(&[0]))
}

/// Global accessors for `in` and `out`, routed through the user callbacks where present.
pub(crate) fn global_accessors(
    in_: &Expr,
    in_ty: &DataType,
    out: &Expr,
    out_ty: &DataType,
    load_function: Option<&str>,
    store_function: Option<&str>,
    user_data: Option<&Expr>,
) -> (Accessor, Accessor) {
    let in_acc = match (load_function, user_data) {
        (Some(load), Some(user_data)) => {
            Accessor::callback(in_, in_ty.clone(), Some(load.to_string()), None, user_data)
        }
        _ => Accessor::array(in_, in_ty.clone()),
    };
    let out_acc = match (store_function, user_data) {
        (Some(store), Some(user_data)) => {
            Accessor::callback(out, out_ty.clone(), None, Some(store.to_string()), user_data)
        }
        _ => Accessor::array(out, out_ty.clone()),
    };
    (in_acc, out_acc)
}

/// `m` for forward, `p` for backward, followed by the magnitude; used in kernel identifiers.
pub(crate) fn direction_tag(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "m1",
        Direction::Backward => "p1",
    }
}
