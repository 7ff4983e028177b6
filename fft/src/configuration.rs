//! Logical FFT configuration.
//!
//! A configuration describes a batched transform over a column-major tensor of shape
//! `M x N_1 [x N_2 [x N_3]] x K`: `M` and `K` are batch extents surrounding the transformed
//! modes. Strides are given per tensor mode in units of the element type (real numbers for the
//! real side of r2c / c2r, complex numbers otherwise).

use std::fmt;

use smallvec::SmallVec;

use crate::error::{DirectionMismatchSnafu, Error, Result};
use crate::precision::Precision;

/// Largest tensor order, `M x N_1 x N_2 x N_3 x K`.
pub const MAX_TENSOR_DIM: usize = 5;
/// Largest number of transformed modes.
pub const MAX_FFT_DIM: usize = 3;

pub type Shape = [usize; MAX_TENSOR_DIM];

/// Kind of transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformKind {
    #[default]
    C2c,
    R2c,
    C2r,
}

impl TransformKind {
    pub fn is_real(self) -> bool {
        matches!(self, TransformKind::R2c | TransformKind::C2r)
    }
}

/// Sign of the exponent, `-1` forward and `+1` backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward = -1,
    Backward = 1,
}

impl Direction {
    pub const fn sign(self) -> i64 {
        self as i64
    }
}

/// Kernel-language source with optional load and store callbacks.
///
/// A load callback has the signature `T load(global T* in, size_t offset, global void* user_data)`
/// and a store callback `void store(global T* out, size_t offset, T value, global void* user_data)`,
/// where `T` is the element type of the respective side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserModule {
    pub source: String,
    pub load_function: Option<String>,
    pub store_function: Option<String>,
}

impl UserModule {
    pub fn is_empty(&self) -> bool {
        self.load_function.is_none() && self.store_function.is_none()
    }
}

/// Logical description of a batched 1-D, 2-D or 3-D transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// Number of transformed modes.
    pub dim: usize,
    /// `[M, N_1, .., N_dim, K]`; entries past `dim + 1` are ignored.
    pub shape: Shape,
    pub precision: Precision,
    pub direction: Direction,
    pub kind: TransformKind,
    pub istride: Shape,
    pub ostride: Shape,
    pub callbacks: Option<UserModule>,
}

impl Configuration {
    /// One-dimensional configuration with default in-place strides.
    pub fn new_1d(m: usize, n: usize, k: usize, precision: Precision, direction: Direction, kind: TransformKind) -> Self {
        Self::new(1, &[m, n, k], precision, direction, kind, true)
    }

    /// Configuration with default strides; `shape` holds `dim + 2` entries.
    pub fn new(
        dim: usize,
        shape: &[usize],
        precision: Precision,
        direction: Direction,
        kind: TransformKind,
        inplace: bool,
    ) -> Self {
        let mut full = [1; MAX_TENSOR_DIM];
        for (dst, src) in full.iter_mut().zip(shape) {
            *dst = *src;
        }
        let mut cfg = Self {
            dim,
            shape: full,
            precision,
            direction,
            kind,
            istride: [0; MAX_TENSOR_DIM],
            ostride: [0; MAX_TENSOR_DIM],
            callbacks: None,
        };
        cfg.set_strides_default(inplace);
        cfg
    }

    pub fn with_callbacks(mut self, callbacks: UserModule) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn set_strides_default(&mut self, inplace: bool) {
        self.istride = default_istride(self.dim, &self.shape, self.kind, inplace);
        self.ostride = default_ostride(self.dim, &self.shape, self.kind, inplace);
    }

    /// Meaningful prefix of the shape, `[M, N_1, .., N_dim, K]`.
    pub fn tensor_shape(&self) -> &[usize] {
        &self.shape[..self.dim + 2]
    }

    pub fn m(&self) -> usize {
        self.shape[0]
    }

    /// Length of the first transformed mode.
    pub fn n(&self) -> usize {
        self.shape[1]
    }

    pub fn k(&self) -> usize {
        self.shape[self.dim + 1]
    }

    /// Transformed extents `N_1 .. N_dim`.
    pub fn fft_shape(&self) -> SmallVec<[usize; MAX_FFT_DIM]> {
        self.shape[1..=self.dim].iter().copied().collect()
    }

    /// r2c must be forward and c2r backward.
    pub fn check_direction(&self) -> Result<()> {
        let ok = match self.kind {
            TransformKind::C2c => true,
            TransformKind::R2c => self.direction == Direction::Forward,
            TransformKind::C2r => self.direction == Direction::Backward,
        };
        snafu::ensure!(ok, DirectionMismatchSnafu { kind: self.kind, direction: self.direction });
        Ok(())
    }

    /// Input and output alias the same buffer.
    ///
    /// Real transforms compare strides in real units, so the complex side is scaled by two.
    pub fn is_inplace(&self) -> bool {
        let mut istride = self.istride;
        let mut ostride = self.ostride;
        match self.kind {
            TransformKind::R2c => ostride[2..].iter_mut().for_each(|s| *s *= 2),
            TransformKind::C2r => istride[2..].iter_mut().for_each(|s| *s *= 2),
            TransformKind::C2c => {}
        }
        istride[..self.dim + 2] == ostride[..self.dim + 2]
    }

    pub fn has_callbacks(&self) -> bool {
        self.callbacks.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Packed column-major input strides.
///
/// The first transformed mode of a real transform stores `N / 2 + 1` complex numbers; in-place
/// r2c input is padded to `2 (N / 2 + 1)` reals so both sides share the buffer.
pub fn default_istride(dim: usize, shape: &Shape, kind: TransformKind, inplace: bool) -> Shape {
    let shape1 = match kind {
        TransformKind::R2c if inplace => 2 * (shape[1] / 2 + 1),
        TransformKind::R2c | TransformKind::C2c => shape[1],
        TransformKind::C2r => shape[1] / 2 + 1,
    };
    let mut stride = [0; MAX_TENSOR_DIM];
    stride[0] = 1;
    stride[1] = shape[0];
    stride[2] = shape1 * shape[0];
    for d in 1..dim.min(MAX_TENSOR_DIM - 2) {
        stride[d + 2] = shape[d + 1] * stride[d + 1];
    }
    stride
}

/// Packed column-major output strides; the mirror image of [`default_istride`].
pub fn default_ostride(dim: usize, shape: &Shape, kind: TransformKind, inplace: bool) -> Shape {
    let mirrored = match kind {
        TransformKind::R2c => TransformKind::C2r,
        TransformKind::C2r => TransformKind::R2c,
        TransformKind::C2c => TransformKind::C2c,
    };
    default_istride(dim, shape, mirrored, inplace)
}

// =============================================================================
// Descriptor text form
// =============================================================================

impl Configuration {
    /// Descriptor text, rejecting r2c in backward and c2r in forward direction.
    pub fn descriptor(&self) -> Result<String> {
        self.check_direction()?;
        Ok(self.to_string())
    }
}

/// `<s|d><c|r><f|b><i|o>[M.]N[xN2[xN3]][*K][i<strides>][o<strides>]`
///
/// The real domain letter does not distinguish r2c from c2r; the direction letter does. See
/// [`Configuration::descriptor`] for the checked form.
impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = match self.precision {
            Precision::F32 => 's',
            Precision::F64 => 'd',
        };
        let domain = if self.kind.is_real() { 'r' } else { 'c' };
        let direction = match self.direction {
            Direction::Forward => 'f',
            Direction::Backward => 'b',
        };
        let inplace = self.is_inplace();
        write!(f, "{precision}{domain}{direction}{}", if inplace { 'i' } else { 'o' })?;

        if self.m() != 1 {
            write!(f, "{}.", self.m())?;
        }
        write!(f, "{}", self.shape[1])?;
        for d in 1..self.dim {
            write!(f, "x{}", self.shape[1 + d])?;
        }
        if self.k() != 1 {
            write!(f, "*{}", self.k())?;
        }

        let modes = self.dim + 2;
        if self.istride[..modes] != default_istride(self.dim, &self.shape, self.kind, inplace)[..modes] {
            write!(f, "i{}", itertools::join(&self.istride[..modes], ","))?;
        }
        if self.ostride[..modes] != default_ostride(self.dim, &self.shape, self.kind, inplace)[..modes] {
            write!(f, "o{}", itertools::join(&self.ostride[..modes], ","))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Configuration {
    type Err = Error;

    fn from_str(desc: &str) -> Result<Self> {
        crate::descriptor::parse_fft_descriptor(desc)
    }
}
