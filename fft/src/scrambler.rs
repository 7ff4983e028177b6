//! Digit-reversal permutations of the Cooley-Tukey network.
//!
//! Given `N = N_1 * ... * N_d`, an index `i = i_1 + i_2 N_1 + ... + i_d N_1...N_{d-1}` is scrambled
//! to `i_d + i_{d-1} N_d + ... + i_1 N_d...N_2`. Indices beyond `N` keep their super-period,
//! `scramble(kN + r) == kN + scramble(r)`, unless the permutation is restricted to `[0, N)`.
//!
//! Both directions work on host integers and on kernel expressions, so the generators can
//! permute statically known and run-time indices alike.

use std::ops::{Add, Div, Mul, Rem};

use fftgen_ir::Expr;
use smallvec::SmallVec;

/// Index type a permutation can be evaluated on.
pub trait IndexValue:
    Clone + Add<Self, Output = Self> + Mul<usize, Output = Self> + Div<usize, Output = Self> + Rem<usize, Output = Self>
{
    fn zero() -> Self;
}

impl IndexValue for usize {
    fn zero() -> Self {
        0
    }
}

impl IndexValue for Expr {
    fn zero() -> Self {
        Expr::from(0u32)
    }
}

/// Maps natural order to digit-reversed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrambler {
    factors: SmallVec<[usize; 8]>,
    in_0_to_n: bool,
}

/// Inverse of [`Scrambler`] for the same factorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unscrambler {
    factors: SmallVec<[usize; 8]>,
    in_0_to_n: bool,
}

impl Scrambler {
    pub fn new(factors: &[usize]) -> Self {
        Self { factors: factors.into(), in_0_to_n: false }
    }

    /// Drops the super-period term; indices must then lie in `[0, N)`.
    pub fn in_0_to_n(mut self, enabled: bool) -> Self {
        self.in_0_to_n = enabled;
        self
    }

    pub fn apply<T: IndexValue>(&self, index: T) -> T {
        permute(self.factors.iter().copied(), self.in_0_to_n, self.factors.len(), index)
    }
}

impl Unscrambler {
    pub fn new(factors: &[usize]) -> Self {
        Self { factors: factors.into(), in_0_to_n: false }
    }

    /// Drops the super-period term; indices must then lie in `[0, N)`.
    pub fn in_0_to_n(mut self, enabled: bool) -> Self {
        self.in_0_to_n = enabled;
        self
    }

    pub fn apply<T: IndexValue>(&self, index: T) -> T {
        permute(self.factors.iter().rev().copied(), self.in_0_to_n, self.factors.len(), index)
    }
}

fn permute<T: IndexValue>(factors: impl Iterator<Item = usize>, in_0_to_n: bool, len: usize, mut index: T) -> T {
    if len == 1 && in_0_to_n {
        return index;
    }
    let mut result = T::zero();
    let mut n = 1;
    for ni in factors {
        result = result * ni + index.clone() % ni;
        index = index / ni;
        n *= ni;
    }
    if in_0_to_n { result } else { result + index * n }
}
