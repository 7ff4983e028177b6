//! Register-level mixed-radix FFT.
//!
//! For `N = N_0 * ... * N_{L-1}` the Cooley-Tukey network is unrolled at generation time: every
//! stage computes length-`N_f` DFTs by direct summation, multiplies by the inter-stage twiddle
//! factors and writes back in place. All indices are host integers, so the emitted code is
//! straight-line. After the last stage `x[p]` holds frequency `scramble(p)`.

use std::collections::HashMap;

use fftgen_ir::prelude::*;

use crate::math::Complex;
use crate::precision::Precision;
use crate::root_of_unity::{power_of_w, simplify_power_of_w};
use crate::scrambler::Scrambler;

/// Strategy for the elementary DFT sums of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Butterfly {
    /// `x_0 + sum_j w^(kj) x_j` with one complex product per term.
    #[strum(serialize = "basic")]
    Basic,
    /// Terms with conjugate twiddles share one real and one imaginary product.
    #[strum(serialize = "pair")]
    PairOptimized,
}

/// Complex arithmetic on two-lane vectors.
#[derive(Debug, Clone, Copy)]
pub struct ComplexMul {
    precision: Precision,
}

impl ComplexMul {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    fn vector(&self, re: Expr, im: Expr) -> Expr {
        init_vector(self.precision.complex(AddrSpace::Generic), [re, im])
    }

    /// `c * w` for a constant `w`.
    pub fn by_constant(&self, c: &Expr, w: Complex) -> Expr {
        let wr = self.precision.constant(w.re);
        let wi = self.precision.constant(w.im);
        self.vector(c.s(&[0]) * &wr - c.s(&[1]) * &wi, c.s(&[0]) * wi + c.s(&[1]) * wr)
    }

    /// `c * w` for a run-time `w`.
    pub fn by_expr(&self, c: &Expr, w: &Expr) -> Expr {
        self.vector(
            c.s(&[0]) * w.s(&[0]) - c.s(&[1]) * w.s(&[1]),
            c.s(&[0]) * w.s(&[1]) + c.s(&[1]) * w.s(&[0]),
        )
    }

    /// `Re(w) (x1 + x2)`
    pub fn pair_real(&self, x1: &Expr, x2: &Expr, w: Complex) -> Expr {
        self.precision.constant(w.re) * (x1 + x2)
    }

    /// `Im(w) i (x1 - x2)`
    pub fn pair_imag(&self, x1: &Expr, x2: &Expr, w: Complex) -> Expr {
        self.precision.constant(w.im) * self.vector(x2.s(&[1]) - x1.s(&[1]), x1.s(&[0]) - x2.s(&[0]))
    }
}

/// `w_n^k` as an unreduced exponent pair, see [`simplify_power_of_w`].
type WArg = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Product {
    w_arg: WArg,
    jf: usize,
}

/// Elementary sums `y_kf = sum_jf w_Nf^(dir kf jf) x_jf` of one `(j, k)` column.
struct ElementarySum<F> {
    butterfly: Butterfly,
    cmul: ComplexMul,
    direction: i64,
    nf: usize,
    x: F,
    /// Pair products already declared for this column, reusable with flipped sign.
    available_pairs: HashMap<(Product, Product), (Expr, Expr)>,
}

impl<F: Fn(usize) -> Expr> ElementarySum<F> {
    fn new(butterfly: Butterfly, cmul: ComplexMul, direction: i64, nf: usize, x: F) -> Self {
        Self { butterfly, cmul, direction, nf, x, available_pairs: HashMap::new() }
    }

    fn sum(&mut self, bb: &mut BlockBuilder, kf: usize) -> Expr {
        match self.butterfly {
            Butterfly::PairOptimized if kf != 0 => self.pair_sum(bb, kf),
            _ => self.basic_sum(kf),
        }
    }

    fn exponent(&self, kf: usize, jf: usize) -> i64 {
        self.direction * (kf * jf) as i64
    }

    fn basic_sum(&self, kf: usize) -> Expr {
        (1..self.nf).fold((self.x)(0), |esum, jf| {
            let w = power_of_w(self.exponent(kf, jf), self.nf as i64);
            esum + self.cmul.by_constant(&(self.x)(jf), w)
        })
    }

    fn pair_sum(&mut self, bb: &mut BlockBuilder, kf: usize) -> Expr {
        let mut singletons: Vec<Product> = Vec::new();
        let mut pairs: Vec<(Product, Product)> = Vec::new();
        for jf in 1..self.nf {
            let w_arg = simplify_power_of_w(self.exponent(kf, jf), self.nf as i64);
            let conjugate = (-w_arg.0, w_arg.1);
            match singletons.iter().position(|p| p.w_arg == conjugate) {
                Some(pos) => pairs.push((singletons.remove(pos), Product { w_arg, jf })),
                None => singletons.push(Product { w_arg, jf }),
            }
        }

        let mut esum = (self.x)(0);
        for s in &singletons {
            let w = power_of_w(s.w_arg.0, s.w_arg.1);
            esum = esum + self.cmul.by_constant(&(self.x)(s.jf), w);
        }
        for pair in pairs {
            let flip = |p: Product| Product { w_arg: (-p.w_arg.0, p.w_arg.1), ..p };
            if let Some((v1, v2)) = self.available_pairs.get(&(flip(pair.0), flip(pair.1))) {
                esum = esum + v1 - v2;
                continue;
            }
            let (p1, p2) = if pair.0.w_arg.0 < 0 { (pair.1, pair.0) } else { pair };
            let x1 = (self.x)(p1.jf);
            let x2 = (self.x)(p2.jf);
            let w = power_of_w(p1.w_arg.0, p1.w_arg.1);
            let ty = self.cmul.precision().complex(AddrSpace::Generic);
            let v1 = bb.declare_assign(ty.clone(), "p1", self.cmul.pair_real(&x1, &x2, w));
            let v2 = bb.declare_assign(ty, "p2", self.cmul.pair_imag(&x1, &x2, w));
            esum = esum + &v1 + &v2;
            self.available_pairs.insert(pair, (v1, v2));
        }
        esum
    }
}

/// In-place FFT of the complex private array `x` over `factors`.
///
/// With `twiddle`, the outputs of the last stage are additionally multiplied by
/// `twiddle[scramble(p)]`, which fuses an outer twiddle multiplication into the store.
pub fn inplace(
    bb: &mut BlockBuilder,
    butterfly: Butterfly,
    precision: Precision,
    direction: i64,
    factors: &[usize],
    x: &Expr,
    twiddle: Option<&Expr>,
) {
    let n: usize = factors.iter().product();
    let cmul = ComplexMul::new(precision);
    let scramble = Scrambler::new(factors);
    let type2 = precision.complex(AddrSpace::Generic);
    let mut big_j = n;
    let mut big_k = 1;

    for f in (0..factors.len()).rev() {
        let nf = factors[f];
        big_j /= nf;
        let y = bb.declare(DataType::array_of(type2.clone(), nf), "y");
        let index = |j: usize, jf: usize, k: usize| j + jf * big_j + k * big_j * nf;
        for j in 0..big_j {
            for k in 0..big_k {
                let mut esum = ElementarySum::new(butterfly, cmul, direction, nf, |jf| x.at(index(j, jf, k)));
                for kf in 0..nf {
                    let sum = esum.sum(bb, kf);
                    bb.assign(y.at(kf), sum);
                    let tw = power_of_w(direction * (kf * j) as i64, (big_j * nf) as i64);
                    match twiddle {
                        Some(twiddle) if f == 0 => {
                            let tw_index = scramble.apply(index(j, kf, k));
                            let tw_tmp =
                                bb.declare_assign(type2.clone(), "tw_tmp", cmul.by_constant(&twiddle.at(tw_index), tw));
                            bb.assign(y.at(kf), cmul.by_expr(&y.at(kf), &tw_tmp));
                        }
                        _ => bb.assign(y.at(kf), cmul.by_constant(&y.at(kf), tw)),
                    }
                }
                for kf in 0..nf {
                    bb.assign(x.at(index(j, kf, k)), y.at(kf));
                }
            }
        }
        big_k *= nf;
    }
}

/// [`inplace`] with direct sums.
pub fn basic_inplace(
    bb: &mut BlockBuilder,
    precision: Precision,
    direction: i64,
    factors: &[usize],
    x: &Expr,
    twiddle: Option<&Expr>,
) {
    inplace(bb, Butterfly::Basic, precision, direction, factors, x, twiddle);
}

/// [`inplace`] with conjugate-pair sharing.
pub fn pair_optimization_inplace(
    bb: &mut BlockBuilder,
    precision: Precision,
    direction: i64,
    factors: &[usize],
    x: &Expr,
    twiddle: Option<&Expr>,
) {
    inplace(bb, Butterfly::PairOptimized, precision, direction, factors, x, twiddle);
}

// =============================================================================
// Sub-group variant
// =============================================================================

/// `i * x` for a complex number spread over two adjacent sub-group lanes.
///
/// Even lanes hold the real part and odd lanes the imaginary part; `is_odd` selects the lane
/// role. Requires `cl_intel_subgroups`.
pub fn multiply_imaginary_unit(precision: Precision, x: &Expr, is_odd: &Expr) -> Expr {
    select(
        intel_sub_group_shuffle_down(-x, -x, 1),
        intel_sub_group_shuffle_up(x, x, 1),
        cast(precision.select_type(), is_odd),
    )
}

/// In-place FFT of the real private array `x`, where each lane pair of a sub-group holds one
/// complex value.
///
/// Same network as [`basic_inplace`], but every product by an imaginary number goes through
/// [`multiply_imaginary_unit`]. `twiddle` is read as an array of complex numbers.
pub fn basic_inplace_subgroup(
    bb: &mut BlockBuilder,
    precision: Precision,
    direction: i64,
    factors: &[usize],
    x: &Expr,
    is_odd: &Expr,
    twiddle: Option<&Expr>,
) {
    let n: usize = factors.iter().product();
    let scramble = Scrambler::new(factors);
    let real = precision.real(AddrSpace::Generic);
    let mut big_j = n;
    let mut big_k = 1;

    for f in (0..factors.len()).rev() {
        let nf = factors[f];
        big_j /= nf;
        let y = bb.declare(DataType::array_of(real.clone(), nf), "y");
        let index = |j: usize, jf: usize, k: usize| j + jf * big_j + k * big_j * nf;
        for j in 0..big_j {
            for k in 0..big_k {
                for kf in 0..nf {
                    let mut ersum = x.at(index(j, 0, k));
                    let mut eisum = precision.zero();
                    for jf in 1..nf {
                        let w = power_of_w(direction * (kf * jf) as i64, nf as i64);
                        ersum = ersum + x.at(index(j, jf, k)) * precision.constant(w.re);
                        eisum = eisum + x.at(index(j, jf, k)) * precision.constant(w.im);
                    }
                    let re = bb.declare_assign(real.clone(), "re", ersum);
                    let im = bb.declare_assign(real.clone(), "im", eisum);

                    let tw = power_of_w(direction * (kf * j) as i64, (big_j * nf) as i64);
                    let tw_real = precision.constant(tw.re);
                    let tw_imag = precision.constant(tw.im);
                    let (tw_re, tw_im) = match twiddle {
                        Some(twiddle) if f == 0 => {
                            let entry = twiddle.at(scramble.apply(index(j, kf, k)));
                            let t1 = bb.declare_assign(
                                real.clone(),
                                "tw_re",
                                &tw_real * entry.s(&[0]) - &tw_imag * entry.s(&[1]),
                            );
                            let t2 = bb.declare_assign(
                                real.clone(),
                                "tw_im",
                                &tw_real * entry.s(&[1]) + &tw_imag * entry.s(&[0]),
                            );
                            (t1, t2)
                        }
                        _ => (tw_real, tw_imag),
                    };
                    let tmp = bb.declare_assign(real.clone(), "tmp", &re * &tw_im + &im * &tw_re);
                    bb.assign(
                        y.at(kf),
                        &re * &tw_re - &im * &tw_im + multiply_imaginary_unit(precision, &tmp, is_odd),
                    );
                }
                for kf in 0..nf {
                    bb.assign(x.at(index(j, kf, k)), y.at(kf));
                }
            }
        }
        big_k *= nf;
    }
}
