//! Host-side twiddle tables of two-factor kernels.
//!
//! Stage `f > 0` of a factorization `N_0 x ... x N_{L-1}` reads the block
//! `tw[j + N_f * i] = exp(dir * 2 pi i * i * j / (J1 * N_f))` for `i < J1`, `j < N_f`, where
//! `J1 = N_0 * ... * N_{f-1}`. Blocks are laid out from the last stage to the first. Real
//! transforms of even length append `N_fft` factors `i * exp(dir * 2 pi i * i / (2 N_fft))` used to
//! untangle the half-length spectrum.

use crate::configuration::Direction;
use crate::math::Complex;

const TAU: f64 = std::f64::consts::TAU;

/// Offset of the half-length untangling factors, i.e. the size of the inter-stage blocks.
pub fn two_n_offset(factors: &[usize]) -> usize {
    factors
        .iter()
        .scan(1, |prod, &f| {
            *prod *= f;
            Some(*prod)
        })
        .skip(1)
        .sum()
}

/// Complete twiddle table for `factors`, with the untangling factors when `have_2n` is set.
pub fn create_twiddle(direction: Direction, factors: &[usize], have_2n: bool) -> Vec<Complex> {
    let dir = direction.sign() as f64;
    let n_fft: usize = factors.iter().product();
    let mut table = Vec::with_capacity(two_n_offset(factors) + if have_2n { n_fft } else { 0 });

    let mut j1 = n_fft;
    for &nf in factors.iter().skip(1).rev() {
        j1 /= nf;
        let scale = dir * TAU / (j1 * nf) as f64;
        for i in 0..j1 {
            for j in 0..nf {
                table.push(Complex::cis(scale * (i * j) as f64));
            }
        }
    }

    if have_2n {
        let scale = dir * TAU / (2 * n_fft) as f64;
        for i in 0..n_fft {
            let (sin, cos) = (scale * i as f64).sin_cos();
            table.push(Complex::new(-sin, cos));
        }
    }
    table
}

/// Interleaved `(re, im)` pairs, the layout of a `constant real2*` buffer.
pub fn interleaved(table: &[Complex]) -> Vec<f64> {
    table.iter().flat_map(|c| [c.re, c.im]).collect()
}
