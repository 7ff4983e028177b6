//! Powers of the N-th root of unity `w_N = exp(2 pi i / N)`.

use once_cell::sync::Lazy;

use crate::math::{Complex, gcd};

/// Largest order served from the lookup table.
pub const MAX_LUT_ORDER: usize = 64;

const TAU: f64 = std::f64::consts::TAU;

/// `LUT[n][k] = w_n^k` for `k <= n / 2`, with exact values on the axes and diagonals.
static LUT: Lazy<Vec<Vec<Complex>>> = Lazy::new(|| {
    (0..=MAX_LUT_ORDER)
        .map(|n| (0..=n / 2).map(|k| exact_power(k, n)).collect())
        .collect()
});

fn exact_power(k: usize, n: usize) -> Complex {
    if n == 0 || k == 0 {
        return Complex::ONE;
    }
    let half = std::f64::consts::FRAC_1_SQRT_2;
    match (8 * k) as f64 / n as f64 {
        x if x == 1.0 => Complex::new(half, half),
        x if x == 2.0 => Complex::new(0.0, 1.0),
        x if x == 3.0 => Complex::new(-half, half),
        x if x == 4.0 => Complex::new(-1.0, 0.0),
        _ => Complex::cis(TAU * k as f64 / n as f64),
    }
}

/// Reduces `w_n^k` to the coprime `(k, n)` with `|k| <= n / 2`.
///
/// Returns `(0, 0)` when both `k` and `n` are zero.
pub fn simplify_power_of_w(k: i64, n: i64) -> (i64, i64) {
    let k = k % n.max(1);
    let g = gcd(k, n);
    if g == 0 {
        return (0, 0);
    }
    let (mut k, n) = (k / g, n / g);
    if 2 * k > n {
        k -= n;
    } else if 2 * k < -n {
        k += n;
    }
    (k, n)
}

/// `w_n^k`
pub fn power_of_w(k: i64, n: i64) -> Complex {
    let (k, n) = simplify_power_of_w(k, n);
    if n == 0 {
        return Complex::ONE;
    }
    let k_abs = k.unsigned_abs() as usize;
    let n_abs = n as usize;
    if n_abs <= MAX_LUT_ORDER {
        let w = LUT[n_abs][k_abs];
        return if k < 0 { w.conj() } else { w };
    }
    Complex::cis(TAU / n as f64 * k as f64)
}
