//! Factorizations of transform lengths.

use smallvec::SmallVec;

use crate::math::iroot;

/// Prime factors of `n` in ascending order; empty for `n <= 1`.
pub fn trial_division(mut n: usize) -> SmallVec<[usize; 8]> {
    let mut factors = SmallVec::new();
    let mut f = 2;
    while n > 1 {
        if n % f == 0 {
            factors.push(f);
            n /= f;
        } else {
            f += 1;
        }
    }
    factors
}

/// Splits `n` into `count` factors that are as close to `n^(1/count)` as possible.
///
/// The result is sorted ascending and multiplies to `n`; missing factors are filled with 1,
/// e.g. `factor(7, 2) == [1, 7]`. `n == 0` yields `count` zeros.
pub fn factor(n: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    if n == 0 {
        return vec![0; count];
    }
    let target = (n as f64).powf(1.0 / count as f64);
    let mut current = Vec::with_capacity(count);
    let mut best: Option<(f64, Vec<usize>)> = None;
    search(n, count, target, &mut current, &mut best);

    let mut factors = best.map(|(_, f)| f).unwrap_or_else(|| vec![n]);
    factors.sort_unstable();
    factors
}

fn search(n: usize, count: usize, target: f64, current: &mut Vec<usize>, best: &mut Option<(f64, Vec<usize>)>) {
    if count == 1 {
        current.push(n);
        let err: f64 = current.iter().map(|&f| (target - f as f64).powi(2)).sum();
        if best.as_ref().is_none_or(|(best_err, _)| err < *best_err) {
            *best = Some((err, current.clone()));
        }
        current.pop();
        return;
    }
    for f0 in (1..=iroot(n, count)).rev() {
        if n % f0 == 0 {
            current.push(f0);
            search(n / f0, count - 1, target, current, best);
            current.pop();
        }
    }
}
