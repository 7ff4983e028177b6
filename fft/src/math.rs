//! Integer helpers and a minimal complex number for host-side tables.

use std::ops::{Add, Mul, Neg, Sub};

/// Largest power of two `<= x`; 1 for `x == 0`.
pub fn max_power_of_2_less_equal(x: usize) -> usize {
    let mut x2 = 1;
    while 2 * x2 <= x {
        x2 *= 2;
    }
    x2
}

/// Smallest power of two `>= x`; 1 for `x == 0`.
pub fn min_power_of_2_greater_equal(x: usize) -> usize {
    let mut x2 = 1;
    while x2 < x {
        x2 *= 2;
    }
    x2
}

/// Non-negative greatest common divisor.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `base^exp` in integers.
pub fn ipow(base: usize, exp: usize) -> usize {
    (0..exp).fold(1, |acc, _| acc * base)
}

/// Largest `r` with `r^k <= n`.
pub fn iroot(n: usize, k: usize) -> usize {
    if k <= 1 || n <= 1 {
        return n;
    }
    let mut r = (n as f64).powf(1.0 / k as f64).round() as usize;
    while r > 0 && ipow(r, k) > n {
        r -= 1;
    }
    while ipow(r + 1, k) <= n {
        r += 1;
    }
    r
}

/// Complex number in double precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `cos(arg) + i sin(arg)`
    pub fn cis(arg: f64) -> Self {
        Self { re: arg.cos(), im: arg.sin() }
    }

    pub fn conj(self) -> Self {
        Self { re: self.re, im: -self.im }
    }

    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn scale(self, s: f64) -> Self {
        Self { re: self.re * s, im: self.im * s }
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex { re: self.re + rhs.re, im: self.im + rhs.im }
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex { re: self.re - rhs.re, im: self.im - rhs.im }
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex { re: self.re * rhs.re - self.im * rhs.im, im: self.re * rhs.im + self.im * rhs.re }
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex { re: -self.re, im: -self.im }
    }
}
