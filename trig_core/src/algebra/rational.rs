//! Exact rational numbers.
//!
//! Every coefficient the generators touch is a small fraction, so a
//! normalized `i64` pair is enough. Invariant: `den > 0` and
//! `gcd(num, den) == 1`; zero is stored as `0/1`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Greatest common divisor using Euclidean algorithm
pub fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Least common multiple of two positive integers
pub fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b) * b).abs()
}

/// An exact fraction `num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Create a reduced fraction. Returns `None` for a zero denominator.
    pub fn checked_new(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den).max(1);
        Some(Rational {
            num: num / g,
            den: den / g,
        })
    }

    /// Create a reduced fraction.
    ///
    /// # Panics
    ///
    /// Panics if `den == 0`, like integer division.
    pub fn new(num: i64, den: i64) -> Self {
        match Self::checked_new(num, den) {
            Some(r) => r,
            None => panic!("rational with zero denominator"),
        }
    }

    pub const fn int(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.num
    }

    pub fn denom(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn signum(&self) -> i64 {
        self.num.signum()
    }

    pub fn abs(&self) -> Self {
        Rational {
            num: self.num.abs(),
            den: self.den,
        }
    }

    pub fn recip(&self) -> Option<Self> {
        Self::checked_new(self.den, self.num)
    }

    pub fn checked_div(self, rhs: Rational) -> Option<Self> {
        rhs.recip().map(|inv| self * inv)
    }

    /// Largest integer not greater than this value
    pub fn floor(&self) -> i64 {
        self.num.div_euclid(self.den)
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Exact square root when both parts are perfect squares
    pub fn sqrt_exact(&self) -> Option<Self> {
        if self.num < 0 {
            return None;
        }
        let n = isqrt(self.num)?;
        let d = isqrt(self.den)?;
        Some(Rational::new(n, d))
    }
}

/// Integer square root of a perfect square
fn isqrt(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let r = (n as f64).sqrt().round() as i64;
    (r.checked_mul(r) == Some(n)).then_some(r)
}

impl Default for Rational {
    fn default() -> Self {
        Rational::ZERO
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::int(n)
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        let g = gcd(self.den, rhs.den);
        let den = self.den / g * rhs.den;
        let num = self.num * (den / self.den) + rhs.num * (den / rhs.den);
        Rational::new(num, den)
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        let g1 = gcd(self.num, rhs.den).max(1);
        let g2 = gcd(rhs.num, self.den).max(1);
        Rational::new((self.num / g1) * (rhs.num / g2), (self.den / g2) * (rhs.den / g1))
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Rational) -> Rational {
        match self.checked_div(rhs) {
            Some(q) => q,
            None => panic!("rational division by zero"),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let r = Rational::new(4, -6);
        assert_eq!(r.numer(), -2);
        assert_eq!(r.denom(), 3);
        assert_eq!(Rational::new(0, -5), Rational::ZERO);
    }

    #[test]
    fn test_arithmetic() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert_eq!(a + b, Rational::new(5, 6));
        assert_eq!(a - b, Rational::new(1, 6));
        assert_eq!(a * b, Rational::new(1, 6));
        assert_eq!(a / b, Rational::new(3, 2));
        assert!(a.checked_div(Rational::ZERO).is_none());
    }

    #[test]
    fn test_floor_and_order() {
        assert_eq!(Rational::new(-1, 2).floor(), -1);
        assert_eq!(Rational::new(7, 2).floor(), 3);
        assert!(Rational::new(1, 3) < Rational::new(1, 2));
    }

    #[test]
    fn test_sqrt_exact() {
        assert_eq!(Rational::new(9, 4).sqrt_exact(), Some(Rational::new(3, 2)));
        assert_eq!(Rational::int(2).sqrt_exact(), None);
        assert_eq!(lcm(4, 6), 12);
    }
}
