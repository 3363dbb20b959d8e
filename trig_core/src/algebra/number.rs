//! # Exact Numbers
//!
//! Every tabulated trigonometric value (sines and cosines of multiples of
//! π/12, their ratios, and the amplitudes the generators pick) lives in the
//! field Q(√2, √3). [`Surd`] stores such a number as rational coordinates
//! over the basis `{1, √2, √3, √6}`, which makes equality and zero tests
//! exact.
//!
//! Quadratic roots that leave the field (only the arctangent arguments of
//! the tangent-substitution category need them) are carried by
//! [`Real::Radical`] as `base + coef·√radicand`.
//!
//! ## Example
//!
//! ```rust
//! use trig_core::algebra::number::Surd;
//!
//! let half_sqrt3 = Surd::sqrt(3) * Surd::frac(1, 2);
//! let squared = half_sqrt3 * half_sqrt3;
//! assert_eq!(squared, Surd::frac(3, 4));
//! assert_eq!(half_sqrt3.markup(), "frac(sqrt(3), 2)");
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::rational::{lcm, Rational};

/// Radicands of the basis elements, in storage order.
const BASIS: [i64; 4] = [1, 2, 3, 6];

/// Product table for the basis: `e_i * e_j = factor * e_k`.
fn basis_product(i: usize, j: usize) -> (i64, usize) {
    match (i.min(j), i.max(j)) {
        (0, k) => (1, k),
        (1, 1) => (2, 0),
        (1, 2) => (1, 3),
        (1, 3) => (2, 2),
        (2, 2) => (3, 0),
        (2, 3) => (3, 1),
        _ => (6, 0),
    }
}

/// Exact element of Q(√2, √3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Surd {
    c: [Rational; 4],
}

impl Surd {
    pub const ZERO: Surd = Surd {
        c: [Rational::ZERO; 4],
    };
    pub const ONE: Surd = Surd {
        c: [Rational::ONE, Rational::ZERO, Rational::ZERO, Rational::ZERO],
    };

    pub fn int(n: i64) -> Self {
        Self::rational(Rational::int(n))
    }

    pub fn frac(num: i64, den: i64) -> Self {
        Self::rational(Rational::new(num, den))
    }

    pub fn rational(r: Rational) -> Self {
        let mut c = [Rational::ZERO; 4];
        c[0] = r;
        Surd { c }
    }

    /// √n for `n ∈ {1, 2, 3, 6}` times the largest square factor of `n`.
    ///
    /// Returns `Surd::ZERO` for radicands outside the field; use
    /// [`Surd::sqrt_int`] when that can happen.
    pub fn sqrt(n: i64) -> Self {
        Self::sqrt_int(n).unwrap_or(Surd::ZERO)
    }

    /// Exact √n when it lies in the field
    pub fn sqrt_int(n: i64) -> Option<Self> {
        Surd::int(n).sqrt_exact()
    }

    /// Coordinates over `{1, √2, √3, √6}`
    pub fn coords(&self) -> [Rational; 4] {
        self.c
    }

    pub fn is_zero(&self) -> bool {
        self.c.iter().all(Rational::is_zero)
    }

    pub fn is_one(&self) -> bool {
        *self == Surd::ONE
    }

    pub fn is_rational(&self) -> bool {
        self.c[1..].iter().all(Rational::is_zero)
    }

    pub fn as_rational(&self) -> Option<Rational> {
        self.is_rational().then_some(self.c[0])
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_rational()
            .filter(Rational::is_integer)
            .map(|r| r.numer())
    }

    pub fn to_f64(&self) -> f64 {
        self.c
            .iter()
            .zip(BASIS)
            .map(|(c, b)| c.to_f64() * (b as f64).sqrt())
            .sum()
    }

    /// Sign of the value. Exact for zero, floating point otherwise; nonzero
    /// elements of the generators' magnitude are far from rounding noise.
    pub fn signum(&self) -> i64 {
        if self.is_zero() {
            0
        } else if self.to_f64() < 0.0 {
            -1
        } else {
            1
        }
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            -*self
        } else {
            *self
        }
    }

    /// Compare by value
    pub fn cmp_value(&self, other: &Surd) -> Ordering {
        match (*self - *other).signum() {
            -1 => Ordering::Less,
            0 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }

    /// Number of nonzero coordinates
    pub fn term_count(&self) -> usize {
        self.c.iter().filter(|c| !c.is_zero()).count()
    }

    /// Least common multiple of the coordinate denominators
    pub fn denom_lcm(&self) -> i64 {
        self.c
            .iter()
            .filter(|c| !c.is_zero())
            .fold(1, |acc, c| lcm(acc, c.denom()))
    }

    pub fn scale(&self, r: Rational) -> Self {
        Surd {
            c: self.c.map(|c| c * r),
        }
    }

    pub fn pow(&self, exp: u32) -> Self {
        (0..exp).fold(Surd::ONE, |acc, _| acc * *self)
    }

    /// Negate the √3 and √6 coordinates
    fn conj3(&self) -> Self {
        Surd {
            c: [self.c[0], self.c[1], -self.c[2], -self.c[3]],
        }
    }

    /// Negate the √2 and √6 coordinates
    fn conj2(&self) -> Self {
        Surd {
            c: [self.c[0], -self.c[1], self.c[2], -self.c[3]],
        }
    }

    /// Exact multiplicative inverse via the two Galois conjugates
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let a3 = self.conj3();
        let b = *self * a3;
        let b2 = b.conj2();
        let norm = (b * b2).as_rational()?;
        let inv = norm.recip()?;
        Some((a3 * b2).scale(inv))
    }

    pub fn checked_div(&self, rhs: &Surd) -> Option<Self> {
        rhs.recip().map(|inv| *self * inv)
    }

    /// Exact non-negative square root when it lies in the field.
    ///
    /// Handles rationals (`q²·m` for `m ∈ {1, 2, 3, 6}`) and single-radical
    /// elements `u + v√d` that denest as `√p ± √q`.
    pub fn sqrt_exact(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        if self.is_zero() {
            return Some(Surd::ZERO);
        }
        if let Some(r) = self.as_rational() {
            return sqrt_rational(r);
        }
        if self.term_count() != 2 || self.c[0].is_zero() {
            return None;
        }
        let (idx, v) = self.c[1..]
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_zero())
            .map(|(i, c)| (i + 1, *c))?;
        let u = self.c[0];
        let d = Rational::int(BASIS[idx]);
        let w = (u * u - v * v * d).sqrt_exact()?;
        let half = Rational::new(1, 2);
        let p = sqrt_rational((u + w) * half)?;
        let q = sqrt_rational((u - w) * half)?;
        let candidate = if v.is_negative() { p - q } else { p + q };
        (candidate * candidate == *self && !candidate.is_negative()).then_some(candidate)
    }

    /// Typst math markup
    pub fn markup(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let den = self.denom_lcm();
        let terms: Vec<(i64, i64)> = self
            .c
            .iter()
            .zip(BASIS)
            .filter(|(c, _)| !c.is_zero())
            .map(|(c, b)| ((*c * Rational::int(den)).numer(), b))
            .collect();

        let mut numerator = String::new();
        for (i, (n, b)) in terms.iter().enumerate() {
            let body = match (n.abs(), b) {
                (m, 1) => m.to_string(),
                (1, b) => format!("sqrt({})", b),
                (m, b) => format!("{} sqrt({})", m, b),
            };
            match (i, *n < 0) {
                (0, true) => numerator.push_str(&format!("-{}", body)),
                (0, false) => numerator.push_str(&body),
                (_, true) => numerator.push_str(&format!(" - {}", body)),
                (_, false) => numerator.push_str(&format!(" + {}", body)),
            }
        }

        if den == 1 {
            numerator
        } else if terms.len() == 1 && terms[0].0 < 0 {
            format!("-frac({}, {})", &numerator[1..], den)
        } else {
            format!("frac({}, {})", numerator, den)
        }
    }

    /// True when the markup needs parentheses as a factor
    pub fn is_compound(&self) -> bool {
        self.term_count() > 1 && self.denom_lcm() == 1
    }
}

/// √r for rational `r` as `q·√m`, `m ∈ {1, 2, 3, 6}`
fn sqrt_rational(r: Rational) -> Option<Surd> {
    if r.is_negative() {
        return None;
    }
    BASIS.iter().enumerate().find_map(|(idx, &m)| {
        let q = (r / Rational::int(m)).sqrt_exact()?;
        let mut c = [Rational::ZERO; 4];
        c[idx] = q;
        Some(Surd { c })
    })
}

impl Default for Surd {
    fn default() -> Self {
        Surd::ZERO
    }
}

impl From<i64> for Surd {
    fn from(n: i64) -> Self {
        Surd::int(n)
    }
}

impl From<Rational> for Surd {
    fn from(r: Rational) -> Self {
        Surd::rational(r)
    }
}

impl Add for Surd {
    type Output = Surd;
    fn add(self, rhs: Surd) -> Surd {
        let mut c = self.c;
        for (a, b) in c.iter_mut().zip(rhs.c) {
            *a = *a + b;
        }
        Surd { c }
    }
}

impl Sub for Surd {
    type Output = Surd;
    fn sub(self, rhs: Surd) -> Surd {
        self + (-rhs)
    }
}

impl Mul for Surd {
    type Output = Surd;
    fn mul(self, rhs: Surd) -> Surd {
        let mut c = [Rational::ZERO; 4];
        for i in 0..4 {
            if self.c[i].is_zero() {
                continue;
            }
            for j in 0..4 {
                if rhs.c[j].is_zero() {
                    continue;
                }
                let (factor, k) = basis_product(i, j);
                c[k] = c[k] + self.c[i] * rhs.c[j] * Rational::int(factor);
            }
        }
        Surd { c }
    }
}

impl Div for Surd {
    type Output = Surd;
    fn div(self, rhs: Surd) -> Surd {
        match self.checked_div(&rhs) {
            Some(q) => q,
            None => panic!("division of surd by zero"),
        }
    }
}

impl Neg for Surd {
    type Output = Surd;
    fn neg(self) -> Surd {
        Surd {
            c: self.c.map(|c| -c),
        }
    }
}

// =============================================================================
// Real: field elements plus one extra square root
// =============================================================================

/// A real algebraic value: either in Q(√2, √3) or `base + coef·√radicand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Real {
    Exact(Surd),
    Radical {
        base: Surd,
        coef: Surd,
        radicand: Rational,
    },
}

impl Real {
    pub fn int(n: i64) -> Self {
        Real::Exact(Surd::int(n))
    }

    /// `base + coef·√radicand`, folding perfect squares back into the field.
    pub fn radical(base: Surd, coef: Surd, radicand: Rational) -> Self {
        if coef.is_zero() || radicand.is_zero() {
            return Real::Exact(base);
        }
        if let Some(root) = Surd::rational(radicand).sqrt_exact() {
            return Real::Exact(base + coef * root);
        }
        // √(p/q) = √(pq)/q, then pull square factors out of pq
        let pq = radicand.numer() * radicand.denom();
        let mut square = 1;
        let mut s = 2;
        while s * s <= pq {
            if (pq / (square * square)) % (s * s) == 0 {
                square *= s;
            } else {
                s += 1;
            }
        }
        let rest = pq / (square * square);
        Real::Radical {
            base,
            coef: coef.scale(Rational::new(square, radicand.denom())),
            radicand: Rational::int(rest),
        }
    }

    pub fn exact(&self) -> Option<&Surd> {
        match self {
            Real::Exact(s) => Some(s),
            Real::Radical { .. } => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Real::Exact(s) if s.is_zero())
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Real::Exact(s) => s.to_f64(),
            Real::Radical { base, coef, radicand } => {
                base.to_f64() + coef.to_f64() * radicand.to_f64().sqrt()
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Real::Exact(s) => s.is_negative(),
            Real::Radical { .. } => self.to_f64() < 0.0,
        }
    }

    pub fn neg(&self) -> Real {
        match self {
            Real::Exact(s) => Real::Exact(-*s),
            Real::Radical { base, coef, radicand } => Real::Radical {
                base: -*base,
                coef: -*coef,
                radicand: *radicand,
            },
        }
    }

    pub fn abs(&self) -> Real {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// `|self| > bound`, exact for field elements
    pub fn exceeds(&self, bound: &Surd) -> bool {
        match self {
            Real::Exact(s) => s.abs().cmp_value(bound) == Ordering::Greater,
            Real::Radical { .. } => self.to_f64().abs() > bound.to_f64() + 1e-12,
        }
    }

    pub fn markup(&self) -> String {
        match self {
            Real::Exact(s) => s.markup(),
            Real::Radical { base, coef, radicand } => {
                let root = format!("sqrt({})", radicand);
                match (base.as_rational(), coef.as_rational()) {
                    (Some(b), Some(c)) => {
                        let den = lcm(b.denom(), c.denom());
                        let nb = (b * Rational::int(den)).numer();
                        let nc = (c * Rational::int(den)).numer();
                        let radical = match nc.abs() {
                            1 => root,
                            m => format!("{} {}", m, root),
                        };
                        let sign = if nc < 0 { "-" } else { "+" };
                        let numerator = if nb == 0 {
                            if nc < 0 {
                                format!("-{}", radical)
                            } else {
                                radical
                            }
                        } else {
                            format!("{} {} {}", nb, sign, radical)
                        };
                        if den == 1 {
                            numerator
                        } else if nb == 0 && nc < 0 {
                            format!("-frac({}, {})", &numerator[1..], den)
                        } else {
                            format!("frac({}, {})", numerator, den)
                        }
                    }
                    _ => {
                        let coef_markup = if coef.term_count() > 1 {
                            format!("({})", coef.markup())
                        } else {
                            coef.markup()
                        };
                        format!("{} + {} {}", base.markup(), coef_markup, root)
                    }
                }
            }
        }
    }

    /// True when the markup needs parentheses as a factor or operand
    pub fn is_compound(&self) -> bool {
        match self {
            Real::Exact(s) => s.is_compound(),
            Real::Radical { base, .. } => !base.is_zero(),
        }
    }
}

impl From<Surd> for Real {
    fn from(s: Surd) -> Self {
        Real::Exact(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_multiplication() {
        let s2 = Surd::sqrt(2);
        let s3 = Surd::sqrt(3);
        assert_eq!(s2 * s2, Surd::int(2));
        assert_eq!(s2 * s3, Surd::sqrt(6));
        assert_eq!(Surd::sqrt(6) * s3, Surd::sqrt(2) * Surd::int(3));
    }

    #[test]
    fn test_recip() {
        let x = Surd::int(2) + Surd::sqrt(3);
        let inv = x.recip().unwrap();
        assert_eq!(inv, Surd::int(2) - Surd::sqrt(3));
        let y = Surd::sqrt(2) + Surd::sqrt(3);
        assert_eq!(y * y.recip().unwrap(), Surd::ONE);
        assert!(Surd::ZERO.recip().is_none());
    }

    #[test]
    fn test_sqrt_exact() {
        assert_eq!(Surd::int(4).sqrt_exact(), Some(Surd::int(2)));
        assert_eq!(Surd::frac(4, 3).sqrt_exact(), Some(Surd::sqrt(3) * Surd::frac(2, 3)));
        assert_eq!(Surd::int(12).sqrt_exact(), Some(Surd::sqrt(3) * Surd::int(2)));
        // 4 + 2√3 = (1 + √3)²
        let nested = Surd::int(4) + Surd::sqrt(3) * Surd::int(2);
        assert_eq!(nested.sqrt_exact(), Some(Surd::ONE + Surd::sqrt(3)));
        assert_eq!(Surd::int(5).sqrt_exact(), None);
        assert_eq!(Surd::int(-4).sqrt_exact(), None);
    }

    #[test]
    fn test_markup() {
        assert_eq!(Surd::frac(-1, 2).markup(), "-frac(1, 2)");
        assert_eq!((Surd::sqrt(2) * Surd::frac(-1, 2)).markup(), "-frac(sqrt(2), 2)");
        assert_eq!((Surd::sqrt(3) * Surd::int(2)).markup(), "2 sqrt(3)");
        let s = (Surd::sqrt(6) - Surd::sqrt(2)) * Surd::frac(1, 4);
        assert_eq!(s.markup(), "frac(-sqrt(2) + sqrt(6), 4)");
        assert_eq!((Surd::int(2) - Surd::sqrt(3)).markup(), "2 - sqrt(3)");
    }

    #[test]
    fn test_radical_simplification() {
        let r = Real::radical(Surd::frac(1, 2), Surd::frac(1, 2), Rational::int(20));
        match &r {
            Real::Radical { coef, radicand, .. } => {
                assert_eq!(*coef, Surd::ONE);
                assert_eq!(*radicand, Rational::int(5));
            }
            Real::Exact(_) => panic!("20 is not a square"),
        }
        assert_eq!(r.markup(), "frac(1 + 2 sqrt(5), 2)");
        let exact = Real::radical(Surd::ONE, Surd::ONE, Rational::int(9));
        assert_eq!(exact, Real::int(4));
    }

    #[test]
    fn test_exceeds() {
        assert!(Real::int(2).exceeds(&Surd::ONE));
        assert!(!Real::Exact(Surd::sqrt(2)).exceeds(&Surd::sqrt(2)));
        assert!(Real::Exact(Surd::frac(-3, 2)).exceeds(&Surd::ONE));
    }
}
