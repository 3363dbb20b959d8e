//! Angles as rational multiples of π, with exact values at multiples of π/12.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Neg, Sub};

use super::number::Surd;
use super::rational::Rational;

/// An angle `r·π` with rational `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle(Rational);

impl Angle {
    pub const ZERO: Angle = Angle(Rational::ZERO);
    pub const PI: Angle = Angle(Rational::ONE);

    /// `num/den · π`
    pub fn pi_frac(num: i64, den: i64) -> Self {
        Angle(Rational::new(num, den))
    }

    pub fn from_pi_coeff(r: Rational) -> Self {
        Angle(r)
    }

    /// Coefficient of π
    pub fn pi_coeff(&self) -> Rational {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn scale(&self, r: Rational) -> Self {
        Angle(self.0 * r)
    }

    pub fn div(&self, r: Rational) -> Option<Self> {
        self.0.checked_div(r).map(Angle)
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64() * PI
    }

    /// How many times `period` fits into this angle, if it does so exactly
    pub fn multiple_of(&self, period: &Angle) -> Option<i64> {
        self.0
            .checked_div(period.0)
            .filter(Rational::is_integer)
            .map(|r| r.numer())
    }

    /// Representative in `(-period/2, period/2]`
    pub fn centered(&self, period: &Angle) -> Self {
        let Some(turns) = self.0.checked_div(period.0.abs()) else {
            return *self;
        };
        // shift = round-half-down(turns)
        let half = Rational::new(1, 2);
        let shift = -((-turns + half).floor());
        Angle(self.0 - period.0.abs() * Rational::int(shift))
    }

    /// Index in π/12 steps when the angle is a multiple of π/12
    fn twelfths(&self) -> Option<i64> {
        let m = self.0 * Rational::int(12);
        m.is_integer().then(|| m.numer())
    }

    /// Exact sine at multiples of π/12
    pub fn sin_exact(&self) -> Option<Surd> {
        self.twelfths().map(sin_twelfth)
    }

    /// Exact cosine at multiples of π/12
    pub fn cos_exact(&self) -> Option<Surd> {
        self.twelfths().map(|m| sin_twelfth(m + 6))
    }

    /// Exact tangent; `None` at the poles or off the π/12 grid
    pub fn tan_exact(&self) -> Option<Surd> {
        let s = self.sin_exact()?;
        let c = self.cos_exact()?;
        s.checked_div(&c)
    }

    /// Exact cotangent; `None` at the poles or off the π/12 grid
    pub fn cot_exact(&self) -> Option<Surd> {
        let s = self.sin_exact()?;
        let c = self.cos_exact()?;
        c.checked_div(&s)
    }

    /// Typst math markup: `frac(pi, 6)`, `-pi`, `frac(2 pi, 3)`
    pub fn markup(&self) -> String {
        self.markup_with("")
    }

    /// Markup of `self · var`, e.g. `frac(pi n, 2)` or `2 pi n`
    pub fn markup_times(&self, var: &str) -> String {
        self.markup_with(var)
    }

    fn markup_with(&self, var: &str) -> String {
        if self.0.is_zero() {
            return "0".to_string();
        }
        let suffix = if var.is_empty() {
            String::new()
        } else {
            format!(" {}", var)
        };
        let sign = if self.0.is_negative() { "-" } else { "" };
        let num = self.0.numer().abs();
        let den = self.0.denom();
        let top = if num == 1 {
            format!("pi{}", suffix)
        } else {
            format!("{} pi{}", num, suffix)
        };
        if den == 1 {
            format!("{}{}", sign, top)
        } else {
            format!("{}frac({}, {})", sign, top, den)
        }
    }
}

/// sin(mπ/12) for any integer m
fn sin_twelfth(m: i64) -> Surd {
    let m = m.rem_euclid(24);
    if m >= 12 {
        return -sin_twelfth(m - 12);
    }
    let m = if m > 6 { 12 - m } else { m };
    let quarter = Surd::frac(1, 4);
    match m {
        0 => Surd::ZERO,
        1 => (Surd::sqrt(6) - Surd::sqrt(2)) * quarter,
        2 => Surd::frac(1, 2),
        3 => Surd::sqrt(2) * Surd::frac(1, 2),
        4 => Surd::sqrt(3) * Surd::frac(1, 2),
        5 => (Surd::sqrt(6) + Surd::sqrt(2)) * quarter,
        _ => Surd::ONE,
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values() {
        assert_eq!(Angle::pi_frac(1, 6).sin_exact(), Some(Surd::frac(1, 2)));
        assert_eq!(Angle::pi_frac(2, 3).cos_exact(), Some(Surd::frac(-1, 2)));
        assert_eq!(Angle::pi_frac(1, 3).tan_exact(), Some(Surd::sqrt(3)));
        assert_eq!(Angle::pi_frac(-1, 4).cot_exact(), Some(Surd::int(-1)));
        assert_eq!(Angle::pi_frac(1, 2).tan_exact(), None);
        assert_eq!(Angle::pi_frac(1, 5).sin_exact(), None);
    }

    #[test]
    fn test_exact_values_match_floats() {
        for m in -30..30 {
            let a = Angle::pi_frac(m, 12);
            let s = a.sin_exact().unwrap().to_f64();
            let c = a.cos_exact().unwrap().to_f64();
            assert!((s - a.to_f64().sin()).abs() < 1e-12, "sin({}pi/12)", m);
            assert!((c - a.to_f64().cos()).abs() < 1e-12, "cos({}pi/12)", m);
        }
    }

    #[test]
    fn test_centered() {
        let two_pi = Angle::pi_frac(2, 1);
        assert_eq!(Angle::pi_frac(3, 2).centered(&two_pi), Angle::pi_frac(-1, 2));
        assert_eq!(Angle::PI.centered(&two_pi), Angle::PI);
        assert_eq!(Angle::pi_frac(-1, 1).centered(&two_pi), Angle::PI);
        assert_eq!(Angle::pi_frac(7, 6).centered(&Angle::PI), Angle::pi_frac(1, 6));
    }

    #[test]
    fn test_markup() {
        assert_eq!(Angle::pi_frac(1, 6).markup(), "frac(pi, 6)");
        assert_eq!(Angle::pi_frac(-2, 3).markup(), "-frac(2 pi, 3)");
        assert_eq!(Angle::PI.markup(), "pi");
        assert_eq!(Angle::pi_frac(2, 1).markup_times("n"), "2 pi n");
        assert_eq!(Angle::pi_frac(1, 2).markup_times("n"), "frac(pi n, 2)");
    }
}
