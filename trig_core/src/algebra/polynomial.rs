//! Polynomials with exact coefficients in Q(√2, √3).
//!
//! Coefficients are stored lowest degree first. Trailing zeros are trimmed
//! so `degree()` is always the true degree.

use serde::{Deserialize, Serialize};

use super::number::{Real, Surd};
use super::rational::{lcm, Rational};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coeffs: Vec<Surd>,
}

impl Polynomial {
    pub fn new(mut coeffs: Vec<Surd>) -> Self {
        while coeffs.last().is_some_and(Surd::is_zero) {
            coeffs.pop();
        }
        Polynomial { coeffs }
    }

    /// Build from coefficients listed highest degree first
    pub fn from_descending(coeffs: &[Surd]) -> Self {
        Polynomial::new(coeffs.iter().rev().copied().collect())
    }

    /// `leading · Π (t - root)`
    pub fn from_roots(leading: Surd, roots: &[Surd]) -> Self {
        let mut poly = Polynomial::new(vec![leading]);
        for root in roots {
            poly = poly.mul_linear(*root);
        }
        poly
    }

    /// Multiply by `(t - root)`
    fn mul_linear(&self, root: Surd) -> Self {
        let mut out = vec![Surd::ZERO; self.coeffs.len() + 1];
        for (i, c) in self.coeffs.iter().enumerate() {
            out[i + 1] = out[i + 1] + *c;
            out[i] = out[i] - *c * root;
        }
        Polynomial::new(out)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Coefficient of `t^i`
    pub fn coeff(&self, i: usize) -> Surd {
        self.coeffs.get(i).copied().unwrap_or(Surd::ZERO)
    }

    pub fn leading(&self) -> Surd {
        self.coeffs.last().copied().unwrap_or(Surd::ZERO)
    }

    /// Coefficients highest degree first
    pub fn descending(&self) -> Vec<Surd> {
        self.coeffs.iter().rev().copied().collect()
    }

    pub fn scale(&self, factor: Surd) -> Self {
        Polynomial::new(self.coeffs.iter().map(|c| *c * factor).collect())
    }

    pub fn eval(&self, t: &Surd) -> Surd {
        self.coeffs
            .iter()
            .rev()
            .fold(Surd::ZERO, |acc, c| acc * *t + *c)
    }

    pub fn eval_f64(&self, t: f64) -> f64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c.to_f64())
    }

    /// LCM of every coordinate denominator of every coefficient
    pub fn denom_lcm(&self) -> i64 {
        self.coeffs.iter().fold(1, |acc, c| lcm(acc, c.denom_lcm()))
    }

    /// Scale so every coordinate is an integer
    pub fn clear_denominators(&self) -> Self {
        self.scale(Surd::int(self.denom_lcm()))
    }

    /// Whether every coefficient is rational
    pub fn is_rational(&self) -> bool {
        self.coeffs.iter().all(Surd::is_rational)
    }

    /// Synthetic division by `(t - root)`: returns quotient and remainder
    pub fn div_linear(&self, root: &Surd) -> (Polynomial, Surd) {
        if self.coeffs.is_empty() {
            return (Polynomial::new(vec![]), Surd::ZERO);
        }
        let n = self.coeffs.len();
        let mut quotient = vec![Surd::ZERO; n - 1];
        let mut carry = Surd::ZERO;
        for i in (0..n).rev() {
            let value = self.coeffs[i] + carry * *root;
            if i == 0 {
                return (Polynomial::new(quotient), value);
            }
            quotient[i - 1] = value;
            carry = value;
        }
        (Polynomial::new(quotient), Surd::ZERO)
    }

    /// Drop a zero constant term: `p(t) = t · q(t)`
    pub fn divide_by_t(&self) -> Option<Polynomial> {
        (self.coeff(0).is_zero() && !self.is_zero()).then(|| Polynomial::new(self.coeffs[1..].to_vec()))
    }

    /// Discriminant of a quadratic
    pub fn discriminant(&self) -> Surd {
        let (a, b, c) = (self.coeff(2), self.coeff(1), self.coeff(0));
        b * b - Surd::int(4) * a * c
    }

    /// Real roots of a polynomial of degree at most two, ascending and
    /// without repetition.
    pub fn real_roots(&self) -> Vec<Real> {
        match self.degree() {
            0 => vec![],
            1 => match (-self.coeff(0)).checked_div(&self.coeff(1)) {
                Some(r) => vec![Real::Exact(r)],
                None => vec![],
            },
            2 => {
                let (a, b) = (self.coeff(2), self.coeff(1));
                let d = self.discriminant();
                let Some(two_a) = (Surd::int(2) * a).recip() else {
                    return vec![];
                };
                let base = -b * two_a;
                if d.is_zero() {
                    return vec![Real::Exact(base)];
                }
                if d.is_negative() {
                    return vec![];
                }
                let mut roots = match d.sqrt_exact() {
                    Some(root) => vec![
                        Real::Exact(base - root * two_a),
                        Real::Exact(base + root * two_a),
                    ],
                    None => match d.as_rational() {
                        Some(rd) => vec![
                            Real::radical(base, -two_a, rd),
                            Real::radical(base, two_a, rd),
                        ],
                        // Radicands outside Q never arise from the generators' cubics
                        None => vec![],
                    },
                };
                roots.sort_by(|x, y| x.to_f64().total_cmp(&y.to_f64()));
                roots
            }
            _ => vec![],
        }
    }

    /// Typst markup in the variable `var`, highest degree first
    pub fn markup(&self, var: &str) -> String {
        if self.coeffs.is_empty() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (power, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let negative = c.is_negative() && !c.is_compound();
            let magnitude = if negative { -*c } else { *c };
            let monomial = match power {
                0 => String::new(),
                1 => var.to_string(),
                p => format!("{}^{}", var, p),
            };
            let body = match (power, magnitude.is_one()) {
                (0, _) => magnitude.markup(),
                (_, true) => monomial,
                _ if magnitude.is_compound() => format!("({}) {}", magnitude.markup(), monomial),
                _ => format!("{} {}", magnitude.markup(), monomial),
            };
            match (out.is_empty(), negative) {
                (true, true) => out.push_str(&format!("-{}", body)),
                (true, false) => out.push_str(&body),
                (false, true) => out.push_str(&format!(" - {}", body)),
                (false, false) => out.push_str(&format!(" + {}", body)),
            }
        }
        out
    }
}

/// Scale factor clearing rational denominators, as a rational
pub fn clearing_factor(values: &[Surd]) -> Rational {
    Rational::int(values.iter().fold(1, |acc, v| lcm(acc, v.denom_lcm())))
}
