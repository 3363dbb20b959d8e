//! Sum-to-product and power-reduction identities.
//!
//! The product forms are computed on exact rational arguments `k·x`; a
//! negative half-difference is folded back to a positive one with
//! `sin(-a) = -sin a` and `cos(-a) = cos a`, so every displayed factor has a
//! positive coefficient of `x`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::algebra::{Arg, Expr, Rational, Surd, TrigFn};

/// Operator between two terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn from_negative(negative: bool) -> Self {
        if negative {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }

    pub fn markup(&self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }

    pub fn factor(&self) -> i64 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }

    /// Sign of the product of two signed terms
    pub fn times(&self, other: Sign) -> Sign {
        Sign::from_negative(self.factor() * other.factor() < 0)
    }
}

/// Sum-to-product templates in Typst math, keyed by function and operator
pub static SUM_TO_PRODUCT: Lazy<HashMap<(TrigFn, Sign), &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            (TrigFn::Sin, Sign::Plus),
            "sin alpha + sin beta = 2 sin frac(alpha + beta, 2) cos frac(alpha - beta, 2)",
        ),
        (
            (TrigFn::Sin, Sign::Minus),
            "sin alpha - sin beta = 2 sin frac(alpha - beta, 2) cos frac(alpha + beta, 2)",
        ),
        (
            (TrigFn::Cos, Sign::Plus),
            "cos alpha + cos beta = 2 cos frac(alpha + beta, 2) cos frac(alpha - beta, 2)",
        ),
        (
            (TrigFn::Cos, Sign::Minus),
            "cos alpha - cos beta = -2 sin frac(alpha + beta, 2) sin frac(alpha - beta, 2)",
        ),
    ])
});

/// Power-reduction templates in Typst math
pub static POWER_REDUCTION: Lazy<HashMap<TrigFn, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (TrigFn::Sin, "sin^2 alpha = frac(1 - cos 2 alpha, 2)"),
        (TrigFn::Cos, "cos^2 alpha = frac(1 + cos 2 alpha, 2)"),
    ])
});

/// Template lookup for a sine or cosine pair
pub fn sum_to_product_template(f: TrigFn, sign: Sign) -> &'static str {
    SUM_TO_PRODUCT.get(&(f, sign)).copied().unwrap_or("")
}

/// `coef · g1(a1) · g2(a2)`
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub coef: i64,
    pub factors: Vec<(TrigFn, Arg)>,
}

impl ProductForm {
    pub fn expr(&self) -> Expr {
        let factors = self.factors.iter().map(|(f, arg)| Expr::func(*f, *arg)).collect();
        Expr::scaled(Surd::int(self.coef), Expr::product(factors))
    }

    pub fn markup(&self) -> String {
        self.expr().markup()
    }

    /// Whether one of the factors is `f(arg)`
    pub fn has_factor(&self, f: TrigFn, arg: &Arg) -> bool {
        self.factors.iter().any(|(g, a)| *g == f && a == arg)
    }

    /// The factor other than `f(arg)`
    pub fn cofactor(&self, f: TrigFn, arg: &Arg) -> Option<(TrigFn, Arg)> {
        let pos = self.factors.iter().position(|(g, a)| *g == f && a == arg)?;
        self.factors
            .iter()
            .enumerate()
            .find(|(i, _)| *i != pos)
            .map(|(_, factor)| *factor)
    }
}

/// `f(a·x) ± f(b·x)` as a product; `None` for tangent/cotangent or equal
/// arguments with a difference (identically zero).
pub fn sum_to_product(f: TrigFn, sign: Sign, a: Rational, b: Rational) -> Option<ProductForm> {
    let half = Rational::new(1, 2);
    let s = (a + b) * half;
    let d = (a - b) * half;
    if d.is_zero() && sign == Sign::Minus {
        return None;
    }
    // (function, half-angle) pairs before folding signs
    let (coef, raw) = match (f, sign) {
        (TrigFn::Sin, Sign::Plus) => (2, [(TrigFn::Sin, s), (TrigFn::Cos, d)]),
        (TrigFn::Sin, Sign::Minus) => (2, [(TrigFn::Sin, d), (TrigFn::Cos, s)]),
        (TrigFn::Cos, Sign::Plus) => (2, [(TrigFn::Cos, s), (TrigFn::Cos, d)]),
        (TrigFn::Cos, Sign::Minus) => (-2, [(TrigFn::Sin, s), (TrigFn::Sin, d)]),
        (TrigFn::Tan | TrigFn::Cot, _) => return None,
    };
    let mut coef = coef;
    let mut factors = Vec::with_capacity(2);
    for (g, k) in raw {
        let k = if k.is_negative() {
            if g == TrigFn::Sin {
                coef = -coef;
            }
            -k
        } else {
            k
        };
        factors.push((g, Arg::scaled(k)));
    }
    Some(ProductForm { coef, factors })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64) -> Rational {
        Rational::int(n)
    }

    #[test]
    fn test_sum_to_product_forms() {
        let p = sum_to_product(TrigFn::Sin, Sign::Plus, r(5), r(3)).unwrap();
        assert_eq!(p.markup(), "2 sin(4 x) cos(x)");
        let p = sum_to_product(TrigFn::Cos, Sign::Minus, r(5), r(1)).unwrap();
        assert_eq!(p.markup(), "-2 sin(3 x) sin(2 x)");
        let p = sum_to_product(TrigFn::Sin, Sign::Minus, r(2), r(6)).unwrap();
        // 2 sin(-2x) cos(4x) = -2 sin(2x) cos(4x)
        assert_eq!(p.markup(), "-2 sin(2 x) cos(4 x)");
    }

    #[test]
    fn test_product_matches_sum_numerically() {
        for (f, sign) in [
            (TrigFn::Sin, Sign::Plus),
            (TrigFn::Sin, Sign::Minus),
            (TrigFn::Cos, Sign::Plus),
            (TrigFn::Cos, Sign::Minus),
        ] {
            for (a, b) in [(7, 3), (2, 6), (3, 5)] {
                let p = sum_to_product(f, sign, r(a), r(b)).unwrap();
                for x in [0.3, 1.1, -2.4] {
                    let sum = f.eval(a as f64 * x) + sign.factor() as f64 * f.eval(b as f64 * x);
                    assert!((p.expr().eval(x) - sum).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_cofactor() {
        let p = sum_to_product(TrigFn::Cos, Sign::Plus, r(7), r(3)).unwrap();
        assert!(p.has_factor(TrigFn::Cos, &Arg::times(2)));
        assert_eq!(p.cofactor(TrigFn::Cos, &Arg::times(2)), Some((TrigFn::Cos, Arg::times(5))));
        assert!(sum_to_product(TrigFn::Tan, Sign::Plus, r(2), r(1)).is_none());
    }

    #[test]
    fn test_templates_cover_sine_and_cosine() {
        assert_eq!(SUM_TO_PRODUCT.len(), 4);
        assert!(sum_to_product_template(TrigFn::Cos, Sign::Minus).starts_with("cos alpha - cos beta"));
        assert!(POWER_REDUCTION[&TrigFn::Sin].contains("1 - cos 2 alpha"));
    }
}
