//! Symbolic expressions in one free variable `x`.
//!
//! Generators build equations in their canonical display form directly from
//! exact coefficients, so this tree only needs construction helpers, Typst
//! rendering and evaluation for witness checks: exact at angles on the π/12
//! grid, floating point everywhere else.

use serde::{Deserialize, Serialize};

use super::angle::Angle;
use super::functions::{InverseFn, TrigFn};
use super::number::{Real, Surd};
use super::rational::Rational;

// =============================================================================
// Linear argument
// =============================================================================

/// Linear argument `k·x + b` of a trigonometric function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arg {
    pub k: Rational,
    pub b: Angle,
}

impl Arg {
    /// Bare `x`
    pub fn x() -> Self {
        Arg {
            k: Rational::ONE,
            b: Angle::ZERO,
        }
    }

    /// `k·x`
    pub fn times(k: i64) -> Self {
        Arg {
            k: Rational::int(k),
            b: Angle::ZERO,
        }
    }

    /// `k·x` for rational `k`
    pub fn scaled(k: Rational) -> Self {
        Arg { k, b: Angle::ZERO }
    }

    pub fn new(k: Rational, b: Angle) -> Self {
        Arg { k, b }
    }

    pub fn is_bare(&self) -> bool {
        self.k.is_one() && self.b.is_zero()
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.k.to_f64() * x + self.b.to_f64()
    }

    /// `k·x + b` at an exact angle
    pub fn at(&self, x: Angle) -> Angle {
        x.scale(self.k) + self.b
    }

    pub fn markup(&self) -> String {
        let k = self.k;
        let sign = if k.is_negative() { "-" } else { "" };
        let (num, den) = (k.numer().abs(), k.denom());
        let var = match (num, den) {
            (0, _) => String::new(),
            (1, 1) => format!("{}x", sign),
            (n, 1) => format!("{}{} x", sign, n),
            (1, d) => format!("{}frac(x, {})", sign, d),
            (n, d) => format!("{}frac({} x, {})", sign, n, d),
        };
        match (var.is_empty(), self.b.is_zero(), self.b.is_negative()) {
            (true, _, _) => self.b.markup(),
            (false, true, _) => var,
            (false, false, true) => format!("{} - {}", var, (-self.b).markup()),
            (false, false, false) => format!("{} + {}", var, self.b.markup()),
        }
    }
}

// =============================================================================
// Expression tree
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(Real),
    Angle(Angle),
    Var,
    Func(TrigFn, Arg),
    Arc(InverseFn, Box<Expr>),
    Pow(Box<Expr>, u32),
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn num(s: Surd) -> Self {
        Expr::Const(Real::Exact(s))
    }

    pub fn int(n: i64) -> Self {
        Expr::num(Surd::int(n))
    }

    pub fn zero() -> Self {
        Expr::int(0)
    }

    pub fn func(f: TrigFn, arg: Arg) -> Self {
        Expr::Func(f, arg)
    }

    /// `f(arg)^power`
    pub fn func_pow(f: TrigFn, arg: Arg, power: u32) -> Self {
        Expr::pow(Expr::Func(f, arg), power)
    }

    pub fn pow(base: Expr, power: u32) -> Self {
        match power {
            0 => Expr::int(1),
            1 => base,
            p => Expr::Pow(Box::new(base), p),
        }
    }

    pub fn arc(f: InverseFn, inner: Expr) -> Self {
        Expr::Arc(f, Box::new(inner))
    }

    pub fn neg(e: Expr) -> Self {
        match e {
            Expr::Const(r) => Expr::Const(r.neg()),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }

    /// `coef · e`, dropping unit coefficients
    pub fn scaled(coef: Surd, e: Expr) -> Self {
        if coef.is_zero() {
            return Expr::zero();
        }
        match e {
            Expr::Const(Real::Exact(v)) => Expr::num(coef * v),
            _ if coef.is_one() => e,
            _ if coef == -Surd::ONE => Expr::neg(e),
            Expr::Product(mut factors) => {
                if let Some(Expr::Const(Real::Exact(lead))) = factors.first().cloned() {
                    factors.remove(0);
                    return Expr::scaled(coef * lead, Expr::product(factors));
                }
                factors.insert(0, Expr::num(coef));
                Expr::Product(factors)
            }
            other => Expr::Product(vec![Expr::num(coef), other]),
        }
    }

    /// Sum with nested sums flattened and zero constants dropped
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Expr::Sum(inner) => flat.extend(inner),
                t if t.is_zero() => {}
                t => flat.push(t),
            }
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.remove(0),
            _ => Expr::Sum(flat),
        }
    }

    pub fn product(factors: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Expr::Product(inner) => flat.extend(inner),
                f => flat.push(f),
            }
        }
        match flat.len() {
            0 => Expr::int(1),
            1 => flat.remove(0),
            _ => Expr::Product(flat),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(r) if r.is_zero())
    }

    /// Floating point value at `x`
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Const(r) => r.to_f64(),
            Expr::Angle(a) => a.to_f64(),
            Expr::Var => x,
            Expr::Func(f, arg) => f.eval(arg.eval(x)),
            Expr::Arc(f, inner) => f.eval(inner.eval(x)),
            Expr::Pow(base, p) => base.eval(x).powi(*p as i32),
            Expr::Sum(terms) => terms.iter().map(|t| t.eval(x)).sum(),
            Expr::Product(factors) => factors.iter().map(|f| f.eval(x)).product(),
            Expr::Neg(inner) => -inner.eval(x),
        }
    }

    /// Exact value at the angle `x`; `None` when a term leaves Q(√2, √3),
    /// hits a pole or falls off the π/12 grid
    pub fn eval_exact(&self, x: Angle) -> Option<Surd> {
        match self {
            Expr::Const(r) => r.exact().copied(),
            Expr::Angle(_) | Expr::Var | Expr::Arc(..) => None,
            Expr::Func(f, arg) => f.exact(&arg.at(x)),
            Expr::Pow(base, p) => base.eval_exact(x).map(|v| v.pow(*p)),
            Expr::Sum(terms) => terms
                .iter()
                .try_fold(Surd::ZERO, |acc, t| Some(acc + t.eval_exact(x)?)),
            Expr::Product(factors) => factors
                .iter()
                .try_fold(Surd::ONE, |acc, f| Some(acc * f.eval_exact(x)?)),
            Expr::Neg(inner) => inner.eval_exact(x).map(|v| -v),
        }
    }

    /// Typst math markup
    pub fn markup(&self) -> String {
        match self {
            Expr::Const(r) => r.markup(),
            Expr::Angle(a) => a.markup(),
            Expr::Var => "x".to_string(),
            Expr::Func(f, arg) => format!("{}({})", f.markup(), arg.markup()),
            Expr::Arc(f, inner) => format!("{}({})", f.markup(), inner.markup()),
            Expr::Pow(base, p) => match base.as_ref() {
                Expr::Func(f, arg) => format!("{}^{} ({})", f.markup(), p, arg.markup()),
                Expr::Var => format!("x^{}", p),
                other => format!("({})^{}", other.markup(), p),
            },
            Expr::Sum(terms) => {
                let mut out = String::new();
                for (i, term) in terms.iter().enumerate() {
                    let (negative, magnitude) = split_sign(term);
                    let body = if negative && magnitude.needs_parens_after_minus() {
                        format!("({})", magnitude.markup())
                    } else {
                        magnitude.markup()
                    };
                    match (i, negative) {
                        (0, true) => out.push_str(&format!("-{}", body)),
                        (0, false) => out.push_str(&body),
                        (_, true) => out.push_str(&format!(" - {}", body)),
                        (_, false) => out.push_str(&format!(" + {}", body)),
                    }
                }
                out
            }
            Expr::Product(factors) => {
                let mut parts = Vec::with_capacity(factors.len());
                let mut prefix = "";
                for (i, factor) in factors.iter().enumerate() {
                    if i == 0 {
                        if let Expr::Const(Real::Exact(c)) = factor {
                            if *c == -Surd::ONE {
                                prefix = "-";
                                continue;
                            }
                            if c.is_one() {
                                continue;
                            }
                            if !c.is_compound() {
                                parts.push(c.markup());
                                continue;
                            }
                        }
                    }
                    parts.push(factor.factor_markup());
                }
                format!("{}{}", prefix, parts.join(" "))
            }
            Expr::Neg(inner) => match inner.as_ref() {
                Expr::Sum(_) => format!("-({})", inner.markup()),
                other => format!("-{}", other.markup()),
            },
        }
    }

    /// Markup as a non-leading factor of a product
    fn factor_markup(&self) -> String {
        match self {
            Expr::Sum(_) | Expr::Neg(_) => format!("({})", self.markup()),
            Expr::Const(r) if r.is_compound() || r.is_negative() => format!("({})", self.markup()),
            Expr::Angle(a) if a.is_negative() => format!("({})", self.markup()),
            _ => self.markup(),
        }
    }

    fn needs_parens_after_minus(&self) -> bool {
        match self {
            Expr::Sum(_) => true,
            Expr::Const(r) => r.is_compound(),
            _ => false,
        }
    }
}

/// Split a summand into its sign and magnitude for display
fn split_sign(e: &Expr) -> (bool, Expr) {
    match e {
        Expr::Neg(inner) => (true, inner.as_ref().clone()),
        Expr::Const(r) if r.is_negative() => (true, Expr::Const(r.neg())),
        Expr::Angle(a) if a.is_negative() => (true, Expr::Angle(-*a)),
        Expr::Product(factors) => match factors.first() {
            Some(Expr::Const(Real::Exact(c))) if c.is_negative() => {
                let mut rest = factors[1..].to_vec();
                let magnitude = -*c;
                if !magnitude.is_one() {
                    rest.insert(0, Expr::num(magnitude));
                }
                (true, Expr::product(rest))
            }
            _ => (false, e.clone()),
        },
        _ => (false, e.clone()),
    }
}

// =============================================================================
// Equation
// =============================================================================

/// An equality `lhs = rhs` in the free variable `x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    pub fn markup(&self) -> String {
        format!("{} = {}", self.lhs.markup(), self.rhs.markup())
    }

    /// `lhs(x) - rhs(x)`
    pub fn residual(&self, x: f64) -> f64 {
        self.lhs.eval(x) - self.rhs.eval(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_markup() {
        assert_eq!(Arg::x().markup(), "x");
        assert_eq!(Arg::times(3).markup(), "3 x");
        assert_eq!(Arg::scaled(Rational::new(3, 2)).markup(), "frac(3 x, 2)");
        assert_eq!(Arg::new(Rational::int(2), Angle::pi_frac(1, 6)).markup(), "2 x + frac(pi, 6)");
        assert_eq!(Arg::new(Rational::ONE, Angle::pi_frac(-1, 4)).markup(), "x - frac(pi, 4)");
    }

    #[test]
    fn test_sum_markup_signs() {
        let e = Expr::sum(vec![
            Expr::func_pow(TrigFn::Sin, Arg::x(), 2),
            Expr::scaled(
                Surd::frac(-5, 2),
                Expr::product(vec![Expr::func(TrigFn::Sin, Arg::x()), Expr::func(TrigFn::Cos, Arg::x())]),
            ),
            Expr::func_pow(TrigFn::Cos, Arg::x(), 2),
        ]);
        assert_eq!(e.markup(), "sin^2 (x) - frac(5, 2) sin(x) cos(x) + cos^2 (x)");
    }

    #[test]
    fn test_negative_leading_term() {
        let e = Expr::sum(vec![
            Expr::neg(Expr::func(TrigFn::Cos, Arg::times(2))),
            Expr::int(-3),
        ]);
        assert_eq!(e.markup(), "-cos(2 x) - 3");
        let compound = Expr::sum(vec![Expr::Var, Expr::num(Surd::sqrt(3) - Surd::int(2))]);
        assert_eq!(compound.markup(), "x - (2 - sqrt(3))");
    }

    #[test]
    fn test_product_with_sum_factor() {
        let e = Expr::scaled(
            Surd::int(2),
            Expr::sum(vec![Expr::func(TrigFn::Sin, Arg::x()), Expr::func(TrigFn::Cos, Arg::x())]),
        );
        assert_eq!(e.markup(), "2 (sin(x) + cos(x))");
    }

    #[test]
    fn test_eval() {
        let eq = Equation::new(
            Expr::scaled(Surd::int(2), Expr::func(TrigFn::Sin, Arg::x())),
            Expr::int(1),
        );
        assert!(eq.residual(std::f64::consts::PI / 6.0).abs() < 1e-12);
        assert_eq!(eq.markup(), "2 sin(x) = 1");
    }

    #[test]
    fn test_eval_exact_on_grid() {
        let e = Expr::sum(vec![
            Expr::func(TrigFn::Sin, Arg::times(2)),
            Expr::func(TrigFn::Cos, Arg::x()),
        ]);
        assert_eq!(e.eval_exact(Angle::pi_frac(1, 6)), Some(Surd::sqrt(3)));
        let squared = Expr::func_pow(TrigFn::Sin, Arg::new(Rational::ONE, Angle::pi_frac(1, 4)), 2);
        assert_eq!(squared.eval_exact(Angle::ZERO), Some(Surd::frac(1, 2)));
    }

    #[test]
    fn test_eval_exact_gives_up() {
        let tan = Expr::func(TrigFn::Tan, Arg::x());
        assert_eq!(tan.eval_exact(Angle::pi_frac(1, 2)), None);
        assert_eq!(tan.eval_exact(Angle::pi_frac(1, 5)), None);
        assert_eq!(Expr::Var.eval_exact(Angle::ZERO), None);
    }
}
