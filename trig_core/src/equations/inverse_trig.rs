//! Category 14: `k·arcf(P(x)) = k·arcf(V)` with `P` linear or quadratic.
//!
//! After dividing by `k` the right-hand side is the principal value
//! `α = arcf(V)`, which lies in the range of `arcf` by construction, so the
//! definition of the inverse function turns the equation into the algebraic
//! `P(x) = V`.
//! `P` is built as `a x + (V - a x1)` or `a (x - x1)(x - x2) + V`, so the
//! roots are the integers `x1` (and `x2`). Values outside the domain of
//! `arcf` are rejected while sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algebra::{Angle, Equation, Expr, InverseFn, Polynomial, Real, SolutionSet, Surd};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_quadratic, sorted_roots};
use super::registry::Category;
use super::{inline, pick};

/// Shape of the inner polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "degree", rename_all = "snake_case")]
pub enum Inner {
    /// `a x + (V - a x1)`
    Linear { a: i64, x1: i64 },
    /// `a (x - x1)(x - x2) + V`
    Quadratic { a: i64, x1: i64, x2: i64 },
}

impl Inner {
    fn degree(&self) -> usize {
        match self {
            Inner::Linear { .. } => 1,
            Inner::Quadratic { .. } => 2,
        }
    }

    /// `P(x) - V`, whose roots are the solutions
    fn shifted(&self) -> Polynomial {
        match *self {
            Inner::Linear { a, x1 } => Polynomial::from_roots(Surd::int(a), &[Surd::int(x1)]),
            Inner::Quadratic { a, x1, x2 } => {
                Polynomial::from_roots(Surd::int(a), &[Surd::int(x1), Surd::int(x2)])
            }
        }
    }

    fn roots(&self) -> Vec<Real> {
        let roots = match *self {
            Inner::Linear { x1, .. } => vec![Real::int(x1)],
            Inner::Quadratic { x1, x2, .. } => vec![Real::int(x1), Real::int(x2)],
        };
        sorted_roots(roots)
    }
}

/// `Σ c_i x^i` as an expression, highest degree first
fn polynomial_expr(poly: &Polynomial) -> Expr {
    let terms = (0..=poly.degree())
        .rev()
        .map(|i| Expr::scaled(poly.coeff(i), Expr::pow(Expr::Var, i as u32)))
        .collect();
    Expr::sum(terms)
}

/// Argument values with a tabulated principal value
fn tabulated_values(func: InverseFn) -> Vec<Surd> {
    let half = Surd::frac(1, 2);
    match func {
        InverseFn::Arcsin | InverseFn::Arccos => vec![
            Surd::ZERO,
            Surd::ONE,
            -Surd::ONE,
            half,
            -half,
            Surd::sqrt(2) * half,
            -(Surd::sqrt(2) * half),
            Surd::sqrt(3) * half,
            -(Surd::sqrt(3) * half),
        ],
        InverseFn::Arctan | InverseFn::Arccot => {
            let third = Surd::sqrt(3) * Surd::frac(1, 3);
            vec![Surd::ZERO, Surd::ONE, -Surd::ONE, Surd::sqrt(3), -Surd::sqrt(3), third, -third]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InverseTrig {
    pub func: InverseFn,
    pub value: Surd,
    pub k: i64,
    pub inner: Inner,
}

impl InverseTrig {
    /// Accept only values inside the domain of `func` with a tabulated
    /// principal value
    pub fn try_new(func: InverseFn, value: Surd, k: i64, inner: Inner) -> Result<Self, Rejection> {
        ensure(func.domain_contains(&value), "value outside the domain of the inverse function")?;
        ensure(func.exact(&value).is_some(), "principal value not tabulated")?;
        ensure(k >= 1, "non-positive multiplier")?;
        Ok(InverseTrig {
            func,
            value,
            k,
            inner,
        })
    }

    /// `arcf(V)`
    pub fn principal(&self) -> Angle {
        self.func.exact(&self.value).unwrap_or(Angle::ZERO)
    }

    /// `P(x)` itself
    pub fn inner_polynomial(&self) -> Polynomial {
        let shifted = self.inner.shifted();
        let mut coeffs: Vec<Surd> = (0..=shifted.degree()).map(|i| shifted.coeff(i)).collect();
        coeffs[0] = coeffs[0] + self.value;
        Polynomial::new(coeffs)
    }
}

impl Problem for InverseTrig {
    const CATEGORY: Category = Category::InverseTrig;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &InverseFn::ALL);
        let value = pick(rng, &tabulated_values(func));
        let k = pick(rng, &[1, 2, 3, 4]);
        let x1 = rng.gen_range(-5..=5);
        let inner = if rng.gen_bool(0.5) {
            Inner::Linear {
                a: pick(rng, &[1, -1, 2, -2, 3]),
                x1,
            }
        } else {
            Inner::Quadratic {
                a: pick(rng, &[1, -1, 2]),
                x1,
                x2: rng.gen_range(-5..=5),
            }
        };
        InverseTrig::try_new(func, value, k, inner)
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new()
            .with("arcf", self.func)
            .with("V", self.value)
            .with("alpha", self.principal())
            .with("k", self.k)
            .with("degree", self.inner.degree() as i64);
        params = match self.inner {
            Inner::Linear { a, x1 } => params.with("a", a).with("x1", x1),
            Inner::Quadratic { a, x1, x2 } => params.with("a", a).with("x1", x1).with("x2", x2),
        };
        params
    }

    fn equation(&self) -> Equation {
        let k = Surd::int(self.k);
        Equation::new(
            Expr::scaled(k, Expr::arc(self.func, polynomial_expr(&self.inner_polynomial()))),
            Expr::Angle(self.principal().scale(self.k.into())),
        )
    }

    fn solve(&self) -> SolutionSet {
        SolutionSet::from_points(self.inner.roots())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let f = self.func.markup();
        let p = polynomial_expr(&self.inner_polynomial()).markup();
        let alpha = self.principal();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        if self.k != 1 {
            out.text(format!("Divide both sides by {}:", inline(self.k.to_string())));
            out.math(format!("{}({}) = {}", f, p, alpha.markup()));
        }
        out.text(format!(
            "Check that the right-hand side lies in the range of {}, the interval {}.",
            inline(f),
            inline(self.func.range_markup())
        ));
        out.text("It does. By the definition of the inverse function:");
        let direct = self.func.direct().markup();
        out.math(format!("{} = {}({})", p, direct, alpha.markup()));
        out.text(format!(
            "Since {}, this is the algebraic equation",
            inline(format!("{}({}) = {}", direct, alpha.markup(), self.value.markup()))
        ));
        out.math(format!("{} = {}", p, self.value.markup()));
        let shifted = self.inner.shifted();
        let roots = self.inner.roots();
        match self.inner {
            Inner::Linear { x1, .. } => {
                out.math(format!("{} = 0", shifted.markup("x")));
                out.math(format!("x = {}", x1));
            }
            Inner::Quadratic { .. } => {
                if !self.value.is_zero() {
                    out.text("Move the constant to the left:");
                }
                narrate_quadratic(out, &shifted, "x", &roots);
            }
        }
        if matches!(self.func, InverseFn::Arcsin | InverseFn::Arccos) {
            out.text(format!(
                "Check: the roots must satisfy {}. At every root {} and {}, so all roots fit.",
                inline("abs(P(x)) <= 1"),
                inline(format!("P(x) = {}", self.value.markup())),
                inline(format!("abs({}) <= 1", self.value.markup()))
            ));
        }
    }
}
