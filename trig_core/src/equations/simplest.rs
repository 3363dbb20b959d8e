//! Category 1: the simplest equation `A·f(kx + b) = A·v`.
//!
//! `v` comes from the tabulated values of `f`, so the principal inverse value
//! is always a multiple of π/12. At `v ∈ {0, ±1}` the simplified
//! single-family formulas apply.

use rand::Rng;

use crate::algebra::{Angle, Arg, Equation, Expr, Rational, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{Narration, Parameters, Problem, Rejection};

use super::formulas::BasicEquation;
use super::registry::Category;
use super::{inline, pick};

/// Tabulated right-hand sides for sine and cosine
pub fn bounded_values() -> Vec<Surd> {
    let half = Surd::frac(1, 2);
    let mut values = vec![Surd::ZERO, Surd::ONE, -Surd::ONE];
    for v in [half, Surd::sqrt(2) * half, Surd::sqrt(3) * half] {
        values.push(v);
        values.push(-v);
    }
    values
}

/// Tabulated right-hand sides for tangent and cotangent
pub fn unbounded_values() -> Vec<Surd> {
    let mut values = vec![Surd::ZERO, Surd::ONE, -Surd::ONE];
    for v in [Surd::sqrt(3) * Surd::frac(1, 3), Surd::sqrt(3)] {
        values.push(v);
        values.push(-v);
    }
    values
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simplest {
    pub func: TrigFn,
    pub arg: Arg,
    pub coef: i64,
    pub value: Surd,
}

impl Simplest {
    pub fn new(func: TrigFn, arg: Arg, coef: i64, value: Surd) -> Self {
        Simplest { func, arg, coef, value }
    }

    fn basic(&self) -> BasicEquation {
        BasicEquation::new(self.func, self.arg, Real::Exact(self.value))
    }
}

impl Problem for Simplest {
    const CATEGORY: Category = Category::Simplest;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &TrigFn::ALL);
        let k = pick(rng, &[1, 1, 2, 3]);
        let b = pick(
            rng,
            &[
                Angle::ZERO,
                Angle::ZERO,
                Angle::pi_frac(1, 6),
                Angle::pi_frac(1, 4),
                Angle::pi_frac(1, 3),
            ],
        );
        let coef = pick(rng, &[1, 1, 2, -1]);
        let values = if func.is_bounded() {
            bounded_values()
        } else {
            unbounded_values()
        };
        let value = pick(rng, &values);
        Ok(Simplest::new(func, Arg::new(Rational::int(k), b), coef, value))
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("f", self.func)
            .with("k", self.arg.k.numer())
            .with("b", self.arg.b)
            .with("A", self.coef)
            .with("v", self.value)
    }

    fn equation(&self) -> Equation {
        let a = Surd::int(self.coef);
        Equation::new(
            Expr::scaled(a, Expr::func(self.func, self.arg)),
            Expr::num(a * self.value),
        )
    }

    fn solve(&self) -> SolutionSet {
        self.basic().solve()
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let basic = self.basic();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        if self.coef != 1 {
            out.text(format!("Divide both sides by {}:", inline(self.coef.to_string())));
            out.math(basic.markup());
        }
        out.text("This is a simplest trigonometric equation.");
        basic.narrate(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;

    #[test]
    fn test_equation_markup() {
        let p = Simplest::new(
            TrigFn::Cos,
            Arg::new(Rational::int(2), Angle::pi_frac(1, 4)),
            2,
            Surd::sqrt(3) * Surd::frac(1, 2),
        );
        assert_eq!(p.equation().markup(), "2 cos(2 x + frac(pi, 4)) = sqrt(3)");
    }

    #[test]
    fn test_special_case_solution() {
        let p = Simplest::new(TrigFn::Sin, Arg::times(3), -1, -Surd::ONE);
        assert_eq!(p.equation().markup(), "-sin(3 x) = 1");
        assert_eq!(p.solve().markup(), "{-frac(pi, 6) + frac(2 pi n, 3) | n in ZZ}");
    }

    #[test]
    fn test_tangent_general_case() {
        let p = Simplest::new(TrigFn::Tan, Arg::x(), 1, Surd::sqrt(3));
        assert_eq!(p.solve().markup(), "{frac(pi, 3) + pi n | n in ZZ}");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup.contains("arctan(sqrt(3))")));
    }

    #[test]
    fn test_value_tables() {
        assert_eq!(bounded_values().len(), 9);
        assert_eq!(unbounded_values().len(), 7);
        assert!(bounded_values().iter().all(|v| !Real::Exact(*v).exceeds(&Surd::ONE)));
    }
}
