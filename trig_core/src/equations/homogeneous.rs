//! Category 2: homogeneous equations of the second degree.
//!
//! `sin²x + B sin x cos x + C cos²x = 0` is built from two tangent values
//! `t1, t2` with Vieta's formulas `B = -(t1 + t2)`, `C = t1·t2`. Dividing by
//! `cos²x` leaves `t² + Bt + C = 0` in `t = tan x`.

use rand::Rng;

use crate::algebra::{Arg, Equation, Expr, Polynomial, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_all, narrate_quadratic, solve_all, sorted_roots, BasicEquation};
use super::registry::Category;
use super::{inline, pick};

/// `a sin²x + b sin x cos x + c cos²x`
pub(crate) fn quadratic_form(a: Surd, b: Surd, c: Surd) -> Expr {
    let x = Arg::x();
    Expr::sum(vec![
        Expr::scaled(a, Expr::func_pow(TrigFn::Sin, x, 2)),
        Expr::scaled(
            b,
            Expr::product(vec![Expr::func(TrigFn::Sin, x), Expr::func(TrigFn::Cos, x)]),
        ),
        Expr::scaled(c, Expr::func_pow(TrigFn::Cos, x, 2)),
    ])
}

/// `tan x = t` for every distinct root
pub(crate) fn tangent_equations(roots: &[Real]) -> Vec<BasicEquation> {
    roots
        .iter()
        .map(|t| BasicEquation::new(TrigFn::Tan, Arg::x(), t.clone()))
        .collect()
}

/// Narrate `a sin²x + b sin x cos x + c cos²x = 0` (with `a ≠ 0`) down to
/// the tangent equations.
pub(crate) fn narrate_homogeneous(out: &mut Narration, a: Surd, b: Surd, c: Surd, roots: &[Real]) {
    out.text("This is a homogeneous trigonometric equation of the second degree.");
    out.text(format!(
        "If {} then {}, and the equation would reduce to {}, which is false. So {} and we can divide both sides by {}:",
        inline("cos(x) = 0"),
        inline("sin^2 (x) = 1"),
        inline(format!("{} = 0", a.markup())),
        inline("cos(x) != 0"),
        inline("cos^2 (x)")
    ));
    let poly = Polynomial::from_descending(&[a, b, c]);
    out.math(format!("{} = 0", poly.markup("tan(x)").replace("tan(x)^2", "tan^2 (x)")));
    out.text(format!("Substitute {}:", inline("t = tan(x)")));
    narrate_quadratic(out, &poly, "t", roots);
    out.text("Returning to the substitution:");
    narrate_all(out, &tangent_equations(roots));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Homogeneous {
    pub t1: Surd,
    pub t2: Surd,
}

impl Homogeneous {
    pub fn new(t1: Surd, t2: Surd) -> Self {
        Homogeneous { t1, t2 }
    }

    fn coefficients(&self) -> (Surd, Surd, Surd) {
        (Surd::ONE, -(self.t1 + self.t2), self.t1 * self.t2)
    }

    fn roots(&self) -> Vec<Real> {
        sorted_roots(vec![Real::Exact(self.t1), Real::Exact(self.t2)])
    }
}

impl Problem for Homogeneous {
    const CATEGORY: Category = Category::Homogeneous;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let t1 = Surd::int(pick(rng, &[-3, -2, -1, 1, 2, 3]));
        let t2 = pick(rng, &[-Surd::ONE, Surd::ONE, Surd::frac(1, 2), Surd::int(2)]);
        ensure(t1 != t2, "double root")?;
        Ok(Homogeneous::new(t1, t2))
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.coefficients();
        Parameters::new()
            .with("t1", self.t1)
            .with("t2", self.t2)
            .with("A", a)
            .with("B", b)
            .with("C", c)
    }

    fn equation(&self) -> Equation {
        let (a, b, c) = self.coefficients();
        Equation::new(quadratic_form(a, b, c), Expr::zero())
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&tangent_equations(&self.roots()))
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (a, b, c) = self.coefficients();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        narrate_homogeneous(out, a, b, c, &self.roots());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;

    #[test]
    fn test_vieta_scenario() {
        let p = Homogeneous::new(Surd::int(2), Surd::frac(1, 2));
        assert_eq!(
            p.equation().markup(),
            "sin^2 (x) - frac(5, 2) sin(x) cos(x) + cos^2 (x) = 0"
        );
        assert_eq!(
            p.solve().markup(),
            "{arctan(frac(1, 2)) + pi n | n in ZZ} union {arctan(2) + pi n | n in ZZ}"
        );
    }

    #[test]
    fn test_tabulated_roots() {
        let p = Homogeneous::new(Surd::int(-1), Surd::ONE);
        assert_eq!(p.equation().markup(), "sin^2 (x) - cos^2 (x) = 0");
        // tan x = ±1 merge into one family of period π/2
        assert_eq!(p.solve().markup(), "{frac(pi, 4) + frac(pi n, 2) | n in ZZ}");
    }

    #[test]
    fn test_narration_mentions_substitution() {
        let p = Homogeneous::new(Surd::int(3), Surd::int(-1));
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        let steps = instance.steps();
        assert!(steps.iter().any(|s| s.markup == "tan^2 (x) - 2 tan(x) - 3 = 0"));
        assert!(steps.iter().any(|s| s.markup.contains("t_1 = -1, quad t_2 = 3")));
    }
}
