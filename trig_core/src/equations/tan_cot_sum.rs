//! Category 12: `A (tan²x + cot²x) + B (tan x + cot x) + C = 0`.
//!
//! With `t = tan x + cot x` and `tan x · cot x = 1` the squares become
//! `t² - 2`, so the equation is the quadratic `a t² + b t + c = 0` with
//! `A = a`, `B = b`, `C = c + 2a`. A root with `|t| < 2` is impossible, since
//! `|tan x + 1/tan x| >= 2`; every other root leads to `y² - t y + 1 = 0` in
//! `y = tan x`.

use std::cmp::Ordering;

use rand::Rng;

use crate::algebra::{clearing_factor, Arg, Equation, Expr, Polynomial, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{bracket_plus_markup, narrate_all, narrate_quadratic, solve_all, BasicEquation};
use super::homogeneous::tangent_equations;
use super::registry::Category;
use super::{inline, pick};

/// Whether `|t| < 2`, which `tan x + cot x` never reaches
fn below_two(t: &Surd) -> bool {
    t.abs().cmp_value(&Surd::int(2)) == Ordering::Less
}

/// `y² - t y + 1` for `y = tan x`
fn tangent_quadratic(t: Surd) -> Polynomial {
    Polynomial::from_descending(&[Surd::ONE, -t, Surd::ONE])
}

#[derive(Debug, Clone, PartialEq)]
pub struct TanCotSum {
    pub t1: Surd,
    pub t2: Surd,
}

impl TanCotSum {
    pub fn new(t1: Surd, t2: Surd) -> Self {
        TanCotSum { t1, t2 }
    }

    /// `(a, b, c)` of the quadratic in `t`
    pub fn kernel(&self) -> (Surd, Surd, Surd) {
        let raw = [Surd::ONE, -(self.t1 + self.t2), self.t1 * self.t2];
        let factor = Surd::rational(clearing_factor(&raw));
        (raw[0] * factor, raw[1] * factor, raw[2] * factor)
    }

    /// `(A, B, C)` of the displayed equation
    pub fn coefficients(&self) -> (Surd, Surd, Surd) {
        let (a, b, c) = self.kernel();
        (a, b, c + Surd::int(2) * a)
    }

    /// Distinct roots in ascending order
    fn t_roots(&self) -> Vec<Surd> {
        let mut roots = vec![self.t1, self.t2];
        roots.sort_by(|x, y| x.cmp_value(y));
        roots.dedup();
        roots
    }

    fn tangent_values(t: Surd) -> Vec<Real> {
        tangent_quadratic(t).real_roots()
    }

    fn equations(&self) -> Vec<BasicEquation> {
        self.t_roots()
            .into_iter()
            .filter(|t| !below_two(t))
            .flat_map(|t| tangent_equations(&Self::tangent_values(t)))
            .collect()
    }
}

impl Problem for TanCotSum {
    const CATEGORY: Category = Category::TanCotSum;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let four_thirds = Surd::sqrt(3) * Surd::frac(4, 3);
        let valid = [Surd::int(2), Surd::int(-2), four_thirds, -four_thirds];
        let dummy = [Surd::ZERO, Surd::ONE, -Surd::ONE];
        let t1 = pick(rng, &valid);
        let t2 = if rng.gen_bool(0.5) {
            pick(rng, &valid)
        } else {
            pick(rng, &dummy)
        };
        ensure(!(t1 + t2).is_zero(), "opposite roots leave no tan(x) + cot(x) term")?;
        Ok(TanCotSum::new(t1, t2))
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
        let x = Arg::x();
        Equation::new(
            Expr::sum(vec![
                Expr::scaled(
                    a,
                    Expr::sum(vec![Expr::func_pow(TrigFn::Tan, x, 2), Expr::func_pow(TrigFn::Cot, x, 2)]),
                ),
                Expr::scaled(
                    b,
                    Expr::sum(vec![Expr::func(TrigFn::Tan, x), Expr::func(TrigFn::Cot, x)]),
                ),
                Expr::num(c),
            ]),
            Expr::zero(),
        )
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (big_a, big_b, big_c) = self.coefficients();
        let (a, b, c) = self.kernel();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text(format!("Substitute {}. Squaring it gives", inline("t = tan(x) + cot(x)")));
        out.math("t^2 = (tan(x) + cot(x))^2 = tan^2 (x) + 2 tan(x) cot(x) + cot^2 (x)");
        out.text(format!("Since {}:", inline("tan(x) cot(x) = 1")));
        out.math("tan^2 (x) + cot^2 (x) = t^2 - 2");
        out.text("Substitute into the equation:");
        out.math(format!(
            "{} = 0",
            bracket_plus_markup(big_a, "t^2 - 2", &Polynomial::from_descending(&[big_b, big_c]), "t")
        ));
        out.text("Expand the brackets and collect like terms:");
        let roots: Vec<Real> = self.t_roots().into_iter().map(Real::Exact).collect();
        narrate_quadratic(out, &Polynomial::from_descending(&[a, b, c]), "t", &roots);
        out.text(format!(
            "Note that {} for every admissible {}.",
            inline("abs(t) = abs(tan(x) + 1 / tan(x)) >= 2"),
            inline("x")
        ));

        let mut solved = Vec::new();
        for t in self.t_roots() {
            if below_two(&t) {
                out.text(format!(
                    "The root {} gives no solutions, since {}.",
                    inline(format!("t = {}", t.markup())),
                    inline(format!("abs({}) < 2", t.markup()))
                ));
                continue;
            }
            out.math(format!("tan(x) + cot(x) = {}", t.markup()));
            out.text(format!(
                "Write {} and multiply by {}. With {}:",
                inline("cot(x) = 1 / tan(x)"),
                inline("tan(x) != 0"),
                inline("y = tan(x)")
            ));
            let values = Self::tangent_values(t);
            narrate_quadratic(out, &tangent_quadratic(t), "y", &values);
            let equations = tangent_equations(&values);
            narrate_all(out, &equations);
            solved.extend(equations);
        }
        if solved.is_empty() {
            out.text("No root satisfies the condition, so the equation has no solutions.");
        } else if solved.len() > 1 {
            out.text("Combining the solutions of all equations:");
            out.math(solve_all(&solved).markup());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_root_two_with_dummy() {
        let p = TanCotSum::new(Surd::int(2), Surd::ZERO);
        assert_eq!(p.coefficients(), (Surd::ONE, Surd::int(-2), Surd::int(2)));
        assert_eq!(
            p.equation().markup(),
            "tan^2 (x) + cot^2 (x) - 2 (tan(x) + cot(x)) + 2 = 0"
        );
        assert_eq!(p.solve().markup(), "{frac(pi, 4) + pi n | n in ZZ}");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup.contains("abs(0) < 2")));
    }

    #[test]
    fn test_irrational_root() {
        let t = Surd::sqrt(3) * Surd::frac(4, 3);
        let values = TanCotSum::tangent_values(t);
        assert_eq!(values.len(), 2);
        let p = TanCotSum::new(t, Surd::ONE);
        let markup = p.solve().markup();
        assert!(markup.contains("frac(pi, 6)") && markup.contains("frac(pi, 3)"));
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let Ok(p) = TanCotSum::sample(&mut rng) else {
                continue;
            };
            assert!(!below_two(&p.t1));
            assert!(!(p.t1 + p.t2).is_zero());
            assert!(p.equation().markup().contains("tan(x) + cot(x)"));
            assert!(EquationInstance::from_problem(&p, 1).is_ok());
        }
    }

    #[test]
    fn test_opposite_roots_rejected() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut rejected = 0;
        for _ in 0..400 {
            match TanCotSum::sample(&mut rng) {
                Ok(p) => assert!(!p.coefficients().1.is_zero()),
                Err(_) => rejected += 1,
            }
        }
        assert!(rejected > 0);
    }

    #[test]
    fn test_small_roots_have_no_solutions() {
        let p = TanCotSum::new(Surd::ONE, Surd::ZERO);
        assert!(p.solve().is_empty());
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        let steps = instance.steps();
        assert!(steps.iter().any(|s| s.markup.contains("abs(1) < 2")));
        assert!(steps.iter().any(|s| s.markup.contains("abs(0) < 2")));
        let n = steps.len();
        assert_eq!(steps[n - 2].markup, "Answer: the equation has no real solutions.");
        assert_eq!(steps[n - 1].kind, crate::instance::StepKind::Math);
        assert_eq!(steps[n - 1].markup, "emptyset");
    }
}
