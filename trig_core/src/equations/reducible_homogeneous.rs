//! Category 9: `(A+D) sin²x + B sin x cos x + (C+D) cos²x = D`.
//!
//! Writing the constant as `D (sin²x + cos²x)` and moving it to the left
//! restores the homogeneous kernel `A sin²x + B sin x cos x + C cos²x = 0`,
//! which is then solved as in category 2.

use rand::Rng;

use crate::algebra::{clearing_factor, Arg, Equation, Expr, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{solve_all, sorted_roots};
use super::homogeneous::{narrate_homogeneous, quadratic_form, tangent_equations};
use super::registry::Category;
use super::{inline, pick};

fn tangent_roots() -> Vec<Surd> {
    let third = Surd::sqrt(3) * Surd::frac(1, 3);
    vec![
        Surd::ZERO,
        Surd::ONE,
        -Surd::ONE,
        Surd::sqrt(3),
        -Surd::sqrt(3),
        third,
        -third,
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReducibleHomogeneous {
    pub t1: Surd,
    pub t2: Surd,
    /// Leading coefficient of the kernel before clearing denominators
    pub lead: i64,
    /// Constant on the right-hand side
    pub d: i64,
}

impl ReducibleHomogeneous {
    pub fn new(t1: Surd, t2: Surd, lead: i64, d: i64) -> Self {
        ReducibleHomogeneous { t1, t2, lead, d }
    }

    /// `(A, B, C)` of the homogeneous kernel
    pub fn kernel(&self) -> (Surd, Surd, Surd) {
        let a = Surd::int(self.lead);
        let raw = [a, -(a * (self.t1 + self.t2)), a * self.t1 * self.t2];
        let factor = Surd::rational(clearing_factor(&raw));
        (raw[0] * factor, raw[1] * factor, raw[2] * factor)
    }

    fn roots(&self) -> Vec<Real> {
        sorted_roots(vec![Real::Exact(self.t1), Real::Exact(self.t2)])
    }
}

impl Problem for ReducibleHomogeneous {
    const CATEGORY: Category = Category::ReducibleHomogeneous;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let roots = tangent_roots();
        let t1 = pick(rng, &roots);
        let t2 = pick(rng, &roots);
        let lead = pick(rng, &[1, 2, -1, -2]);
        let d = pick(rng, &[1, -1, 2, -2, 3]);
        let problem = ReducibleHomogeneous::new(t1, t2, lead, d);
        let (_, b, c) = problem.kernel();
        ensure(!b.is_zero(), "no mixed term")?;
        ensure(!c.is_zero(), "no cosine square")?;
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.kernel();
        Parameters::new()
            .with("t1", self.t1)
            .with("t2", self.t2)
            .with("A", a)
            .with("B", b)
            .with("C", c)
            .with("D", self.d)
    }

    fn equation(&self) -> Equation {
        let (a, b, c) = self.kernel();
        let d = Surd::int(self.d);
        Equation::new(quadratic_form(a + d, b, c + d), Expr::num(d))
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&tangent_equations(&self.roots()))
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (a, b, c) = self.kernel();
        let d = Surd::int(self.d);
        let equation = self.equation();
        out.text(format!("Solve {}.", inline(equation.markup())));
        let unit = Expr::scaled(
            d,
            Expr::sum(vec![
                Expr::func_pow(TrigFn::Sin, Arg::x(), 2),
                Expr::func_pow(TrigFn::Cos, Arg::x(), 2),
            ]),
        );
        out.text(format!(
            "The right-hand side is the constant {}. Multiply it by {}:",
            inline(format!("D = {}", d.markup())),
            inline("sin^2 (x) + cos^2 (x) = 1")
        ));
        out.math(format!("{} = {}", equation.lhs.markup(), unit.markup()));
        out.text("Move everything to the left and collect like terms:");
        out.math(format!("{} = 0", quadratic_form(a, b, c).markup()));
        narrate_homogeneous(out, a, b, c, &self.roots());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_double_root() {
        let p = ReducibleHomogeneous::new(Surd::ONE, Surd::ONE, 1, 2);
        assert_eq!(
            p.equation().markup(),
            "3 sin^2 (x) - 2 sin(x) cos(x) + 3 cos^2 (x) = 2"
        );
        assert_eq!(p.solve().markup(), "{frac(pi, 4) + pi n | n in ZZ}");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance
            .steps()
            .iter()
            .any(|s| s.markup == "sin^2 (x) - 2 sin(x) cos(x) + cos^2 (x) = 0"));
    }

    #[test]
    fn test_irrational_kernel_is_cleared() {
        let third = Surd::sqrt(3) * Surd::frac(1, 3);
        let p = ReducibleHomogeneous::new(Surd::sqrt(3), third, -1, 1);
        let (a, b, c) = p.kernel();
        assert_eq!(a, Surd::int(-3));
        assert_eq!(b, Surd::sqrt(3) * Surd::int(4));
        assert_eq!(c, Surd::int(-3));
        let markup = p.solve().markup();
        assert!(markup.contains("frac(pi, 6)") && markup.contains("frac(pi, 3)"));
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..300 {
            if let Ok(p) = ReducibleHomogeneous::sample(&mut rng) {
                assert!(!p.kernel().2.is_zero());
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
            }
        }
    }
}
