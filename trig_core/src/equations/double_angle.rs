//! Category 7: `A cos(2x) + B f(x) + C = 0` for `f ∈ {sin, cos}`.
//!
//! The double-angle formula written through `f` turns the equation into
//! twice the quadratic `a f² + b f + c = 0` built from the chosen roots:
//! for sine `A = -a`, for cosine `A = a`, and in both cases `B = 2b`,
//! `C = a + 2c`.

use rand::Rng;

use crate::algebra::{clearing_factor, Arg, Equation, Expr, Polynomial, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_all, narrate_quadratic, solve_all, sorted_roots, BasicEquation};
use super::registry::Category;
use super::{inline, pick};

fn nice_roots() -> Vec<Surd> {
    let half = Surd::frac(1, 2);
    let mut roots = vec![Surd::ZERO, Surd::ONE, -Surd::ONE];
    for v in [half, Surd::sqrt(3) * half, Surd::sqrt(2) * half] {
        roots.push(v);
        roots.push(-v);
    }
    roots
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleAngle {
    pub func: TrigFn,
    pub t1: Surd,
    pub t2: Surd,
}

impl DoubleAngle {
    pub fn new(func: TrigFn, t1: Surd, t2: Surd) -> Self {
        DoubleAngle { func, t1, t2 }
    }

    /// `(a, b, c)` of the quadratic in `f(x)`, denominators cleared
    pub fn kernel(&self) -> (Surd, Surd, Surd) {
        let raw = [Surd::ONE, -(self.t1 + self.t2), self.t1 * self.t2];
        let factor = Surd::rational(clearing_factor(&raw));
        (raw[0] * factor, raw[1] * factor, raw[2] * factor)
    }

    /// `(A, B, C)` of the displayed equation
    pub fn coefficients(&self) -> (Surd, Surd, Surd) {
        let (a, b, c) = self.kernel();
        let two = Surd::int(2);
        let lead = match self.func {
            TrigFn::Sin => -a,
            _ => a,
        };
        (lead, two * b, a + two * c)
    }

    fn double_angle_formula(&self) -> Expr {
        let square = Expr::func_pow(self.func, Arg::x(), 2);
        match self.func {
            TrigFn::Sin => Expr::sum(vec![Expr::int(1), Expr::scaled(Surd::int(-2), square)]),
            _ => Expr::sum(vec![Expr::scaled(Surd::int(2), square), Expr::int(-1)]),
        }
    }

    fn roots(&self) -> Vec<Real> {
        sorted_roots(vec![Real::Exact(self.t1), Real::Exact(self.t2)])
    }

    fn equations(&self) -> Vec<BasicEquation> {
        self.roots()
            .into_iter()
            .map(|t| BasicEquation::new(self.func, Arg::x(), t))
            .collect()
    }

    fn quadratic_in_f(&self, a: Surd, b: Surd, c: Surd) -> Expr {
        Expr::sum(vec![
            Expr::scaled(a, Expr::func_pow(self.func, Arg::x(), 2)),
            Expr::scaled(b, Expr::func(self.func, Arg::x())),
            Expr::num(c),
        ])
    }
}

impl Problem for DoubleAngle {
    const CATEGORY: Category = Category::DoubleAngle;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
        let nice = nice_roots();
        let mut with_traps = nice.clone();
        with_traps.extend([Surd::int(2), Surd::int(-2), Surd::int(3), Surd::frac(3, 2)]);
        let t1 = pick(rng, &nice);
        let t2 = pick(rng, &with_traps);
        ensure(!(t1 + t2).is_zero(), "opposite roots")?;
        let problem = DoubleAngle::new(func, t1, t2);
        let (a, b, c) = problem.kernel();
        ensure(
            a.is_rational() && b.is_rational() && c.is_rational(),
            "irrational coefficients",
        )?;
        let (lead, _, _) = problem.coefficients();
        ensure(!lead.is_zero(), "no double-angle term")?;
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.coefficients();
        Parameters::new()
            .with("f", self.func)
            .with("t1", self.t1)
            .with("t2", self.t2)
            .with("A", a)
            .with("B", b)
            .with("C", c)
    }

    fn equation(&self) -> Equation {
        let (a, b, c) = self.coefficients();
        Equation::new(
            Expr::sum(vec![
                Expr::scaled(a, Expr::func(TrigFn::Cos, Arg::times(2))),
                Expr::scaled(b, Expr::func(self.func, Arg::x())),
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
        let f_x = Expr::func(self.func, Arg::x()).markup();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text(format!(
            "The equation contains {} and {}. Express the double angle through {}:",
            inline("cos(2 x)"),
            inline(&f_x),
            inline(&f_x)
        ));
        out.math(format!("cos(2 x) = {}", self.double_angle_formula().markup()));
        out.text("Substitute it into the equation:");
        out.math(format!(
            "{} = 0",
            Expr::sum(vec![
                Expr::scaled(big_a, self.double_angle_formula()),
                Expr::scaled(big_b, Expr::func(self.func, Arg::x())),
                Expr::num(big_c),
            ])
            .markup()
        ));
        let two = Surd::int(2);
        out.text("Expand the brackets and collect like terms:");
        out.math(format!("{} = 0", self.quadratic_in_f(two * a, two * b, two * c).markup()));
        out.text("Divide both sides by 2:");
        out.math(format!("{} = 0", self.quadratic_in_f(a, b, c).markup()));
        out.text(format!(
            "Substitute {}, where {}:",
            inline(format!("t = {}", f_x)),
            inline("abs(t) <= 1")
        ));
        narrate_quadratic(out, &Polynomial::from_descending(&[a, b, c]), "t", &self.roots());
        out.text("Returning to the substitution:");
        narrate_all(out, &self.equations());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sine_coefficients() {
        let p = DoubleAngle::new(TrigFn::Sin, Surd::frac(1, 2), Surd::ONE);
        assert_eq!(p.kernel(), (Surd::int(2), Surd::int(-3), Surd::ONE));
        assert_eq!(p.equation().markup(), "-2 cos(2 x) - 6 sin(x) + 4 = 0");
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_cosine_with_trap_root() {
        let p = DoubleAngle::new(TrigFn::Cos, Surd::ZERO, Surd::int(2));
        assert_eq!(p.equation().markup(), "cos(2 x) - 4 cos(x) + 1 = 0");
        assert_eq!(p.solve().markup(), "{frac(pi, 2) + pi n | n in ZZ}");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup == "cos^2 (x) - 2 cos(x) = 0"));
    }

    #[test]
    fn test_sampled_coefficients_rational() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..300 {
            if let Ok(p) = DoubleAngle::sample(&mut rng) {
                let (a, b, c) = p.coefficients();
                assert!(a.is_rational() && b.is_rational() && c.is_rational());
                assert!(!a.is_zero());
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
            }
        }
    }
}
