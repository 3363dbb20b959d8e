//! Category 10: `A sin 2x + B (sin x ± cos x) + C = 0`.
//!
//! With `t = sin x ± cos x` the square gives `t² = 1 ± sin 2x`, so the
//! equation becomes the quadratic `a t² + b t + c = 0` it was built from.
//! Since `t = √2 sin(x ± π/4)`, roots with `|t| > √2` are discarded and the
//! others map back through `sin(x ± π/4) = t/√2`.

use rand::Rng;

use crate::algebra::{clearing_factor, Angle, Arg, Equation, Expr, Polynomial, Rational, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{bracket_plus_markup, narrate_quadratic, solve_all, sorted_roots, BasicEquation};
use super::identities::Sign;
use super::registry::Category;
use super::{inline, pick};

/// Roots of the quadratic in `t`; `±2` lie outside `[-√2, √2]`
fn symmetric_roots() -> Vec<Surd> {
    let half_root = Surd::sqrt(2) * Surd::frac(1, 2);
    vec![
        Surd::ZERO,
        Surd::ONE,
        -Surd::ONE,
        Surd::sqrt(2),
        -Surd::sqrt(2),
        half_root,
        -half_root,
        Surd::int(2),
        -Surd::int(2),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symmetric {
    /// Operator in `sin x ± cos x`
    pub sign: Sign,
    pub t1: Surd,
    pub t2: Surd,
    pub lead: i64,
}

impl Symmetric {
    pub fn new(sign: Sign, t1: Surd, t2: Surd, lead: i64) -> Self {
        Symmetric { sign, t1, t2, lead }
    }

    /// `(a, b, c)` of the quadratic in `t`
    pub fn kernel(&self) -> (Surd, Surd, Surd) {
        let a = Surd::int(self.lead);
        let raw = [a, -(a * (self.t1 + self.t2)), a * self.t1 * self.t2];
        let factor = Surd::rational(clearing_factor(&raw));
        (raw[0] * factor, raw[1] * factor, raw[2] * factor)
    }

    /// `(A, B, C)` of the displayed equation
    pub fn coefficients(&self) -> (Surd, Surd, Surd) {
        let (a, b, c) = self.kernel();
        let lead = match self.sign {
            Sign::Plus => a,
            Sign::Minus => -a,
        };
        (lead, b, c + a)
    }

    fn substitution(&self) -> Expr {
        Expr::sum(vec![
            Expr::func(TrigFn::Sin, Arg::x()),
            Expr::scaled(self.sign.factor().into(), Expr::func(TrigFn::Cos, Arg::x())),
        ])
    }

    fn shift(&self) -> Angle {
        match self.sign {
            Sign::Plus => Angle::pi_frac(1, 4),
            Sign::Minus => Angle::pi_frac(-1, 4),
        }
    }

    fn roots(&self) -> Vec<Real> {
        sorted_roots(vec![Real::Exact(self.t1), Real::Exact(self.t2)])
    }

    /// `sin(x ± π/4) = t/√2` for a root within `[-√2, √2]`
    fn folded(&self, t: &Real) -> Option<BasicEquation> {
        if t.exceeds(&Surd::sqrt(2)) {
            return None;
        }
        let value = *t.exact()? * Surd::sqrt(2) * Surd::frac(1, 2);
        Some(BasicEquation::new(
            TrigFn::Sin,
            Arg::new(Rational::ONE, self.shift()),
            Real::Exact(value),
        ))
    }

    fn equations(&self) -> Vec<BasicEquation> {
        self.roots().iter().filter_map(|t| self.folded(t)).collect()
    }

    /// `A (t^2 - 1) + B t + C` (or `1 - t^2` for the difference)
    fn substituted_markup(&self) -> String {
        let (a, b, c) = self.coefficients();
        let double = match self.sign {
            Sign::Plus => "t^2 - 1",
            Sign::Minus => "1 - t^2",
        };
        bracket_plus_markup(a, double, &Polynomial::from_descending(&[b, c]), "t")
    }
}

impl Problem for Symmetric {
    const CATEGORY: Category = Category::Symmetric;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let roots = symmetric_roots();
        let t1 = pick(rng, &roots);
        let t2 = pick(rng, &roots);
        let bound = Surd::sqrt(2);
        ensure(
            !(Real::Exact(t1).exceeds(&bound) && Real::Exact(t2).exceeds(&bound)),
            "both roots outside [-sqrt(2), sqrt(2)]",
        )?;
        ensure(!(t1 + t2).is_zero(), "opposite roots leave no symmetric term")?;
        let sign = pick(rng, &[Sign::Plus, Sign::Minus]);
        let lead = pick(rng, &[1, -1, 2]);
        Ok(Symmetric::new(sign, t1, t2, lead))
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.coefficients();
        Parameters::new()
            .with("op", self.sign.markup())
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
                Expr::scaled(a, Expr::func(TrigFn::Sin, Arg::times(2))),
                Expr::scaled(b, self.substitution()),
                Expr::num(c),
            ]),
            Expr::zero(),
        )
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (a, b, c) = self.kernel();
        let substitution = self.substitution().markup();
        let op = self.sign.markup();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text(format!(
            "The equation is symmetric in {} and {}. Substitute {}.",
            inline("sin(x)"),
            inline("cos(x)"),
            inline(format!("t = {}", substitution))
        ));
        out.text("Square the substitution:");
        out.math(format!(
            "t^2 = ({substitution})^2 = sin^2 (x) {op} 2 sin(x) cos(x) + cos^2 (x) = 1 {op} sin(2 x)"
        ));
        out.math(match self.sign {
            Sign::Plus => "==> sin(2 x) = t^2 - 1",
            Sign::Minus => "==> sin(2 x) = 1 - t^2",
        });
        out.text(format!("Substitute {} and {} into the equation:", inline("sin(2 x)"), inline("t")));
        out.math(format!("{} = 0", self.substituted_markup()));
        out.text("Expand the brackets to get a quadratic equation:");
        let roots = self.roots();
        narrate_quadratic(out, &Polynomial::from_descending(&[a, b, c]), "t", &roots);

        let shifted = Arg::new(Rational::ONE, self.shift()).markup();
        out.text(format!(
            "Note that {}, so {}.",
            inline(format!("t = sqrt(2) sin({})", shifted)),
            inline("abs(t) <= sqrt(2)")
        ));
        out.text("Returning to the substitution:");
        let mut equations = Vec::new();
        for t in &roots {
            match self.folded(t) {
                None => {
                    out.text(format!(
                        "The root {} gives no solutions, since {}.",
                        inline(format!("t = {}", t.markup())),
                        inline(format!("abs({}) > sqrt(2)", t.markup()))
                    ));
                }
                Some(equation) => {
                    out.math(format!("{} = {}", substitution, t.markup()));
                    out.text(format!(
                        "Divide by {} and fold into the sine of a {}:",
                        inline("sqrt(2)"),
                        match self.sign {
                            Sign::Plus => "sum",
                            Sign::Minus => "difference",
                        }
                    ));
                    out.math(format!(
                        "sin(x) cos(frac(pi, 4)) {op} cos(x) sin(frac(pi, 4)) = {}",
                        equation.value.markup()
                    ));
                    out.math(equation.markup());
                    equation.narrate(out);
                    equations.push(equation);
                }
            }
        }
        if equations.len() > 1 {
            out.text("Combining the solutions of all equations:");
            out.math(solve_all(&equations).markup());
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
    fn test_sum_substitution() {
        let p = Symmetric::new(Sign::Plus, Surd::ONE, Surd::ZERO, 1);
        assert_eq!(p.coefficients(), (Surd::ONE, -Surd::ONE, Surd::ONE));
        assert_eq!(p.equation().markup(), "sin(2 x) - (sin(x) + cos(x)) + 1 = 0");
        assert_eq!(p.solve().families().len(), 3);
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup == "(t^2 - 1) - t + 1 = 0"));
    }

    #[test]
    fn test_difference_double_root() {
        let p = Symmetric::new(Sign::Minus, Surd::sqrt(2), Surd::sqrt(2), 1);
        assert_eq!(p.solve().markup(), "{frac(3 pi, 4) + 2 pi n | n in ZZ}");
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..300 {
            if let Ok(p) = Symmetric::sample(&mut rng) {
                let equation = p.equation().markup();
                assert!(
                    equation.contains("sin(x) + cos(x)") || equation.contains("sin(x) - cos(x)"),
                    "{}",
                    equation
                );
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
            }
        }
    }

    #[test]
    fn test_opposite_roots_rejected() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            if let Ok(p) = Symmetric::sample(&mut rng) {
                assert!(!(p.t1 + p.t2).is_zero());
                assert!(!p.coefficients().1.is_zero());
            }
        }
    }

    #[test]
    fn test_root_beyond_sqrt_two_discarded() {
        let p = Symmetric::new(Sign::Plus, Surd::int(2), Surd::ONE, 1);
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance
            .steps()
            .iter()
            .any(|s| s.markup.contains("abs(2) > sqrt(2)")));
        // only t = 1 survives: sin(x + π/4) = √2/2
        assert_eq!(p.solve().families().len(), 2);
    }

    #[test]
    fn test_both_roots_beyond_sqrt_two() {
        let p = Symmetric::new(Sign::Plus, Surd::int(2), Surd::int(3), 1);
        assert!(p.solve().is_empty());
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        let steps = instance.steps();
        let n = steps.len();
        assert_eq!(steps[n - 2].markup, "Answer: the equation has no real solutions.");
        assert_eq!(steps[n - 1].kind, crate::instance::StepKind::Math);
        assert_eq!(steps[n - 1].markup, "emptyset");
    }

    #[test]
    fn test_sampling_reaches_discarded_roots() {
        let mut rng = StdRng::seed_from_u64(21);
        let bound = Surd::sqrt(2);
        let reached = (0..500)
            .filter_map(|_| Symmetric::sample(&mut rng).ok())
            .any(|p| Real::Exact(p.t1).exceeds(&bound) || Real::Exact(p.t2).exceeds(&bound));
        assert!(reached);
    }
}
