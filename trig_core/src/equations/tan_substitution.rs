//! Category 11: `A f(2x) + B tan x = C` with `f ∈ {sin, cos}`.
//!
//! Writing the double angle through `t = tan x` and clearing `1 + t²` gives
//! a cubic in `t`:
//!
//! - sine: `B t³ - C t² + (2A + B) t - C = 0`
//! - cosine: `B t³ - (A + C) t² + B t + (A - C) = 0`
//!
//! `C` is chosen so that a tabulated `t1` is a root. The cubic is reduced to
//! a quadratic either by the factor `t` (zero constant term) or by synthetic
//! division by `t - t1`.

use rand::Rng;

use crate::algebra::{Arg, Equation, Expr, Polynomial, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_all, narrate_quadratic, solve_all, sorted_roots};
use super::homogeneous::tangent_equations;
use super::registry::Category;
use super::{inline, pick};

const COEFFICIENTS: [i64; 6] = [1, -1, 2, -2, 3, -3];

/// The cubic after one root has been split off
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// Root split off: `0` when the constant term vanishes, else `t1`
    pub root: Surd,
    /// Whether the split was by the factor `t`
    pub by_t: bool,
    pub quotient: Polynomial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TanSubstitution {
    pub func: TrigFn,
    pub t1: Surd,
    pub a: i64,
    pub b: i64,
}

impl TanSubstitution {
    pub fn new(func: TrigFn, t1: Surd, a: i64, b: i64) -> Self {
        TanSubstitution { func, t1, a, b }
    }

    /// `f(2x)` at `tan x = t`
    fn double_angle_at(&self, t: Surd) -> Surd {
        let denominator = Surd::ONE + t * t;
        let numerator = match self.func {
            TrigFn::Sin => Surd::int(2) * t,
            _ => Surd::ONE - t * t,
        };
        numerator.checked_div(&denominator).unwrap_or(Surd::ZERO)
    }

    /// Right-hand side that makes `t1` a root
    pub fn rhs(&self) -> Surd {
        Surd::int(self.a) * self.double_angle_at(self.t1) + Surd::int(self.b) * self.t1
    }

    pub fn cubic(&self) -> Polynomial {
        let (a, b, c) = (Surd::int(self.a), Surd::int(self.b), self.rhs());
        match self.func {
            TrigFn::Sin => Polynomial::from_descending(&[b, -c, Surd::int(2) * a + b, -c]),
            _ => Polynomial::from_descending(&[b, -a - c, b, a - c]),
        }
    }

    pub fn reduction(&self) -> Reduction {
        let cubic = self.cubic();
        match cubic.divide_by_t() {
            Some(quotient) => Reduction {
                root: Surd::ZERO,
                by_t: true,
                quotient,
            },
            None => Reduction {
                root: self.t1,
                by_t: false,
                quotient: cubic.div_linear(&self.t1).0,
            },
        }
    }

    /// Real roots of the cubic; `None` when the quadratic factor has roots
    /// outside the supported radicals
    pub fn t_roots(&self) -> Option<Vec<Real>> {
        let reduction = self.reduction();
        let d = reduction.quotient.discriminant();
        let representable = d.is_negative() || d.is_zero() || d.sqrt_exact().is_some() || d.is_rational();
        if !representable {
            return None;
        }
        let mut roots = reduction.quotient.real_roots();
        roots.push(Real::Exact(reduction.root));
        Some(sorted_roots(roots))
    }

    fn roots(&self) -> Vec<Real> {
        self.t_roots().unwrap_or_default()
    }

    /// `A frac(2 t, 1 + t^2) + B t = C` and its cosine counterpart
    fn substituted_markup(&self) -> String {
        let fraction = match self.func {
            TrigFn::Sin => "frac(2 t, 1 + t^2)",
            _ => "frac(1 - t^2, 1 + t^2)",
        };
        let head = match self.a {
            1 => fraction.to_string(),
            -1 => format!("-{}", fraction),
            a => format!("{} {}", a, fraction),
        };
        let tail = Polynomial::from_descending(&[Surd::int(self.b), Surd::ZERO]).markup("t");
        let lhs = match tail.strip_prefix('-') {
            Some(rest) => format!("{} - {}", head, rest),
            None => format!("{} + {}", head, tail),
        };
        format!("{} = {}", lhs, self.rhs().markup())
    }
}

impl Problem for TanSubstitution {
    const CATEGORY: Category = Category::TanSubstitution;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
        let third = Surd::sqrt(3) * Surd::frac(1, 3);
        let t1 = pick(
            rng,
            &[Surd::ZERO, Surd::ONE, -Surd::ONE, Surd::sqrt(3), -Surd::sqrt(3), third, -third],
        );
        let a = pick(rng, &COEFFICIENTS);
        let b = pick(rng, &COEFFICIENTS);
        let problem = TanSubstitution::new(func, t1, a, b);
        ensure(problem.t_roots().is_some(), "remaining quadratic not solvable in radicals of rationals")?;
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("f", self.func)
            .with("t1", self.t1)
            .with("A", self.a)
            .with("B", self.b)
            .with("C", self.rhs())
    }

    fn equation(&self) -> Equation {
        Equation::new(
            Expr::sum(vec![
                Expr::scaled(Surd::int(self.a), Expr::func(self.func, Arg::times(2))),
                Expr::scaled(Surd::int(self.b), Expr::func(TrigFn::Tan, Arg::x())),
            ]),
            Expr::num(self.rhs()),
        )
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&tangent_equations(&self.roots()))
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let f2x = Expr::func(self.func, Arg::times(2)).markup();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text(format!(
            "The equation contains {} and {}. Express {} through the tangent:",
            inline(&f2x),
            inline("tan(x)"),
            inline(&f2x)
        ));
        out.math(match self.func {
            TrigFn::Sin => "sin(2 x) = frac(2 tan(x), 1 + tan^2 (x))",
            _ => "cos(2 x) = frac(1 - tan^2 (x), 1 + tan^2 (x))",
        });
        out.text(format!("Let {} and substitute:", inline("t = tan(x)")));
        out.math(self.substituted_markup());
        out.text(format!(
            "Multiply both sides by {}, which is never zero, and collect all terms on the left:",
            inline("1 + t^2")
        ));
        let cubic = self.cubic();
        out.math(format!("{} = 0", cubic.markup("t")));

        let reduction = self.reduction();
        let quotient = reduction.quotient.markup("t");
        if reduction.by_t {
            out.text(format!("The constant term is zero, so take out the factor {}:", inline("t")));
            out.math(format!("t ({}) = 0", quotient));
            out.text(format!("This gives the root {}.", inline("t = 0")));
        } else {
            let root = reduction.root.markup();
            out.text(format!("Check the value {}:", inline(format!("t = {}", root))));
            out.math(format!("P({}) = {}", root, cubic.eval(&reduction.root).markup()));
            let divisor = Polynomial::from_descending(&[Surd::ONE, -reduction.root]).markup("t");
            out.text(format!(
                "Divide the polynomial by {} to get a quadratic:",
                inline(format!("({})", divisor))
            ));
        }
        narrate_quadratic(out, &reduction.quotient, "t", &reduction.quotient.real_roots());
        out.text("Returning to the substitution:");
        narrate_all(out, &tangent_equations(&self.roots()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sine_cubic_with_complex_pair() {
        let p = TanSubstitution::new(TrigFn::Sin, Surd::ONE, 1, 1);
        assert_eq!(p.rhs(), Surd::int(2));
        assert_eq!(p.equation().markup(), "sin(2 x) + tan(x) = 2");
        assert_eq!(p.cubic().markup("t"), "t^3 - 2 t^2 + 3 t - 2");
        assert_eq!(p.reduction().quotient.markup("t"), "t^2 - t + 2");
        assert_eq!(p.solve().markup(), "{frac(pi, 4) + pi n | n in ZZ}");
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_cosine_zero_constant_term() {
        let p = TanSubstitution::new(TrigFn::Cos, Surd::ZERO, 2, 1);
        assert_eq!(p.equation().markup(), "2 cos(2 x) + tan(x) = 2");
        let reduction = p.reduction();
        assert!(reduction.by_t);
        assert_eq!(reduction.quotient.markup("t"), "t^2 - 4 t + 1");
        assert_eq!(p.t_roots().map(|r| r.len()), Some(3));
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..300 {
            if let Ok(p) = TanSubstitution::sample(&mut rng) {
                let roots = p.t_roots().unwrap();
                for t in &roots {
                    assert!(p.cubic().eval_f64(t.to_f64()).abs() < 1e-9);
                }
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
            }
        }
    }
}
