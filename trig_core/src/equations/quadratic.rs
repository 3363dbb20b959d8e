//! Category 6: quadratic equations in one trigonometric function.
//!
//! The kernel `A t² + B t + C` comes from two chosen roots (denominators and
//! radicals in the denominator cleared, random overall sign). On the
//! reducible path `f²` is replaced through the Pythagorean identity by
//! `1 - g²` with `g` the cofunction, so the displayed equation mixes `f` and
//! `g` and the first step is to undo that replacement.
//!
//! Sine and cosine roots may be traps outside `[-1, 1]`; those produce no
//! solutions and are explained as such.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algebra::{clearing_factor, Angle, Arg, Equation, Expr, Polynomial, Rational, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_all, narrate_quadratic, solve_all, sorted_roots, BasicEquation};
use super::registry::Category;
use super::{inline, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Path {
    /// `A f² + B f + C = 0` as is
    Direct,
    /// `-A g² + B f + (C + A) = 0` with `g` the cofunction of `f`
    Reducible,
}

impl Path {
    pub fn name(&self) -> &'static str {
        match self {
            Path::Direct => "direct",
            Path::Reducible => "reducible",
        }
    }
}

/// Tabulated sine and cosine values except zero
fn bounded_roots() -> Vec<Surd> {
    let half = Surd::frac(1, 2);
    let mut roots = Vec::new();
    for v in [Surd::ONE, half, Surd::sqrt(2) * half, Surd::sqrt(3) * half] {
        roots.push(v);
        roots.push(-v);
    }
    roots
}

/// Roots outside `[-1, 1]`
fn trap_roots() -> Vec<Surd> {
    vec![Surd::int(2), Surd::int(-2), Surd::int(3), Surd::frac(3, 2)]
}

/// Tabulated tangent and cotangent values except zero
fn unbounded_roots() -> Vec<Surd> {
    let third = Surd::sqrt(3) * Surd::frac(1, 3);
    vec![Surd::ONE, -Surd::ONE, Surd::sqrt(3), -Surd::sqrt(3), third, -third]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic {
    pub func: TrigFn,
    pub arg: Arg,
    pub path: Path,
    pub t1: Surd,
    pub t2: Surd,
    /// Overall sign of the kernel
    pub sign: i64,
}

impl Quadratic {
    pub fn new(func: TrigFn, arg: Arg, path: Path, t1: Surd, t2: Surd, sign: i64) -> Self {
        Quadratic {
            func,
            arg,
            path,
            t1,
            t2,
            sign,
        }
    }

    /// `(A, B, C)` of the quadratic in `f`
    pub fn kernel(&self) -> (Surd, Surd, Surd) {
        let raw = [Surd::ONE, -(self.t1 + self.t2), self.t1 * self.t2];
        let factor = Surd::rational(clearing_factor(&raw) * Rational::int(self.sign));
        (raw[0] * factor, raw[1] * factor, raw[2] * factor)
    }

    /// `(A', B', C')` of the displayed reducible equation `A' g² + B' f + C' = 0`
    pub fn reduced(&self) -> (Surd, Surd, Surd) {
        let (a, b, c) = self.kernel();
        (-a, b, c + a)
    }

    fn roots(&self) -> Vec<Real> {
        sorted_roots(vec![Real::Exact(self.t1), Real::Exact(self.t2)])
    }

    fn equations(&self) -> Vec<BasicEquation> {
        self.roots()
            .into_iter()
            .map(|t| BasicEquation::new(self.func, self.arg, t))
            .collect()
    }

    fn quadratic_expr(&self, a: Surd, b: Surd, c: Surd) -> Expr {
        Expr::sum(vec![
            Expr::scaled(a, Expr::func_pow(self.func, self.arg, 2)),
            Expr::scaled(b, Expr::func(self.func, self.arg)),
            Expr::num(c),
        ])
    }

    fn narrate_reduction(&self, out: &mut Narration) {
        let g = self.func.cofunction();
        let (a, b, c) = self.reduced();
        let arg = self.arg.markup();
        out.text("The equation contains two different functions. Reduce it to one with the identity");
        out.math(format!(
            "sin^2 ({arg}) + cos^2 ({arg}) = 1 ==> {g}^2 ({arg}) = 1 - {f}^2 ({arg})",
            g = g.markup(),
            f = self.func.markup()
        ));
        let replacement = Expr::sum(vec![
            Expr::int(1),
            Expr::neg(Expr::func_pow(self.func, self.arg, 2)),
        ]);
        out.text("Substitute it into the equation:");
        out.math(format!(
            "{} = 0",
            Expr::sum(vec![
                Expr::scaled(a, replacement),
                Expr::scaled(b, Expr::func(self.func, self.arg)),
                Expr::num(c),
            ])
            .markup()
        ));
        out.text("Expand the brackets:");
        out.math(format!(
            "{} = 0",
            Expr::sum(vec![
                Expr::num(a),
                Expr::scaled(-a, Expr::func_pow(self.func, self.arg, 2)),
                Expr::scaled(b, Expr::func(self.func, self.arg)),
                Expr::num(c),
            ])
            .markup()
        ));
        out.text(format!(
            "Collect like terms to get a quadratic in {}:",
            inline(Expr::func(self.func, self.arg).markup())
        ));
    }
}

impl Problem for Quadratic {
    const CATEGORY: Category = Category::Quadratic;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let path = pick(rng, &[Path::Direct, Path::Reducible]);
        let func = match path {
            Path::Direct => pick(rng, &TrigFn::ALL),
            Path::Reducible => pick(rng, &[TrigFn::Sin, TrigFn::Cos]),
        };
        let k = pick(rng, &[1, 1, 1, 2, 3]);
        let b = pick(
            rng,
            &[Angle::ZERO, Angle::ZERO, Angle::ZERO, Angle::pi_frac(1, 6), Angle::pi_frac(1, 4)],
        );

        let (t1, t2) = if func.is_bounded() {
            let nice = bounded_roots();
            let mut with_traps = nice.clone();
            with_traps.extend(trap_roots());
            let t1 = pick(rng, &nice);
            let t2 = pick(rng, &with_traps);
            (t1, t2)
        } else {
            let nice = unbounded_roots();
            (pick(rng, &nice), pick(rng, &nice))
        };
        ensure(!(t1 + t2).is_zero(), "opposite roots leave no linear term")?;
        ensure(!t1.is_zero() && !t2.is_zero(), "zero root leaves no constant term")?;

        let sign = pick(rng, &[1, -1]);
        let problem = Quadratic::new(func, Arg::new(Rational::int(k), b), path, t1, t2, sign);
        if path == Path::Reducible {
            let (_, _, c) = problem.reduced();
            ensure(!c.is_zero(), "reduction removes the constant term")?;
        }
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.kernel();
        Parameters::new()
            .with("f", self.func)
            .with("path", self.path.name())
            .with("k", self.arg.k.numer())
            .with("b", self.arg.b)
            .with("t1", self.t1)
            .with("t2", self.t2)
            .with("A", a)
            .with("B", b)
            .with("C", c)
    }

    fn equation(&self) -> Equation {
        let lhs = match self.path {
            Path::Direct => {
                let (a, b, c) = self.kernel();
                self.quadratic_expr(a, b, c)
            }
            Path::Reducible => {
                let (a, b, c) = self.reduced();
                Expr::sum(vec![
                    Expr::scaled(a, Expr::func_pow(self.func.cofunction(), self.arg, 2)),
                    Expr::scaled(b, Expr::func(self.func, self.arg)),
                    Expr::num(c),
                ])
            }
        };
        Equation::new(lhs, Expr::zero())
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (a, b, c) = self.kernel();
        let f_arg = Expr::func(self.func, self.arg).markup();
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        match self.path {
            Path::Reducible => self.narrate_reduction(out),
            Path::Direct => {
                out.text(format!("This is a quadratic equation in {}.", inline(&f_arg)));
            }
        }
        out.math(format!("{} = 0", self.quadratic_expr(a, b, c).markup()));
        out.text(format!("Substitute {}:", inline(format!("t = {}", f_arg))));
        let roots = self.roots();
        narrate_quadratic(out, &Polynomial::from_descending(&[a, b, c]), "t", &roots);
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
    fn test_direct_kernel_clears_denominators() {
        let p = Quadratic::new(TrigFn::Sin, Arg::x(), Path::Direct, Surd::frac(1, 2), Surd::ONE, 1);
        assert_eq!(p.kernel(), (Surd::int(2), Surd::int(-3), Surd::ONE));
        assert_eq!(p.equation().markup(), "2 sin^2 (x) - 3 sin(x) + 1 = 0");
        assert_eq!(p.solve().families().len(), 3);
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_reducible_with_trap_root() {
        let p = Quadratic::new(TrigFn::Sin, Arg::x(), Path::Reducible, Surd::frac(1, 2), Surd::int(2), 1);
        assert_eq!(p.equation().markup(), "-2 cos^2 (x) - 5 sin(x) + 4 = 0");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert_eq!(instance.solution().map(|s| s.families().len()), Some(2));
        assert!(instance.steps().iter().any(|s| s.markup.contains("has no solutions")));
    }

    #[test]
    fn test_negative_sign_flips_kernel() {
        let p = Quadratic::new(TrigFn::Tan, Arg::times(2), Path::Direct, Surd::ONE, Surd::sqrt(3), -1);
        let (a, _, _) = p.kernel();
        assert_eq!(a, Surd::int(-1));
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..300 {
            if let Ok(p) = Quadratic::sample(&mut rng) {
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
                if p.path == Path::Reducible {
                    assert!(!p.reduced().2.is_zero());
                }
            }
        }
    }

    #[test]
    fn test_both_roots_outside_range() {
        let p = Quadratic::new(TrigFn::Sin, Arg::x(), Path::Direct, Surd::int(2), Surd::int(3), 1);
        assert_eq!(p.equation().markup(), "sin^2 (x) - 5 sin(x) + 6 = 0");
        assert!(p.solve().is_empty());
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert_eq!(instance.solution_markup(), "emptyset");
        let steps = instance.steps();
        assert_eq!(steps.iter().filter(|s| s.markup.contains("has no solutions")).count(), 2);
        assert_eq!(steps[steps.len() - 2].markup, "Answer: the equation has no real solutions.");
    }
}
