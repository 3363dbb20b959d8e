//! Category 8: `a sin x + b cos x = c` by the auxiliary angle.
//!
//! The coefficients come from a tabulated angle `φ` and an amplitude `D`:
//! `a = D cos φ`, `b = D sin φ`, `c = D·S`. Dividing by `D` and folding the
//! left side with the addition formula leaves a simplest equation in
//! `x ± φ`. Because `|S| <= 1` the equation is always solvable, but the
//! check `|c| <= D` is still narrated.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algebra::{Angle, Arg, Equation, Expr, Rational, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{Narration, Parameters, Problem, Rejection};

use super::formulas::BasicEquation;
use super::registry::Category;
use super::{inline, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    /// `a sin x + b cos x = c`, folded into `sin(x + φ)`
    SinSum,
    /// `a cos x + b sin x = c`, folded into `cos(x - φ)`
    CosDiff,
}

impl Form {
    pub fn name(&self) -> &'static str {
        match self {
            Form::SinSum => "sin_sum",
            Form::CosDiff => "cos_diff",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearCombination {
    pub form: Form,
    pub phi: Angle,
    pub amplitude: Surd,
    pub target: Surd,
}

impl LinearCombination {
    pub fn new(form: Form, phi: Angle, amplitude: Surd, target: Surd) -> Self {
        LinearCombination {
            form,
            phi,
            amplitude,
            target,
        }
    }

    fn cos_phi(&self) -> Surd {
        self.phi.cos_exact().unwrap_or(Surd::ZERO)
    }

    fn sin_phi(&self) -> Surd {
        self.phi.sin_exact().unwrap_or(Surd::ZERO)
    }

    /// `(a, b, c)` as displayed
    pub fn coefficients(&self) -> (Surd, Surd, Surd) {
        (
            self.amplitude * self.cos_phi(),
            self.amplitude * self.sin_phi(),
            self.amplitude * self.target,
        )
    }

    /// Functions multiplied by `a` and `b`
    fn functions(&self) -> (TrigFn, TrigFn) {
        match self.form {
            Form::SinSum => (TrigFn::Sin, TrigFn::Cos),
            Form::CosDiff => (TrigFn::Cos, TrigFn::Sin),
        }
    }

    fn combination(&self, a: Surd, b: Surd) -> Expr {
        let (f, g) = self.functions();
        Expr::sum(vec![
            Expr::scaled(a, Expr::func(f, Arg::x())),
            Expr::scaled(b, Expr::func(g, Arg::x())),
        ])
    }

    fn basic(&self) -> BasicEquation {
        let value = Real::Exact(self.target);
        match self.form {
            Form::SinSum => BasicEquation::new(TrigFn::Sin, Arg::new(Rational::ONE, self.phi), value),
            Form::CosDiff => BasicEquation::new(TrigFn::Cos, Arg::new(Rational::ONE, -self.phi), value),
        }
    }
}

impl Problem for LinearCombination {
    const CATEGORY: Category = Category::LinearCombination;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let phi = pick(rng, &[Angle::pi_frac(1, 6), Angle::pi_frac(1, 4), Angle::pi_frac(1, 3)]);
        let amplitude = pick(rng, &[Surd::int(2), Surd::sqrt(2)]);
        let half = Surd::frac(1, 2);
        let target = pick(
            rng,
            &[
                Surd::ZERO,
                Surd::ONE,
                -Surd::ONE,
                half,
                -half,
                Surd::sqrt(2) * half,
                -(Surd::sqrt(2) * half),
            ],
        );
        let form = pick(rng, &[Form::SinSum, Form::CosDiff]);
        Ok(LinearCombination::new(form, phi, amplitude, target))
    }

    fn parameters(&self) -> Parameters {
        let (a, b, c) = self.coefficients();
        Parameters::new()
            .with("form", self.form.name())
            .with("a", a)
            .with("b", b)
            .with("c", c)
            .with("D", self.amplitude)
            .with("phi", self.phi)
            .with("S", self.target)
    }

    fn equation(&self) -> Equation {
        let (a, b, c) = self.coefficients();
        Equation::new(self.combination(a, b), Expr::num(c))
    }

    fn solve(&self) -> SolutionSet {
        self.basic().solve()
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        let (a, b, c) = self.coefficients();
        let d = self.amplitude;
        let (f, g) = self.functions();
        out.text(format!(
            "Solve {}. It has the form {}.",
            inline(self.equation().markup()),
            inline(format!("a {}(x) + b {}(x) = c", f.markup(), g.markup()))
        ));
        out.text(format!("Compute the amplitude {}:", inline("D = sqrt(a^2 + b^2)")));
        out.math(format!(
            "D = sqrt({} + {}) = {}",
            a.pow(2).markup(),
            b.pow(2).markup(),
            d.markup()
        ));
        out.text(format!(
            "Since {}, the equation has solutions. Divide both sides by {}:",
            inline(format!("abs(c) = {} <= {}", c.abs().markup(), d.markup())),
            inline(d.markup())
        ));
        let (cos_phi, sin_phi) = (self.cos_phi(), self.sin_phi());
        out.math(format!(
            "{} = {}",
            self.combination(cos_phi, sin_phi).markup(),
            self.target.markup()
        ));
        out.text("Introduce the auxiliary angle $phi$ with");
        out.math(format!(
            "cos phi = {}, quad sin phi = {} quad ==> quad phi = {}",
            cos_phi.markup(),
            sin_phi.markup(),
            self.phi.markup()
        ));
        let phi = self.phi.markup();
        let basic = self.basic();
        match self.form {
            Form::SinSum => {
                out.math(format!(
                    "cos({phi}) sin(x) + sin({phi}) cos(x) = {}",
                    self.target.markup()
                ));
                out.text(format!(
                    "By the addition formula {}:",
                    inline("sin(x + phi) = sin x cos phi + cos x sin phi")
                ));
            }
            Form::CosDiff => {
                out.math(format!(
                    "cos({phi}) cos(x) + sin({phi}) sin(x) = {}",
                    self.target.markup()
                ));
                out.text(format!(
                    "By the subtraction formula {}:",
                    inline("cos(x - phi) = cos x cos phi + sin x sin phi")
                ));
            }
        }
        out.math(basic.markup());
        basic.narrate(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;

    #[test]
    fn test_auxiliary_angle_scenario() {
        let p = LinearCombination::new(Form::SinSum, Angle::pi_frac(1, 6), Surd::int(2), Surd::frac(1, 2));
        assert_eq!(p.equation().markup(), "sqrt(3) sin(x) + cos(x) = 1");
        assert_eq!(p.basic().markup(), "sin(x + frac(pi, 6)) = frac(1, 2)");
        assert_eq!(p.solve().families().len(), 2);
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup == "D = sqrt(3 + 1) = 2"));
    }

    #[test]
    fn test_cosine_difference_form() {
        let p = LinearCombination::new(Form::CosDiff, Angle::pi_frac(1, 4), Surd::sqrt(2), Surd::ONE);
        assert_eq!(p.equation().markup(), "cos(x) + sin(x) = sqrt(2)");
        assert_eq!(p.basic().markup(), "cos(x - frac(pi, 4)) = 1");
        assert_eq!(p.solve().markup(), "{frac(pi, 4) + 2 pi n | n in ZZ}");
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_every_table_entry_verifies() {
        for form in [Form::SinSum, Form::CosDiff] {
            for phi in [Angle::pi_frac(1, 6), Angle::pi_frac(1, 4), Angle::pi_frac(1, 3)] {
                for d in [Surd::int(2), Surd::sqrt(2)] {
                    for s in [Surd::ZERO, Surd::frac(-1, 2), Surd::ONE] {
                        let p = LinearCombination::new(form, phi, d, s);
                        assert!(EquationInstance::from_problem(&p, 1).is_ok());
                    }
                }
            }
        }
    }
}
