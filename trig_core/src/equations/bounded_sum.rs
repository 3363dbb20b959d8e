//! Category 13: `±f1(k1 x) ± f2(k2 x) [± f3(k3 x)] = N` with `N` terms.
//!
//! Each term is at most 1, so the sum reaches `N` only when every term
//! equals 1 at once. The terms are built around a common extremal point
//! `x0 ∈ {0, π/2, π, 3π/2}`: each sign is `f(k x0)`. The single equation
//! `±f(kx) = 1` has one solution per period `2π/k`, so the system holds
//! exactly on `x0 + 2π n / g` where `g = gcd(k1, k2, ...)`.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algebra::rational::gcd;
use crate::algebra::{Angle, Arg, Equation, Expr, Family, Phase, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::BasicEquation;
use super::registry::Category;
use super::{inline, pick};

const TERM_TRIES: usize = 50;

/// One summand `sign · f(k x)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub func: TrigFn,
    pub k: i64,
    pub sign: i64,
}

impl Term {
    pub fn new(func: TrigFn, k: i64, sign: i64) -> Self {
        Term { func, k, sign }
    }

    fn expr(&self) -> Expr {
        Expr::scaled(Surd::int(self.sign), Expr::func(self.func, Arg::times(self.k)))
    }

    /// `f(k x) = sign`, equivalent to the term reaching 1
    fn extremal(&self) -> BasicEquation {
        BasicEquation::new(self.func, Arg::times(self.k), Real::int(self.sign))
    }

    /// Try a random term whose value at `x0` is `±1`
    fn sample_at<R: Rng + ?Sized>(rng: &mut R, x0: Angle) -> Option<Term> {
        for _ in 0..TERM_TRIES {
            let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
            let k = pick(rng, &[1, 1, 2, 3, 4, 5, 6]);
            let value = func.exact(&x0.scale(k.into()))?;
            if let Some(sign) = value.as_integer().filter(|v| v.abs() == 1) {
                return Some(Term::new(func, k, sign));
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundedSum {
    pub x0: Angle,
    pub terms: Vec<Term>,
}

impl BoundedSum {
    pub fn new(x0: Angle, terms: Vec<Term>) -> Self {
        BoundedSum { x0, terms }
    }

    fn count(&self) -> i64 {
        self.terms.len() as i64
    }

    /// `gcd` of all frequencies
    fn common_divisor(&self) -> i64 {
        self.terms.iter().fold(0, |g, t| gcd(g, t.k)).max(1)
    }

    fn family(&self) -> Family {
        Family::new(Phase::angle(self.x0), Angle::pi_frac(2, self.common_divisor()))
    }
}

impl Problem for BoundedSum {
    const CATEGORY: Category = Category::BoundedSum;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let count = pick(rng, &[2, 2, 3]);
        let x0 = pick(
            rng,
            &[Angle::ZERO, Angle::PI, Angle::pi_frac(1, 2), Angle::pi_frac(3, 2)],
        );
        let mut terms = Vec::with_capacity(count);
        for _ in 0..count {
            terms.push(Term::sample_at(rng, x0).ok_or(Rejection("no extremal term found"))?);
        }
        let distinct: HashSet<(TrigFn, i64)> = terms.iter().map(|t| (t.func, t.k)).collect();
        ensure(distinct.len() == terms.len(), "repeated term")?;
        Ok(BoundedSum::new(x0, terms))
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new().with("x0", self.x0).with("N", self.count());
        for (i, term) in self.terms.iter().enumerate() {
            params = params
                .with(&format!("f{}", i + 1), term.func)
                .with(&format!("k{}", i + 1), term.k)
                .with(&format!("s{}", i + 1), term.sign);
        }
        params
    }

    fn equation(&self) -> Equation {
        Equation::new(
            Expr::sum(self.terms.iter().map(Term::expr).collect()),
            Expr::int(self.count()),
        )
    }

    fn solve(&self) -> SolutionSet {
        SolutionSet::from_families(vec![self.family()])
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text(format!(
            "Estimate the left-hand side. Sine and cosine take values in {}, so every term is at most 1:",
            inline("[-1, 1]")
        ));
        let bounds: Vec<String> = self
            .terms
            .iter()
            .map(|t| format!("{} <= 1", t.expr().markup()))
            .collect();
        out.math(bounds.join(", quad "));
        let ones = vec!["1"; self.terms.len()];
        out.text(format!(
            "Hence the sum is at most {}. Equality holds only when every term equals 1 at the same time, so the equation is equivalent to the system",
            inline(format!("{} = {}", ones.join(" + "), self.count()))
        ));
        let system: Vec<String> = self
            .terms
            .iter()
            .map(|t| format!("{} = 1", t.expr().markup()))
            .collect();
        out.math(format!("cases({})", system.join(", ")));

        let first = self.terms[0].extremal();
        out.text("Solve the first equation of the system:");
        out.math(first.markup());
        first.narrate(out);

        let g = self.common_divisor();
        let family = self.family();
        let periods: Vec<String> = self
            .terms
            .iter()
            .map(|t| Angle::pi_frac(2, t.k).markup())
            .collect();
        out.text(format!(
            "Each equation of the system has exactly one solution per period {}. The common solutions repeat with the least common multiple of these periods, {}.",
            inline(periods.join(", ")),
            inline(format!("frac(2 pi, {}) = {}", g, Angle::pi_frac(2, g).markup()))
        ));
        out.text(format!(
            "Check the remaining equations on the series {}:",
            inline(format!("x = {}", family.markup()))
        ));
        let step = Angle::pi_frac(2, g);
        for term in &self.terms[1..] {
            let at_x0 = self.x0.scale(term.k.into());
            let shift = step.scale(term.k.into());
            let value = term.func.exact(&at_x0).unwrap_or(Surd::ZERO);
            let sign = if term.sign < 0 { "-" } else { "" };
            out.math(format!(
                "{sign}{f}({arg} + {shift}) = {sign}{f}({arg}) = {result}",
                f = term.func.markup(),
                arg = at_x0.markup(),
                shift = shift.markup_times("n"),
                result = (Surd::int(term.sign) * value).markup()
            ));
        }
        out.text("All equations of the system hold.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_common_period_shrinks_with_gcd() {
        let p = BoundedSum::new(
            Angle::ZERO,
            vec![Term::new(TrigFn::Cos, 2, 1), Term::new(TrigFn::Cos, 4, 1)],
        );
        assert_eq!(p.equation().markup(), "cos(2 x) + cos(4 x) = 2");
        assert_eq!(p.solve().markup(), "{pi n | n in ZZ}");
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_mixed_signs_at_half_pi() {
        let p = BoundedSum::new(
            Angle::pi_frac(1, 2),
            vec![Term::new(TrigFn::Sin, 1, 1), Term::new(TrigFn::Cos, 2, -1)],
        );
        assert_eq!(p.equation().markup(), "sin(x) - cos(2 x) = 2");
        assert_eq!(p.solve().markup(), "{frac(pi, 2) + 2 pi n | n in ZZ}");
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance
            .steps()
            .iter()
            .any(|s| s.markup == "cases(sin(x) = 1, -cos(2 x) = 1)"));
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..300 {
            if let Ok(p) = BoundedSum::sample(&mut rng) {
                for term in &p.terms {
                    let value = term.func.exact(&p.x0.scale(term.k.into())).unwrap();
                    assert_eq!(Surd::int(term.sign), value);
                }
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
            }
        }
    }
}
