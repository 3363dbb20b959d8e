//! Category 5: sums of squares lowered with the power-reduction formulas.
//!
//! Two shapes are generated, both for `f ∈ {sin, cos}`:
//!
//! - three squares `f²((m+k)x) + f²(|m-k|x) + f²(mx) = 3/2`, which reduce to
//!   `cos(2mx)·(2cos(2kx) + 1) = 0`;
//! - four squares `f²((m+k)x/2) + f²((m-k)x/2) - f²((n+k)x/2) - f²((n-k)x/2) = 0`,
//!   which reduce to `2cos(kx)·(cos(mx) - cos(nx)) = 0`.
//!
//! The sign inside the power-reduction formula cancels in both shapes, so
//! sine and cosine lead to the same cosine equation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algebra::{Arg, Equation, Expr, Rational, Real, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_cases, narrate_zero_product, solve_all, BasicEquation};
use super::identities::{sum_to_product, sum_to_product_template, ProductForm, Sign, POWER_REDUCTION};
use super::registry::Category;
use super::sum_to_product::{factor_equations, signed_pair};
use super::{inline, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    ThreeSquares { k: i64, m: i64 },
    FourSquares { k: i64, m: i64, n: i64 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::ThreeSquares { .. } => "three squares",
            Shape::FourSquares { .. } => "four squares",
        }
    }

    /// Signed arguments of the squares before shuffling
    fn canonical_terms(&self) -> Vec<(Sign, Rational)> {
        match *self {
            Shape::ThreeSquares { k, m } => vec![
                (Sign::Plus, Rational::int(m + k)),
                (Sign::Plus, Rational::int((m - k).abs())),
                (Sign::Plus, Rational::int(m)),
            ],
            Shape::FourSquares { k, m, n } => vec![
                (Sign::Plus, Rational::new(m + k, 2)),
                (Sign::Plus, Rational::new(m - k, 2)),
                (Sign::Minus, Rational::new(n + k, 2)),
                (Sign::Minus, Rational::new(n - k, 2)),
            ],
        }
    }

    fn rhs(&self) -> Surd {
        match self {
            Shape::ThreeSquares { .. } => Surd::frac(3, 2),
            Shape::FourSquares { .. } => Surd::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerReduction {
    pub func: TrigFn,
    pub shape: Shape,
    /// Signed arguments of the squares in display order
    pub terms: Vec<(Sign, Rational)>,
}

impl PowerReduction {
    pub fn new(func: TrigFn, shape: Shape) -> Self {
        PowerReduction {
            func,
            terms: shape.canonical_terms(),
            shape,
        }
    }

    fn square(&self, k: Rational) -> Expr {
        Expr::func_pow(self.func, Arg::scaled(k), 2)
    }

    fn squares(&self, terms: &[(Sign, Rational)]) -> Expr {
        Expr::sum(
            terms
                .iter()
                .map(|(sign, k)| Expr::scaled(sign.factor().into(), self.square(*k)))
                .collect(),
        )
    }

    /// `frac(1 ∓ cos(2 k x), 2)` for every square, joined with the term signs
    fn lowered(&self, terms: &[(Sign, Rational)]) -> String {
        let inner = match self.func {
            TrigFn::Sin => "-",
            _ => "+",
        };
        let mut out = String::new();
        for (i, (sign, k)) in terms.iter().enumerate() {
            let piece = format!(
                "frac(1 {} {}, 2)",
                inner,
                Expr::func(TrigFn::Cos, Arg::scaled(*k * Rational::int(2))).markup()
            );
            match (i, sign) {
                (0, Sign::Plus) => out.push_str(&piece),
                (0, Sign::Minus) => out.push_str(&format!("-{}", piece)),
                (_, s) => out.push_str(&format!(" {} {}", s.markup(), piece)),
            }
        }
        out
    }

    /// `cos(2 a x) + ...` over the given arguments
    fn doubled(args: &[Rational]) -> Expr {
        Expr::sum(
            args.iter()
                .map(|k| Expr::func(TrigFn::Cos, Arg::scaled(*k * Rational::int(2))))
                .collect(),
        )
    }

    /// `cos(mx) - cos(nx)` as a product
    fn remainder(&self) -> Option<ProductForm> {
        match self.shape {
            Shape::FourSquares { m, n, .. } => sum_to_product(TrigFn::Cos, Sign::Minus, Rational::int(m), Rational::int(n)),
            Shape::ThreeSquares { .. } => None,
        }
    }

    fn equations(&self) -> Vec<BasicEquation> {
        match self.shape {
            Shape::ThreeSquares { k, m } => vec![
                BasicEquation::zero(TrigFn::Cos, Arg::times(2 * m)),
                BasicEquation::new(TrigFn::Cos, Arg::times(2 * k), Real::Exact(Surd::frac(-1, 2))),
            ],
            Shape::FourSquares { k, .. } => {
                let mut equations = vec![BasicEquation::zero(TrigFn::Cos, Arg::times(k))];
                if let Some(remainder) = self.remainder() {
                    equations.extend(factor_equations(&remainder));
                }
                equations
            }
        }
    }

    fn narrate_three(&self, out: &mut Narration, k: i64, m: i64) {
        let canonical = self.shape.canonical_terms();
        out.math(format!("{} = frac(3, 2)", self.lowered(&self.terms)));
        out.text("Multiply both sides by 2 and cancel the constants:");
        let args: Vec<Rational> = canonical.iter().map(|(_, a)| *a).collect();
        out.math(format!("{} = 0", Self::doubled(&args).markup()));

        let pair = sum_to_product(
            TrigFn::Cos,
            Sign::Plus,
            args[0] * Rational::int(2),
            args[1] * Rational::int(2),
        );
        out.text("Turn the first two cosines into a product with");
        out.math(sum_to_product_template(TrigFn::Cos, Sign::Plus));
        let common = Expr::func(TrigFn::Cos, Arg::times(2 * m));
        if let Some(pair) = pair {
            out.math(format!(
                "{} = 0",
                Expr::sum(vec![pair.expr(), common.clone()]).markup()
            ));
        }
        let bracket = Expr::sum(vec![
            Expr::scaled(Surd::int(2), Expr::func(TrigFn::Cos, Arg::times(2 * k))),
            Expr::int(1),
        ]);
        out.text(format!("Take out the common factor {}:", inline(common.markup())));
        out.math(format!(
            "{} = 0",
            Expr::product(vec![common.clone(), bracket.clone()]).markup()
        ));
        let cases = [
            format!("{} = 0", common.markup()),
            format!("{} = 0", bracket.markup()),
        ];
        narrate_cases(out, &cases, &self.equations());
    }

    fn narrate_four(&self, out: &mut Narration, k: i64, m: i64, n: i64) {
        let canonical = self.shape.canonical_terms();
        let (plus, minus) = canonical.split_at(2);
        let positive = |terms: &[(Sign, Rational)]| -> Vec<(Sign, Rational)> {
            terms.iter().map(|(_, a)| (Sign::Plus, *a)).collect()
        };
        out.text("Move the subtracted squares to the right-hand side:");
        out.math(format!(
            "{} = {}",
            self.squares(plus).markup(),
            self.squares(&positive(minus)).markup()
        ));
        out.text("Lower every square:");
        out.math(format!(
            "{} = {}",
            self.lowered(plus),
            self.lowered(&positive(minus))
        ));
        out.text("Multiply both sides by 2 and cancel the constants:");
        let args = |terms: &[(Sign, Rational)]| -> Vec<Rational> { terms.iter().map(|(_, a)| *a).collect() };
        out.math(format!(
            "{} = {}",
            Self::doubled(&args(plus)).markup(),
            Self::doubled(&args(minus)).markup()
        ));

        let side = |center: i64| sum_to_product(TrigFn::Cos, Sign::Plus, Rational::int(center + k), Rational::int(center - k));
        let (Some(left), Some(right)) = (side(m), side(n)) else {
            return;
        };
        out.text("Apply");
        out.math(sum_to_product_template(TrigFn::Cos, Sign::Plus));
        out.text("to both sides:");
        out.math(format!("{} = {}", left.markup(), right.markup()));

        let common = Expr::func(TrigFn::Cos, Arg::times(k));
        out.text(format!(
            "Move everything to the left and take out {}:",
            inline(format!("2 {}", common.markup()))
        ));
        let bracket = signed_pair(TrigFn::Cos, Sign::Minus, Rational::int(m), Rational::int(n));
        out.math(format!(
            "{} = 0",
            Expr::scaled(Surd::int(2), Expr::product(vec![common.clone(), bracket])).markup()
        ));

        let Some(remainder) = self.remainder() else {
            return;
        };
        out.text("Transform the bracket with");
        out.math(sum_to_product_template(TrigFn::Cos, Sign::Minus));
        let mut factors = vec![common];
        factors.extend(remainder.factors.iter().map(|(g, a)| Expr::func(*g, *a)));
        let product = Expr::scaled(Surd::int(2 * remainder.coef), Expr::product(factors));
        narrate_zero_product(out, &product.markup(), &self.equations());
    }
}

impl Problem for PowerReduction {
    const CATEGORY: Category = Category::PowerReduction;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
        let shape = if rng.gen_bool(0.5) {
            let k = rng.gen_range(1..=3);
            let m = rng.gen_range(2..=5);
            ensure(k != m, "equal k and m")?;
            ensure((k + m) % 2 == 1, "k and m of equal parity")?;
            Shape::ThreeSquares { k, m }
        } else {
            let k = pick(rng, &[1, 2, 3]);
            let pool: Vec<i64> = (2..=9).filter(|x| *x > k).collect();
            let chosen: Vec<i64> = pool.choose_multiple(rng, 2).copied().collect();
            ensure(chosen.len() == 2, "not enough centers above k")?;
            let (m, n) = (chosen[0], chosen[1]);
            let left = [m + k, m - k];
            ensure(
                !left.contains(&(n + k)) && !left.contains(&(n - k)),
                "the two sides share a square",
            )?;
            Shape::FourSquares { k, m, n }
        };
        let mut problem = PowerReduction::new(func, shape);
        let mut args: Vec<Rational> = problem.terms.iter().map(|(_, a)| *a).collect();
        args.sort();
        args.dedup();
        ensure(args.len() == problem.terms.len(), "repeated argument")?;
        problem.terms.shuffle(rng);
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        let params = Parameters::new()
            .with("f", self.func)
            .with("shape", self.shape.name());
        match self.shape {
            Shape::ThreeSquares { k, m } => params.with("k", k).with("m", m),
            Shape::FourSquares { k, m, n } => params.with("k", k).with("m", m).with("n", n),
        }
    }

    fn equation(&self) -> Equation {
        Equation::new(self.squares(&self.terms), Expr::num(self.shape.rhs()))
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text("Lower the powers with the power-reduction formula");
        if let Some(template) = POWER_REDUCTION.get(&self.func) {
            out.math(*template);
        }
        match self.shape {
            Shape::ThreeSquares { k, m } => self.narrate_three(out, k, m),
            Shape::FourSquares { k, m, n } => self.narrate_four(out, k, m, n),
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
    fn test_three_squares() {
        let p = PowerReduction::new(TrigFn::Sin, Shape::ThreeSquares { k: 1, m: 2 });
        assert_eq!(
            p.equation().markup(),
            "sin^2 (3 x) + sin^2 (x) + sin^2 (2 x) = frac(3, 2)"
        );
        let solution = p.solve();
        assert!(solution.markup().contains("frac(pi, 8) + frac(pi n, 4)"));
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup == "cos(4 x) (2 cos(2 x) + 1) = 0"));
    }

    #[test]
    fn test_three_squares_with_k_above_m() {
        let p = PowerReduction::new(TrigFn::Cos, Shape::ThreeSquares { k: 3, m: 2 });
        assert_eq!(
            p.equation().markup(),
            "cos^2 (5 x) + cos^2 (x) + cos^2 (2 x) = frac(3, 2)"
        );
        assert!(EquationInstance::from_problem(&p, 1).is_ok());
    }

    #[test]
    fn test_four_squares() {
        let p = PowerReduction::new(TrigFn::Cos, Shape::FourSquares { k: 1, m: 4, n: 7 });
        assert_eq!(
            p.equation().markup(),
            "cos^2 (frac(5 x, 2)) + cos^2 (frac(3 x, 2)) - cos^2 (4 x) - cos^2 (3 x) = 0"
        );
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance
            .steps()
            .iter()
            .any(|s| s.markup == "2 cos(x) (cos(4 x) - cos(7 x)) = 0"));
    }

    #[test]
    fn test_sampled_instances_verify() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut accepted = 0;
        for _ in 0..300 {
            if let Ok(p) = PowerReduction::sample(&mut rng) {
                assert!(EquationInstance::from_problem(&p, 1).is_ok());
                accepted += 1;
            }
        }
        assert!(accepted > 50);
    }
}
