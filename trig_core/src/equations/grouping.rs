//! Category 4: four terms of one function, solved by grouping.
//!
//! The arguments are `m ± k` and `n ± k`. Pairing `f((m+k)x)` with
//! `f((m-k)x)` gives a product with half-sum `m` and half-difference `k`;
//! the second pair has the same half-difference, so both products share the
//! factor in `kx`. What remains in brackets, `g(mx) ± g(nx)`, is turned into
//! a product once more.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::algebra::{Arg, Equation, Expr, Rational, SolutionSet, Surd, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_zero_product, solve_all, BasicEquation};
use super::identities::{sum_to_product, sum_to_product_template, ProductForm, Sign};
use super::registry::Category;
use super::sum_to_product::signed_pair;
use super::{inline, pick};

const K_POOL: [i64; 4] = [1, 2, 3, 4];
const MN_POOL: [i64; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

/// The factorization chain of a grouped equation
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped {
    /// First pair as a product
    pub first: ProductForm,
    /// Second pair as a product
    pub second: ProductForm,
    /// Factor shared by both products
    pub common: (TrigFn, Arg),
    /// Product form of the bracketed remainder
    pub remainder: ProductForm,
    /// Constant of the final product
    pub coef: i64,
}

impl Grouped {
    fn final_expr(&self) -> Expr {
        let mut factors = vec![Expr::func(self.common.0, self.common.1)];
        factors.extend(self.remainder.factors.iter().map(|(g, a)| Expr::func(*g, *a)));
        Expr::scaled(Surd::int(self.coef), Expr::product(factors))
    }

    fn equations(&self) -> Vec<BasicEquation> {
        let mut equations = vec![BasicEquation::zero(self.common.0, self.common.1)];
        equations.extend(
            self.remainder
                .factors
                .iter()
                .map(|(g, a)| BasicEquation::zero(*g, *a)),
        );
        equations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub func: TrigFn,
    pub k: i64,
    pub m: i64,
    pub n: i64,
    /// Operator inside each pair
    pub op_pair: Sign,
    /// Operator between the pairs
    pub op_group: Sign,
    /// Signed arguments in display order
    pub terms: Vec<(Sign, i64)>,
}

impl Grouping {
    /// Terms in grouped order: `f(m+k) ± f(m-k) ± (f(n+k) ± f(n-k))`
    pub fn new(func: TrigFn, k: i64, m: i64, n: i64, op_pair: Sign, op_group: Sign) -> Self {
        let terms = vec![
            (Sign::Plus, m + k),
            (op_pair, m - k),
            (op_group, n + k),
            (op_group.times(op_pair), n - k),
        ];
        Grouping {
            func,
            k,
            m,
            n,
            op_pair,
            op_group,
            terms,
        }
    }

    fn pair(&self, center: i64) -> Option<ProductForm> {
        sum_to_product(
            self.func,
            self.op_pair,
            Rational::int(center + self.k),
            Rational::int(center - self.k),
        )
    }

    pub fn grouped(&self) -> Option<Grouped> {
        let first = self.pair(self.m)?;
        let second = self.pair(self.n)?;
        let kx = Arg::times(self.k);
        let common_fn = [TrigFn::Sin, TrigFn::Cos]
            .into_iter()
            .find(|g| first.has_factor(*g, &kx) && second.has_factor(*g, &kx))?;
        let (g1, a1) = first.cofactor(common_fn, &kx)?;
        let (_, a2) = second.cofactor(common_fn, &kx)?;
        let remainder = sum_to_product(g1, self.op_group, a1.k, a2.k)?;
        Some(Grouped {
            coef: first.coef * remainder.coef,
            common: (common_fn, kx),
            first,
            second,
            remainder,
        })
    }

    fn equations(&self) -> Vec<BasicEquation> {
        self.grouped().map(|g| g.equations()).unwrap_or_default()
    }
}

impl Problem for Grouping {
    const CATEGORY: Category = Category::Grouping;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let k = pick(rng, &K_POOL);
        let mut pool: Vec<i64> = MN_POOL.iter().copied().filter(|x| *x > k && x % 2 != k % 2).collect();
        if pool.len() < 2 {
            pool = MN_POOL.iter().copied().filter(|x| *x > k && x % 2 == k % 2).collect();
        }
        ensure(pool.len() >= 2, "not enough centers above k")?;
        let chosen: Vec<i64> = pool.choose_multiple(rng, 2).copied().collect();
        let (m, n) = (chosen[0], chosen[1]);

        let mut args = vec![m + k, m - k, n + k, n - k];
        ensure(!args.contains(&0), "zero argument")?;
        args.sort_unstable();
        args.dedup();
        ensure(args.len() == 4, "repeated argument")?;

        let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
        let op_pair = pick(rng, &[Sign::Plus, Sign::Minus]);
        let op_group = match op_pair {
            Sign::Minus => Sign::Minus,
            Sign::Plus => pick(rng, &[Sign::Plus, Sign::Minus]),
        };
        let mut problem = Grouping::new(func, k, m, n, op_pair, op_group);
        ensure(problem.grouped().is_some(), "no common factor")?;
        problem.terms.shuffle(rng);
        Ok(problem)
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("f", self.func)
            .with("k", self.k)
            .with("m", self.m)
            .with("n", self.n)
            .with("op_pair", self.op_pair.markup())
            .with("op_group", self.op_group.markup())
    }

    fn equation(&self) -> Equation {
        let terms = self
            .terms
            .iter()
            .map(|(sign, a)| Expr::scaled(sign.factor().into(), Expr::func(self.func, Arg::times(*a))))
            .collect();
        Equation::new(Expr::sum(terms), Expr::zero())
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        let Some(grouped) = self.grouped() else {
            return;
        };
        let pair = |center: i64| signed_pair(self.func, self.op_pair, Rational::int(center + self.k), Rational::int(center - self.k));
        out.text("Group the terms in pairs so that each pair turns into a product:");
        out.math(format!(
            "({}) {} ({}) = 0",
            pair(self.m).markup(),
            self.op_group.markup(),
            pair(self.n).markup()
        ));

        out.text("Apply the identity");
        out.math(sum_to_product_template(self.func, self.op_pair));
        out.text("to each pair:");
        let products = Expr::sum(vec![
            grouped.first.expr(),
            Expr::scaled(self.op_group.factor().into(), grouped.second.expr()),
        ]);
        out.math(format!("{} = 0", products.markup()));

        let (cf, ca) = grouped.common;
        let (g, a1) = grouped.first.cofactor(cf, &ca).unwrap_or((cf, ca));
        let (_, a2) = grouped.second.cofactor(cf, &ca).unwrap_or((cf, ca));
        let bracket = signed_pair(g, self.op_group, a1.k, a2.k);
        out.text(format!(
            "Take the common factor {} out of the brackets:",
            inline(Expr::func(cf, ca).markup())
        ));
        let factored = Expr::scaled(
            Surd::int(grouped.first.coef),
            Expr::product(vec![Expr::func(cf, ca), bracket]),
        );
        out.math(format!("{} = 0", factored.markup()));

        out.text("Transform the bracket with");
        out.math(sum_to_product_template(g, self.op_group));
        narrate_zero_product(out, &grouped.final_expr().markup(), &grouped.equations());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_common_factor_sine_sum() {
        // sin 5x + sin 3x + sin 7x + sin x = 2 cos x (sin 4x + sin 3x)
        let p = Grouping::new(TrigFn::Sin, 1, 4, 3, Sign::Plus, Sign::Plus);
        assert_eq!(p.equation().markup(), "sin(5 x) + sin(3 x) + sin(4 x) + sin(2 x) = 0");
        let g = p.grouped().unwrap();
        assert_eq!(g.common, (TrigFn::Cos, Arg::x()));
        // sin 4x + sin 3x = 2 sin(7x/2) cos(x/2)
        assert_eq!(g.remainder.markup(), "2 sin(frac(7 x, 2)) cos(frac(x, 2))");
        assert_eq!(g.coef, 4);
    }

    #[test]
    fn test_cosine_differences() {
        let p = Grouping::new(TrigFn::Cos, 2, 5, 7, Sign::Minus, Sign::Minus);
        let g = p.grouped().unwrap();
        assert_eq!(g.common, (TrigFn::Sin, Arg::times(2)));
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup.starts_with("-2 sin(2 x) (sin(5 x) - sin(7 x))")));
    }

    #[test]
    fn test_sampled_arguments_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            if let Ok(p) = Grouping::sample(&mut rng) {
                let mut args: Vec<i64> = p.terms.iter().map(|(_, a)| *a).collect();
                args.sort_unstable();
                args.dedup();
                assert_eq!(args.len(), 4);
                assert!(p.m > p.k && p.n > p.k);
            }
        }
    }
}
